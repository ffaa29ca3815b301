//! Process and host diagnostics for the health endpoints.

use std::time::Instant;

use serde::Serialize;
use sysinfo::System;

use crate::utils::{bytes_to_mb, format_uptime};

/// Memory figures in mebibytes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    /// Resident set size of this process.
    pub rss_mb: Option<f64>,
    /// Virtual memory of this process.
    pub virtual_mb: Option<f64>,
    /// Total host memory.
    pub system_total_mb: f64,
    /// Used host memory.
    pub system_used_mb: f64,
}

/// Point-in-time view of the running process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSnapshot {
    pub pid: Option<u32>,
    pub uptime_seconds: u64,
    pub uptime_human: String,
    pub memory: MemoryUsage,
    pub cpu_count: usize,
    pub platform: &'static str,
    pub arch: &'static str,
}

impl ProcessSnapshot {
    /// Collect a snapshot using `started_at` as the process start.
    pub fn capture(started_at: Instant) -> Self {
        let uptime_seconds = started_at.elapsed().as_secs();

        let mut sys = System::new();
        sys.refresh_memory();

        let mut pid_num = None;
        let mut rss_mb = None;
        let mut virtual_mb = None;

        if let Ok(pid) = sysinfo::get_current_pid() {
            pid_num = Some(pid.as_u32());
            if sys.refresh_process(pid) {
                if let Some(process) = sys.process(pid) {
                    rss_mb = Some(bytes_to_mb(process.memory()));
                    virtual_mb = Some(bytes_to_mb(process.virtual_memory()));
                }
            }
        }

        Self {
            pid: pid_num,
            uptime_seconds,
            uptime_human: format_uptime(uptime_seconds),
            memory: MemoryUsage {
                rss_mb,
                virtual_mb,
                system_total_mb: bytes_to_mb(sys.total_memory()),
                system_used_mb: bytes_to_mb(sys.used_memory()),
            },
            cpu_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            platform: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }

    /// Concise log line.
    pub fn to_log_string(&self) -> String {
        format!(
            "uptime={} rss={}MB sys_mem={}MB/{}MB pid={}",
            self.uptime_human,
            self.memory
                .rss_mb
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "N/A".to_string()),
            self.memory.system_used_mb,
            self.memory.system_total_mb,
            self.pid
                .map(|p| p.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        )
    }
}
