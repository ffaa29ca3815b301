//! Uniform JSON envelope for every API response.

use serde::Serialize;

use crate::utils::now_rfc3339;

/// `{success, message?, data?, error?, timestamp}` wrapper.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_routes: Option<Vec<&'static str>>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            error: None,
            available_routes: None,
            timestamp: now_rfc3339(),
        }
    }

    /// Attach a human-readable message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach an item count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

impl ApiResponse<()> {
    /// Successful response with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
            error: None,
            available_routes: None,
            timestamp: now_rfc3339(),
        }
    }

    /// Failed response.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            count: None,
            error: Some(error.into()),
            available_routes: None,
            timestamp: now_rfc3339(),
        }
    }

    /// List the routes the API serves, for unmatched-route responses.
    pub fn with_available_routes(mut self, routes: &[&'static str]) -> Self {
        self.available_routes = Some(routes.to_vec());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_skips_empty_fields() {
        let json = serde_json::to_value(ApiResponse::success(1).with_message("ok")).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 1);
        assert_eq!(json["message"], "ok");
        assert!(json.get("error").is_none());
        assert!(json.get("count").is_none());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn error_envelope_has_no_data() {
        let json = serde_json::to_value(
            ApiResponse::error("Route not found").with_available_routes(&["GET /a"]),
        )
        .unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Route not found");
        assert_eq!(json["availableRoutes"][0], "GET /a");
        assert!(json.get("data").is_none());
    }
}
