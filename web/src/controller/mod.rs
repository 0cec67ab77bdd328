use serde::Serialize;

pub(crate) mod health_check_controller;
pub(crate) mod notification_controller;

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_serialize_api_response_with_data() {
        let response = ApiResponse::new(StatusCode::ACCEPTED.into(), vec!["u1"]);
        let serialized = serde_json::to_string(&response).unwrap();

        // Compare as values: key order in the serialized string is not guaranteed
        let value: serde_json::Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(value, json!({"data": ["u1"], "status_code": 202}));
    }
}
