use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Envelope for mutating endpoints and error replies. The read endpoints
/// (`/csrf-token`, `/check-auth`) keep their original flat shapes.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct ApiResponse {
    success: bool,
    message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,

    #[schema(example = 200)]
    code: u32,
}

impl ApiResponse {
    pub fn success(message: String, data: Value) -> Self {
        Self {
            success: true,
            message,
            data: { if data.is_null() { None } else { Some(data) } },
            code: 200,
        }
    }

    pub fn failure(message: impl Into<String>, code: u32) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_drops_null_data() {
        let body = serde_json::to_value(ApiResponse::success("ok".to_string(), Value::Null))
            .expect("serializes");

        assert_eq!(body["success"], json!(true));
        assert!(body.get("data").is_none());
    }

    #[test]
    fn failure_carries_code_and_message() {
        let body = serde_json::to_value(ApiResponse::failure("nope", 403)).expect("serializes");

        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("nope"));
        assert_eq!(body["code"], json!(403));
    }
}
