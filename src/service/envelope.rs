//! Request/response envelope for the external dispatch layer
//!
//! The tool's signing operations are plain typed function calls; this
//! envelope exists only at the boundary where structured requests
//! arrive from outside (batch runner, future RPC front-end).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success
pub const ERR_OK: u32 = 0;
/// Signing or re-serialization failure
pub const ERR_INTERNAL: u32 = 900;
/// Malformed or unparseable input
pub const ERR_INVALID_PARAMS: u32 = 1003;
/// Unrecognized method name
pub const ERR_UNSUPPORTED_METHOD: u32 = 1004;
/// Structurally invalid transaction bytes
pub const ERR_INVALID_TX: u32 = 1005;

/// A structured request from the dispatch layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliRpcRequest {
    /// Caller-chosen request id, echoed in logs
    pub qid: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Response envelope: one error code and message per failed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliRpcResponse {
    pub error_code: u32,
    pub error_info: String,
    #[serde(default)]
    pub result: Value,
}

impl CliRpcResponse {
    pub fn ok(result: Value) -> Self {
        Self {
            error_code: ERR_OK,
            error_info: String::new(),
            result,
        }
    }

    pub fn error(error_code: u32, error_info: impl Into<String>) -> Self {
        Self {
            error_code,
            error_info: error_info.into(),
            result: Value::Null,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error_code == ERR_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_constructors() {
        let ok = CliRpcResponse::ok(serde_json::json!({"signed_tx": "00"}));
        assert!(ok.is_ok());
        assert!(ok.error_info.is_empty());

        let err = CliRpcResponse::error(ERR_INVALID_TX, "bad payer");
        assert!(!err.is_ok());
        assert_eq!(err.error_code, ERR_INVALID_TX);
        assert!(err.result.is_null());
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{"qid":"q1","method":"sigrawtx","params":{"raw_tx":"00"}}"#;
        let req: CliRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.qid, "q1");
        assert_eq!(req.method, "sigrawtx");
        assert_eq!(req.params["raw_tx"], "00");
    }
}
