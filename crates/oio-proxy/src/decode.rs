//! Proxy error body decoding.
//!
//! The proxy explains failures with a JSON body:
//!
//! ```json
//! {"status": 404, "message": "Content not found"}
//! ```
//!
//! Decoding never fails: malformed or missing bodies degrade to a generic
//! error with code 0.

use oio_core::SdsError;
use serde_json::Value;

/// Decode a proxy error body into a structured error.
///
/// The message is always formatted as `(code=<status>) <message>`.
#[must_use]
pub fn decode_error(body: &[u8]) -> SdsError {
    // Only the first complete JSON value counts; trailing bytes are ignored.
    let parsed = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
        .filter(|v| !v.is_null());

    let Some(value) = parsed else {
        return coded(0, "No error explained");
    };

    let code = value
        .get("status")
        .and_then(Value::as_i64)
        .and_then(|s| i32::try_from(s).ok())
        .unwrap_or(0);
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error");
    coded(code, message)
}

fn coded(code: i32, message: &str) -> SdsError {
    SdsError::new(code, format!("(code={code}) {message}"))
}
