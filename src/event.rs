//! Cognito post-confirmation trigger payload.
//!
//! Decoding is permissive: unknown fields are ignored and a missing or
//! mistyped field falls back to its default. Only a payload that is not a
//! JSON object is rejected.

use crate::errors::AppError;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomingEvent {
    #[serde(deserialize_with = "lenient")]
    pub version: String,
    #[serde(deserialize_with = "lenient")]
    pub trigger_source: String,
    #[serde(deserialize_with = "lenient")]
    pub region: String,
    #[serde(deserialize_with = "lenient")]
    pub user_pool_id: String,
    #[serde(deserialize_with = "lenient")]
    pub user_name: String,
    #[serde(deserialize_with = "lenient")]
    pub caller_context: CallerContext,
    #[serde(deserialize_with = "lenient")]
    pub request: Request,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallerContext {
    #[serde(deserialize_with = "lenient")]
    pub client_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    #[serde(deserialize_with = "lenient")]
    pub user_attributes: UserAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserAttributes {
    #[serde(deserialize_with = "lenient")]
    pub email: String,
    #[serde(deserialize_with = "lenient")]
    pub given_name: String,
    #[serde(deserialize_with = "lenient")]
    pub sub: String,
    // Cognito sends this as the string "true"/"false".
    #[serde(deserialize_with = "flag")]
    pub email_verified: bool,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Maps the raw trigger payload onto [`IncomingEvent`].
pub fn decode_event(payload: &Value) -> Result<IncomingEvent, AppError> {
    if !payload.is_object() {
        return Err(AppError::DecodeError(serde_json::Error::custom(format!(
            "expected a JSON object, got {}",
            kind_of(payload)
        ))));
    }
    IncomingEvent::deserialize(payload).map_err(AppError::DecodeError)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
