use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db::Item;

/// Body of every 4xx/5xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            errors: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Serializes as `{}`.
#[derive(Debug, Serialize)]
pub struct EmptyResponse {}

#[derive(Debug, Default, Deserialize)]
pub struct AuthRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Both fields stay untyped so a present but wrongly typed value (including
/// `null`) is told apart from a missing key.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCoinRequest {
    #[serde(default, deserialize_with = "present")]
    pub to_user: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub amount: Option<Value>,
}

/// Only called when the key exists, so `null` becomes `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct ItemDto {
    pub name: String,
    pub price: i64,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            name: item.name,
            price: item.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_fields_count_as_present() {
        let req: SendCoinRequest =
            serde_json::from_str(r#"{"toUser": null, "amount": null}"#).unwrap();
        assert_eq!(req.to_user, Some(Value::Null));
        assert_eq!(req.amount, Some(Value::Null));
    }

    #[test]
    fn absent_fields_are_none() {
        let req: SendCoinRequest = serde_json::from_str(r#"{"toUser": 123}"#).unwrap();
        assert_eq!(req.to_user, Some(Value::from(123)));
        assert!(req.amount.is_none());
    }
}
