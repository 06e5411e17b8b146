use serde_json::Value;

use super::ApiError;
use crate::constants::messages;

/// Both credentials must be present. Empty strings are accepted.
pub fn validate_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ApiError> {
    match (username, password) {
        (Some(u), Some(p)) => Ok((u, p)),
        _ => Err(ApiError::validation(messages::CREDENTIALS_REQUIRED)),
    }
}

/// Accepts JSON integers > 0 only; floats, strings and booleans are rejected.
pub fn validate_amount(amount: &Value) -> Result<i64, ApiError> {
    match amount.as_i64() {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ApiError::validation(messages::AMOUNT_NOT_POSITIVE)),
    }
}

/// Presence only; the values are checked by `validate_amount` and `recipient_name`.
pub fn validate_transfer_fields(
    to_user: Option<Value>,
    amount: Option<Value>,
) -> Result<(Value, Value), ApiError> {
    match (to_user, amount) {
        (Some(to), Some(amount)) => Ok((to, amount)),
        _ => Err(ApiError::validation(messages::TRANSFER_FIELDS_REQUIRED)),
    }
}

/// No user can be named by a non-string, so such a recipient does not exist.
pub fn recipient_name(to_user: &Value) -> Result<&str, ApiError> {
    to_user
        .as_str()
        .ok_or_else(|| ApiError::validation(messages::RECIPIENT_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials(Some("a".into()), Some("b".into())).is_ok());
        assert!(validate_credentials(Some("a".into()), None).is_err());
        assert!(validate_credentials(None, Some("b".into())).is_err());
        assert!(validate_credentials(Some(String::new()), Some(String::new())).is_ok());
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount(&json!(1)).unwrap(), 1);
        assert_eq!(validate_amount(&json!(100)).unwrap(), 100);
        assert!(validate_amount(&json!(0)).is_err());
        assert!(validate_amount(&json!(-5)).is_err());
        assert!(validate_amount(&json!(1.5)).is_err());
        assert!(validate_amount(&json!("100")).is_err());
        assert!(validate_amount(&json!(true)).is_err());
        assert!(validate_amount(&Value::Null).is_err());
        assert!(validate_amount(&json!(u64::MAX)).is_err());
    }

    #[test]
    fn test_validate_transfer_fields() {
        assert!(validate_transfer_fields(Some(json!("bob")), Some(json!(1))).is_ok());
        assert!(validate_transfer_fields(Some(json!("bob")), Some(Value::Null)).is_ok());
        assert!(validate_transfer_fields(None, Some(json!(1))).is_err());
        assert!(validate_transfer_fields(Some(json!("bob")), None).is_err());
    }

    #[test]
    fn test_recipient_name() {
        assert_eq!(recipient_name(&json!("bob")).unwrap(), "bob");
        assert!(recipient_name(&json!(123)).is_err());
        assert!(recipient_name(&Value::Null).is_err());
    }
}
