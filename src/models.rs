use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Request integers arrive either as JSON numbers or as decimal text
/// (the upstream form posts text fields).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntField {
    Number(serde_json::Number),
    Text(String),
}

impl IntField {
    /// Parses and rejects negative, fractional, or non-numeric input.
    pub fn resolve(&self, name: &str) -> AppResult<usize> {
        let value = match self {
            IntField::Number(n) => n.as_i64().ok_or_else(|| {
                AppError::InvalidArgument(format!("{name} must be an integer, got {n}"))
            })?,
            IntField::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                AppError::InvalidArgument(format!("{name} must be an integer, got {s:?}"))
            })?,
        };
        usize::try_from(value).map_err(|_| {
            AppError::InvalidArgument(format!("{name} must be non-negative, got {value}"))
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub username: Option<String>,
    pub length: IntField,
    // "combinations" is the legacy form field name for batch size
    #[serde(alias = "combinations")]
    pub count: IntField,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<CodeRecord>,
}

/// One user's accumulated generation history. `codes` is append-only;
/// `length` and `count` describe the most recent batch only.
#[derive(Debug, Clone, Serialize)]
pub struct CodeRecord {
    pub username: String,
    pub length: i64,
    pub count: i64,
    pub codes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_field_accepts_number_and_text() {
        let n: IntField = serde_json::from_value(serde_json::json!(12)).unwrap();
        let t: IntField = serde_json::from_value(serde_json::json!("12")).unwrap();

        assert_eq!(n.resolve("length").unwrap(), 12);
        assert_eq!(t.resolve("length").unwrap(), 12);
    }

    #[test]
    fn test_int_field_rejects_garbage() {
        let f: IntField = serde_json::from_value(serde_json::json!("abc")).unwrap();
        assert!(matches!(
            f.resolve("count"),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_int_field_rejects_fractional() {
        let f: IntField = serde_json::from_value(serde_json::json!(1.5)).unwrap();
        assert!(matches!(
            f.resolve("length"),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_int_field_rejects_negative() {
        let n: IntField = serde_json::from_value(serde_json::json!(-1)).unwrap();
        let t: IntField = serde_json::from_value(serde_json::json!("-3")).unwrap();

        assert!(matches!(
            n.resolve("length"),
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            t.resolve("length"),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_combinations_alias() {
        let req: GenerateRequest = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "length": "6",
            "combinations": 2
        }))
        .unwrap();

        assert_eq!(req.length.resolve("length").unwrap(), 6);
        assert_eq!(req.count.resolve("count").unwrap(), 2);
    }
}
