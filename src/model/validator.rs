use serde::de::{self, Deserializer};
use serde::Deserialize;
use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("can not be empty".into());
        Err(error)
    } else {
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Str(String),
}

/// Accepts an id sent either as a JSON number or as a numeric string (`1` or `"1"`).
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IdRepr::deserialize(deserializer)? {
        IdRepr::Int(id) => Ok(id),
        IdRepr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id '{}', expected an integer", s))),
    }
}
