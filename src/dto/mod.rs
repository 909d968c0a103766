pub mod admin_dto;
pub mod ai_dto;
pub mod content_dto;

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

/// Ids come back as numbers from some endpoints and strings from others.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrNumber::deserialize(deserializer)?.into_string())
}

pub(crate) fn deserialize_optional_id<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?
        .map(StringOrNumber::into_string)
        .filter(|s| !s.trim().is_empty()))
}

/// Some endpoints wrap their payload as `{ "data": ... }`, others do not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Empty { data: () },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> Option<T> {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => Some(data),
            Envelope::Empty { .. } => None,
        }
    }
}
