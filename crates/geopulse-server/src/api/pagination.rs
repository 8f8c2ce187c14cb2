use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};

const MAX_PAGE_LIMIT: u64 = 1000;

/// Shared limit/offset resolution for the list endpoints. Each endpoint
/// declares its own params struct; these helpers apply the defaults and the
/// upper bound.
pub struct PaginationParams;

impl PaginationParams {
    pub fn resolve_limit(limit: Option<u64>) -> usize {
        limit.unwrap_or(20).min(MAX_PAGE_LIMIT) as usize
    }

    pub fn resolve_offset(offset: Option<u64>) -> usize {
        offset.unwrap_or(0) as usize
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum U64Input {
    Number(u64),
    Text(String),
}

/// Accepts both `limit=20` and `limit="20"` (query strings arrive as text).
pub fn deserialize_optional_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<U64Input>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(U64Input::Number(number)) => Ok(Some(number)),
        Some(U64Input::Text(text)) => text
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(DeError::custom),
    }
}
