//! Standard Cloudflare API response envelope

use serde::Deserialize;

/// An entry of the envelope's `errors` or `messages` lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponseInfo {
    pub code: i64,
    pub message: String,
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResultInfo {
    pub page: u32,
    pub per_page: u32,
    pub count: u32,
    pub total_count: u32,
    pub total_pages: u32,
}

/// Wrapper around every API result payload
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ResponseInfo>,
    #[serde(default)]
    pub messages: Vec<ResponseInfo>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
    /// `None` when the API sent `null` or left the field out
    pub result: Option<T>,
}

/// Join the `errors` messages of an error body, if it is an envelope at all
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorsOnly {
        #[serde(default)]
        errors: Vec<ResponseInfo>,
    }

    let parsed: ErrorsOnly = serde_json::from_slice(body).ok()?;
    if parsed.errors.is_empty() {
        return None;
    }
    Some(
        parsed
            .errors
            .into_iter()
            .map(|e| format!("{} ({})", e.message, e.code))
            .collect::<Vec<_>>()
            .join(", "),
    )
}
