//! Unwrapping of the JavaScript files rustdoc writes into `search.index/`.
//!
//! `root.js` carries a JSON object inside `rr_('...')`; per-crate shard files
//! carry a base64 string inside `rn_("...")`.

use crate::utils::error::{ProbeError, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use regex::Regex;
use serde_json::{Map, Value};

pub const ROOT_FILE: &str = "root.js";

const ROOT_PATTERN: &str = r"(?s)rr_\('(.+)'\)";
const SHARD_PATTERN: &str = r#"(?s)rn_\("(.+)"\)"#;

/// Standard alphabet; trailing `=` is accepted but not required.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Returns the JSON literal between `rr_('` and the last `')`.
pub fn extract_root_json<'a>(content: &'a str, file: &str) -> Result<&'a str> {
    let re = Regex::new(ROOT_PATTERN)?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ProbeError::WrapperNotFound {
            file: file.to_string(),
            marker: "rr_('...')",
        })
}

pub fn parse_root(content: &str, file: &str) -> Result<Map<String, Value>> {
    let json_str = extract_root_json(content, file)?;
    tracing::debug!("Extracted {} chars of JSON from {}", json_str.len(), file);

    match serde_json::from_str::<Value>(json_str)? {
        Value::Object(map) => Ok(map),
        other => Err(ProbeError::FormatError {
            message: format!(
                "expected a JSON object in {}, found {}",
                file,
                crate::core::shape::type_name(&other)
            ),
        }),
    }
}

pub fn extract_shard_payload(content: &str) -> Result<Option<String>> {
    if !content.contains("rn_(") {
        return Ok(None);
    }

    let re = Regex::new(SHARD_PATTERN)?;
    Ok(re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    Ok(LENIENT_BASE64.decode(text)?)
}
