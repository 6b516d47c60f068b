use url::Url;

use super::types::{PositiveU64, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_u64(s: &str) -> AppResult<PositiveU64> {
    s.parse::<PositiveU64>().map_err(AppError::from)
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

/// Turns a bare host (`example.com`, `lb-123.elb.amazonaws.com:8080/health`)
/// or a full URL into an absolute `http`/`https` URL.
pub(crate) fn normalize_target(raw: &str) -> Result<Url, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::TargetEmpty);
    }
    let candidate = if value.contains("://") {
        value.to_owned()
    } else {
        format!("http://{}", value)
    };
    let url = Url::parse(&candidate).map_err(|err| ValidationError::InvalidTarget {
        value: value.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ValidationError::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}
