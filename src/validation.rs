use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BuildError, Result};

static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").unwrap()
});

/// Checks a component registry key against `^[A-Za-z0-9._-]+$`.
pub fn validate_identifier(name: &str) -> Result<()> {
    if IDENTIFIER_REGEX.is_match(name) {
        Ok(())
    } else {
        debug!("Rejected component identifier: {:?}", name);
        Err(BuildError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

/// Checks that a path key is rooted.
pub fn validate_path_key(path: &str) -> Result<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        debug!("Rejected path key without leading slash: {:?}", path);
        Err(BuildError::InvalidPathEntry {
            path: path.to_string(),
            reason: "path must start with a /".to_string(),
        })
    }
}

/// Resolves `value` against a fixed vocabulary, returning the index of the
/// matching token.
pub(crate) fn parse_enum(
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Result<usize> {
    match allowed.iter().position(|candidate| *candidate == value) {
        Some(index) => Ok(index),
        None => {
            debug!("Rejected {} value {:?}", field, value);
            Err(BuildError::InvalidEnumValue {
                field,
                value: value.to_string(),
                allowed,
            })
        }
    }
}
