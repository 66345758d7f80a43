//! Input validation and sanitization
//!
//! Provides validation functions for operator inputs to prevent resource
//! exhaustion and garbage reaching the parser or the progress tracker.

use anyhow::{bail, Result};

/// Validate a pasted pairdisplay dump before parsing
///
/// Ensures the text is present, reasonably sized and free of control bytes.
pub fn validate_dump_text(text: &str) -> Result<()> {
    const MAX_DUMP_BYTES: usize = 1_048_576;

    if text.trim().is_empty() {
        bail!("Empty pairdisplay output");
    }

    if text.len() > MAX_DUMP_BYTES {
        bail!(
            "Pairdisplay output too large: {} bytes (max: {})",
            text.len(),
            MAX_DUMP_BYTES
        );
    }

    if text.contains('\0') {
        bail!("Pairdisplay output contains null bytes");
    }

    Ok(())
}

/// Validate a pair identifier used as a tracker key
///
/// Pair ids are `group/name` tokens; only alphanumerics, hyphen,
/// underscore and the separating slash are allowed.
pub fn validate_pair_id(pair_id: &str) -> Result<()> {
    const MAX_PAIR_ID_LENGTH: usize = 100;

    if pair_id.is_empty() {
        bail!("Pair ID cannot be empty");
    }

    if pair_id.len() > MAX_PAIR_ID_LENGTH {
        bail!(
            "Pair ID too long: {} chars (max: {})",
            pair_id.len(),
            MAX_PAIR_ID_LENGTH
        );
    }

    if !pair_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/')
    {
        bail!("Pair ID contains invalid characters: '{}'", pair_id);
    }

    Ok(())
}

/// Validate a copy-progress percentage
pub fn validate_percent(percent: u8) -> Result<()> {
    if percent > 100 {
        bail!("Progress percent out of range: {} (max: 100)", percent);
    }
    Ok(())
}
