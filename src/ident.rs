//! Display identifier codec.
//!
//! Operators type informal identifiers ("mem007", "0042", "42"); this module
//! translates between those and the internal numeric primary keys. Books and
//! loans display as 4-digit zero-padded decimal with no prefix, members as
//! 3-digit zero-padded decimal with a "mem" prefix.

use crate::error::{AppError, AppResult};

/// Prefix carried by member-facing identifiers
pub const MEMBER_PREFIX: &str = "mem";
/// Display width for member identifiers (mem007)
pub const MEMBER_WIDTH: usize = 3;
/// Display width for book and loan identifiers (0001)
pub const RECORD_WIDTH: usize = 4;

/// Zero-pad the decimal representation of `id` to `width` digits and
/// prepend `prefix`.
pub fn format_id(id: i64, prefix: &str, width: usize) -> String {
    format!("{prefix}{id:0width$}")
}

pub fn format_book_id(id: i64) -> String {
    format_id(id, "", RECORD_WIDTH)
}

pub fn format_loan_id(id: i64) -> String {
    format_id(id, "", RECORD_WIDTH)
}

pub fn format_member_id(id: i64) -> String {
    format_id(id, MEMBER_PREFIX, MEMBER_WIDTH)
}

/// Parse a display identifier back to its numeric key.
///
/// Accepts the formatted form ("mem007", "0042") as well as the raw numeric
/// form ("7", "42"). The prefix is matched case-insensitively. An empty or
/// all-zero digit string parses to 0. A remainder containing any non-digit
/// is rejected rather than silently truncated.
pub fn parse_id(text: &str) -> AppResult<i64> {
    let trimmed = text.trim();
    let rest = if trimmed.len() >= MEMBER_PREFIX.len()
        && trimmed[..MEMBER_PREFIX.len()].eq_ignore_ascii_case(MEMBER_PREFIX)
    {
        &trimmed[MEMBER_PREFIX.len()..]
    } else {
        trimmed
    };

    if !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidIdentifier(text.to_string()));
    }

    let digits = rest.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse::<i64>()
        .map_err(|_| AppError::InvalidIdentifier(text.to_string()))
}
