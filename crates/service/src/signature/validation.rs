//! Field rules checked against the raw submission, before any sanitizing.

use once_cell::sync::Lazy;
use regex::Regex;

use super::domain::{FieldError, SignatureForm};

pub const NAME_MAX: usize = 128;
pub const COMMENT_MAX: usize = 400;

pub const NAME_EMPTY: &str = "Nafn má ekki vera tómt";
pub const NAME_TOO_LONG: &str = "Nafn má að hámarki vera 128 stafir";
pub const NATIONAL_ID_EMPTY: &str = "Kennitala má ekki vera tóm";
pub const NATIONAL_ID_FORMAT: &str = "Kennitala verður að vera á formi 000000-0000 eða 0000000000";
pub const COMMENT_TOO_LONG: &str = "Athugasemd má að hámarki vera 400 stafir";

/// Six digits, optional hyphen, four digits.
static NATIONAL_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}-?[0-9]{4}$").expect("national id pattern compiles"));

/// Check every rule; errors come back in rule order, one per violation.
pub fn validate(form: &SignatureForm) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &'static str, msg: &'static str, value: &str| {
        errors.push(FieldError { field, msg, value: value.to_string() });
    };

    // a whitespace-only name would be empty once trimmed for storage
    if form.name.trim().is_empty() {
        fail("name", NAME_EMPTY, &form.name);
    }
    if form.name.chars().count() > NAME_MAX {
        fail("name", NAME_TOO_LONG, &form.name);
    }
    if form.national_id.is_empty() {
        fail("nationalId", NATIONAL_ID_EMPTY, &form.national_id);
    }
    if !NATIONAL_ID_PATTERN.is_match(&form.national_id) {
        fail("nationalId", NATIONAL_ID_FORMAT, &form.national_id);
    }
    if form.comment.chars().count() > COMMENT_MAX {
        fail("comment", COMMENT_TOO_LONG, &form.comment);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
