use once_cell::sync::Lazy;
use regex::Regex;

use super::{Field, FieldErrors};

/// Machine identifiers: lowercase letters, digits, `_` and `-`.
pub static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_-]+$").expect("name pattern is a valid regex")
});

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_INVALID: &str =
    "Name can only contain lowercase letters, numbers, underscores, and hyphens";
pub const DISPLAY_NAME_REQUIRED: &str = "Display name is required";
pub const MODEL_TYPE_REQUIRED: &str = "Model type is required";
pub const CONTEXT_WINDOW_INVALID: &str = "Context window must be a positive integer";

pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Checks shared by every entity form.
pub fn check_identity(name: &str, display_name: &str, errors: &mut FieldErrors) {
    if name.is_empty() {
        errors.insert(Field::Name, NAME_REQUIRED);
    } else if !is_valid_name(name) {
        errors.insert(Field::Name, NAME_INVALID);
    }

    if display_name.is_empty() {
        errors.insert(Field::DisplayName, DISPLAY_NAME_REQUIRED);
    }
}
