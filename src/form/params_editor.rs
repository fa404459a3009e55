use serde_json::Value;

use crate::dto::Parameters;

/// Text editor for `default_parameters`.
///
/// Keeps the raw text alongside the last mapping that parsed. Text that is
/// not a JSON object is kept for display but never replaces `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametersEditor {
    text: String,
    value: Parameters,
    error: Option<String>,
}

impl ParametersEditor {
    pub fn new(value: &Parameters) -> Self {
        Self {
            text: format_parameters(value),
            value: value.clone(),
            error: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last valid mapping.
    pub fn value(&self) -> &Parameters {
        &self.value
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the mapping and re-renders the text.
    pub fn set_value(&mut self, value: Parameters) {
        self.text = format_parameters(&value);
        self.value = value;
        self.error = None;
    }

    /// Applies an edit. Returns the new mapping when the text parsed.
    pub fn edit(&mut self, text: &str) -> Option<&Parameters> {
        if text.is_empty() {
            return None;
        }
        self.text = text.to_string();

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => {
                self.value = map;
                self.error = None;
                Some(&self.value)
            }
            Ok(_) => {
                self.error = Some("Default parameters must be a JSON object".to_string());
                None
            }
            Err(e) => {
                self.error = Some(format!("Invalid JSON: {}", e));
                None
            }
        }
    }
}

fn format_parameters(value: &Parameters) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
