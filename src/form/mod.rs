//! # 表单控制器
//!
//! 每个表单持有一份草稿（draft），提交前先做本地校验，再按打开方式
//! 调用 create 或 update。草稿只由 `initial_draft(mode)` 推导，
//! 每次打开或 `reset` 都重新推导，不会残留上一次的内容。

pub mod model_form;
pub mod params_editor;
pub mod provider_form;
pub mod validation;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;

pub use model_form::{ModelDraft, ModelForm};
pub use params_editor::ParametersEditor;
pub use provider_form::{ProviderDraft, ProviderForm};

/// How a form was opened.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode<E> {
    Create,
    Edit(E),
}

impl<E> FormMode<E> {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    pub fn entity(&self) -> Option<&E> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(entity) => Some(entity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    DisplayName,
    ModelType,
    ContextWindow,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::DisplayName => "display_name",
            Field::ModelType => "model_type",
            Field::ContextWindow => "context_window",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<E> {
    /// Local validation failed; nothing was sent.
    Invalid,
    /// A submission is already in flight.
    Busy,
    Saved(E),
    /// The backend rejected the write; the message is kept on the form.
    Failed(String),
}

impl<E> SubmitOutcome<E> {
    /// Whether the opener should close the form and reload.
    pub fn refresh_requested(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

/// 提交中标记的守卫：离开作用域时复位，提交 future 被中途丢弃也一样。
pub(crate) struct SubmitGuard<'a>(&'a mut bool);

impl<'a> SubmitGuard<'a> {
    pub(crate) fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

/// Shape shared by the provider and model forms.
#[async_trait]
pub trait EntityForm: Send {
    type Entity: Clone + Send + Sync;

    fn mode(&self) -> &FormMode<Self::Entity>;

    /// Re-derives the draft for `mode`, clears all errors and the busy flag.
    fn reset(&mut self, mode: FormMode<Self::Entity>);

    fn validate(&mut self) -> bool;

    fn field_errors(&self) -> &FieldErrors;

    fn is_submitting(&self) -> bool;

    fn submit_error(&self) -> Option<&str>;

    async fn submit(&mut self) -> SubmitOutcome<Self::Entity>;

    fn title(&self) -> &'static str;
}
