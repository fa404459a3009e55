use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{default_true, Identified};

/// Open-ended provider-call defaults (temperature, max_tokens, ...).
pub type Parameters = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Chat,       // 对话模型
    Completion, // 补全模型
    Embedding,  // 向量模型
    Image,      // 图像生成
    Audio,      // 音频模型
}

impl ModelType {
    pub const ALL: [ModelType; 5] = [
        ModelType::Chat,
        ModelType::Completion,
        ModelType::Embedding,
        ModelType::Image,
        ModelType::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Chat => "chat",
            ModelType::Completion => "completion",
            ModelType::Embedding => "embedding",
            ModelType::Image => "image",
            ModelType::Audio => "audio",
        }
    }

    /// Label shown in the type selector.
    pub fn label(&self) -> &'static str {
        match self {
            ModelType::Chat => "Chat",
            ModelType::Completion => "Completion",
            ModelType::Embedding => "Embedding",
            ModelType::Image => "Image Generation",
            ModelType::Audio => "Audio",
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Chat
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown model type: {}", s))
    }
}

/// 后端存储的类型字段
///
/// 后端不限制取值，列表里可能出现上面五种以外的类型。这类值原样保留，
/// 只影响展示，不会让整批数据解码失败。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelKind {
    Known(ModelType),
    Other(String),
}

impl ModelKind {
    /// The selector value, if the stored tag is one the form offers.
    pub fn known(&self) -> Option<ModelType> {
        match self {
            ModelKind::Known(model_type) => Some(*model_type),
            ModelKind::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModelKind::Known(model_type) => model_type.as_str(),
            ModelKind::Other(raw) => raw,
        }
    }

    /// Unrecognized tags are shown as stored.
    pub fn label(&self) -> &str {
        match self {
            ModelKind::Known(model_type) => model_type.label(),
            ModelKind::Other(raw) => raw,
        }
    }
}

impl From<ModelType> for ModelKind {
    fn from(model_type: ModelType) -> Self {
        ModelKind::Known(model_type)
    }
}

impl PartialEq<ModelType> for ModelKind {
    fn eq(&self, other: &ModelType) -> bool {
        self.known() == Some(*other)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub model_type: ModelKind,
    #[serde(default)]
    pub context_window: Option<u32>,  // token 数，未知时为空
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub default_parameters: Option<Parameters>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Model {
    /// `key: value` pairs for the list table, `None` when nothing is set.
    pub fn parameters_summary(&self) -> String {
        match &self.default_parameters {
            Some(params) if !params.is_empty() => params
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect::<Vec<_>>()
                .join(", "),
            _ => "None".to_string(),
        }
    }
}

impl Identified for Model {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCreate {
    pub provider_id: String,
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model_type: ModelType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    pub is_active: bool,
    pub default_parameters: Parameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<ModelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_parameters: Option<Parameters>,
}
