//! # 页面状态机
//!
//! 列表页：加载 → 展示 → 打开表单/删除确认 → 重新加载。
//! 详情页：单个 provider + 嵌入的模型列表。

pub mod detail_view;
pub mod list_view;
pub mod sources;

pub use detail_view::{DetailState, ProviderDetailView};
pub use list_view::{ListSource, ListState, ListView, ReloadTicket};
pub use sources::{ModelSource, ModelsView, ProviderSource, ProvidersView};
