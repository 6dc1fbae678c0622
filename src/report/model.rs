//! 报表领域模型

use serde::{Deserialize, Serialize};

/// 报表 ID
pub type ReportId = String;

/// 报表状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// 已创建，内容尚未生成
    Created,
    /// 生成成功，content 为渲染后的 HTML
    Completed,
    /// 生成失败，content 为转义后的错误片段
    Error,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Created => "CREATED",
            ReportStatus::Completed => "COMPLETED",
            ReportStatus::Error => "ERROR",
        }
    }
}

/// 报表记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// 报表 ID，创建时分配，之后不变
    pub id: ReportId,
    /// 状态
    pub status: ReportStatus,
    /// 内容：创建时为空，成功后为渲染结果，失败后为转义的错误片段
    pub content: String,
    /// 创建时间（毫秒时间戳）
    pub created_at: i64,
    /// 到达终态的时间
    pub generated_at: Option<i64>,
    /// 生成总耗时（毫秒），成功与失败都记录
    pub generation_ms: Option<u64>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            id: format!("report_{}", uuid::Uuid::new_v4()),
            status: ReportStatus::Created,
            content: String::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
            generated_at: None,
            generation_ms: None,
        }
    }

    /// 是否已到达终态（COMPLETED / ERROR）
    pub fn is_finished(&self) -> bool {
        matches!(self.status, ReportStatus::Completed | ReportStatus::Error)
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
