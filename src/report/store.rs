//! 报表存储抽象层
//!
//! 定义统一的报表存取接口，支持内存和 SQLite 两种实现。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::model::{Report, ReportId};

/// 报表存储接口
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// 保存报表（插入或覆盖），返回保存后的记录
    async fn save(&self, report: Report) -> Result<Report, String>;

    /// 按 ID 查找报表
    async fn find_by_id(&self, id: &str) -> Result<Option<Report>, String>;

    /// 列出全部报表，按创建时间倒序
    async fn list(&self) -> Result<Vec<Report>, String>;
}

/// 内存报表存储（测试与单机运行）
pub struct MemoryReportStore {
    reports: RwLock<HashMap<ReportId, Report>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn save(&self, report: Report) -> Result<Report, String> {
        self.reports
            .write()
            .await
            .insert(report.id.clone(), report.clone());
        Ok(report)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Report>, String> {
        Ok(self.reports.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Report>, String> {
        let mut all: Vec<Report> = self.reports.read().await.values().cloned().collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(all)
    }
}
