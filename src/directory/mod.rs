//! 用户/联系人目录的外部协作接口
//!
//! CRUD 域（联系人、公司、标签、事件）在本 crate 之外维护；
//! 报表引擎只通过这里的只读接口取数，接口的每次调用都可能独立失败。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 联系人列表行（报表用的只读投影）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSummary {
    /// 联系人 ID
    pub id: String,
    /// 显示名
    pub display_name: String,
    /// 邮箱（可选）
    pub email: Option<String>,
    /// 是否为收藏联系人
    pub is_favorite: bool,
}

/// 用户目录：报表需要的聚合计数
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 统计用户总数
    async fn count_total(&self) -> Result<u64, String>;
}

/// 联系人目录：报表需要的批量列表
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// 返回全部联系人
    async fn find_all(&self) -> Result<Vec<ContactSummary>, String>;
}

/// 内存目录（演示与测试）：固定的用户计数与联系人列表
pub struct InMemoryDirectory {
    user_count: u64,
    contacts: Vec<ContactSummary>,
}

impl InMemoryDirectory {
    pub fn new(user_count: u64, contacts: Vec<ContactSummary>) -> Self {
        Self {
            user_count,
            contacts,
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn count_total(&self) -> Result<u64, String> {
        Ok(self.user_count)
    }
}

#[async_trait]
impl ContactDirectory for InMemoryDirectory {
    async fn find_all(&self) -> Result<Vec<ContactSummary>, String> {
        Ok(self.contacts.clone())
    }
}
