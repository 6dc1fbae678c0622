//! 报表数据源
//!
//! 每个数据源是一次独立的、可单独失败的只读取数；引擎为每个数据源
//! 启一个并发任务，任务只拥有自己的 [`SourceOutcome`]，join 后由引擎
//! 统一收集，失败不影响兄弟任务。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::directory::{ContactDirectory, UserDirectory};

/// 数据源接口：零参数取数，返回渲染上下文中使用的 JSON 值
#[async_trait]
pub trait DataSource: Send + Sync {
    /// 渲染上下文中的键名（同时决定耗时键 `time_<key>`）
    fn key(&self) -> &str;

    /// 取数，失败返回错误描述
    async fn fetch(&self) -> Result<Value, String>;
}

/// 单个数据源任务的结果
#[derive(Debug)]
pub struct SourceOutcome {
    /// 数据源键名
    pub key: String,
    /// 取数结果或错误描述
    pub value: Result<Value, String>,
    /// 该数据源自己测得的耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 用户总数数据源
pub struct UserCountSource {
    directory: Arc<dyn UserDirectory>,
}

impl UserCountSource {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl DataSource for UserCountSource {
    fn key(&self) -> &str {
        "user_count"
    }

    async fn fetch(&self) -> Result<Value, String> {
        let count = self.directory.count_total().await?;
        Ok(json!(count))
    }
}

/// 联系人列表数据源
pub struct ContactListSource {
    directory: Arc<dyn ContactDirectory>,
}

impl ContactListSource {
    pub fn new(directory: Arc<dyn ContactDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl DataSource for ContactListSource {
    fn key(&self) -> &str {
        "contacts"
    }

    async fn fetch(&self) -> Result<Value, String> {
        let contacts = self.directory.find_all().await?;
        serde_json::to_value(contacts).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ContactSummary, InMemoryDirectory};

    fn sample_directory() -> Arc<InMemoryDirectory> {
        Arc::new(InMemoryDirectory::new(
            5,
            vec![
                ContactSummary {
                    id: "c1".to_string(),
                    display_name: "Ada Lovelace".to_string(),
                    email: Some("ada@example.com".to_string()),
                    is_favorite: true,
                },
                ContactSummary {
                    id: "c2".to_string(),
                    display_name: "Grace Hopper".to_string(),
                    email: None,
                    is_favorite: false,
                },
            ],
        ))
    }

    #[tokio::test]
    async fn test_user_count_source() {
        let source = UserCountSource::new(sample_directory());
        assert_eq!(source.key(), "user_count");
        assert_eq!(source.fetch().await.unwrap(), json!(5));
    }

    #[tokio::test]
    async fn test_contact_list_source() {
        let source = ContactListSource::new(sample_directory());
        assert_eq!(source.key(), "contacts");
        let value = source.fetch().await.unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["display_name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        struct DownDirectory;

        #[async_trait]
        impl UserDirectory for DownDirectory {
            async fn count_total(&self) -> Result<u64, String> {
                Err("db down".to_string())
            }
        }

        let source = UserCountSource::new(Arc::new(DownDirectory));
        assert_eq!(source.fetch().await.unwrap_err(), "db down");
    }
}
