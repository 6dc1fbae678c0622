//! Rolo - 联系人管理系统的异步报表引擎
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **directory**: 用户/联系人目录的外部协作接口（CRUD 域在引擎之外）
//! - **observability**: 日志初始化
//! - **report**: 报表领域：模型、存储、数据源、渲染与异步生成引擎

pub mod config;
pub mod directory;
pub mod observability;
pub mod report;
