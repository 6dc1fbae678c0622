//! 报表错误类型
//!
//! 数据源失败与渲染失败在生成任务内部被捕获，折叠为单个错误：
//! 先持久化 ERROR 状态与转义后的错误说明，再通过句柄抛给调用方。

use thiserror::Error;

use super::model::ReportId;

/// 报表生命周期中可能出现的错误
#[derive(Error, Debug)]
pub enum ReportError {
    /// 请求的报表不存在；不产生任何副作用
    #[error("Report not found: {0}")]
    NotFound(ReportId),

    /// 一个或多个数据源任务失败
    #[error("Data source failed: {0}")]
    SourceFailure(String),

    /// 数据源全部成功后渲染失败
    #[error("Render failed: {0}")]
    RenderFailure(String),

    /// 同一报表的生成已在进行中（单飞保护，拒绝并发触发）
    #[error("Generation already in progress: {0}")]
    GenerationInProgress(ReportId),

    /// 报表已到达终态，拒绝重复生成
    #[error("Report already generated: {0}")]
    AlreadyGenerated(ReportId),

    /// 存储读写失败
    #[error("Report store error: {0}")]
    Store(String),
}
