//! 报表生成引擎
//!
//! 生命周期编排：创建记录、异步生成、结果与耗时聚合、状态迁移与落盘。
//! 生成在调用方之外的任务里运行，调用方拿到 [`GenerationHandle`]；
//! 引擎内部按数据源扇出，join 全部任务后才继续（不允许部分推进）。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use serde_json::json;
use tokio::sync::Mutex;

use super::error::ReportError;
use super::escape::escape_html;
use super::model::{Report, ReportId, ReportStatus};
use super::render::{RenderContext, Renderer, CONTENT_TEMPLATE_ID};
use super::source::{DataSource, SourceOutcome};
use super::store::ReportStore;

/// 生成任务句柄：生成结束（成功或失败）且结果已持久化后 resolve
pub struct GenerationHandle {
    inner: tokio::task::JoinHandle<Result<(), ReportError>>,
}

impl GenerationHandle {
    /// 等待生成结束；生成任务本身 panic 时折叠为 SourceFailure
    pub async fn wait(self) -> Result<(), ReportError> {
        match self.inner.await {
            Ok(result) => result,
            Err(e) => Err(ReportError::SourceFailure(format!(
                "generation task panicked: {}",
                e
            ))),
        }
    }

    /// 是否已结束（不消耗句柄）
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// 报表生成引擎
pub struct ReportEngine {
    store: Arc<dyn ReportStore>,
    sources: Vec<Arc<dyn DataSource>>,
    renderer: Arc<dyn Renderer>,
    template_id: String,
    /// 单飞保护：正在生成的报表 ID 集合
    in_flight: Arc<Mutex<HashSet<ReportId>>>,
}

impl ReportEngine {
    pub fn new(
        store: Arc<dyn ReportStore>,
        sources: Vec<Arc<dyn DataSource>>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            store,
            sources,
            renderer,
            template_id: CONTENT_TEMPLATE_ID.to_string(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = template_id.into();
        self
    }

    /// 创建 CREATED 状态的空报表并持久化
    pub async fn create_report(&self) -> Result<Report, ReportError> {
        tracing::info!("Creating new report");
        let report = Report::new();
        let saved = self
            .store
            .save(report)
            .await
            .map_err(ReportError::Store)?;
        tracing::info!(
            "Report created [id: {}, status: {}]",
            saved.id,
            saved.status.as_str()
        );
        Ok(saved)
    }

    /// 按 ID 获取报表
    pub async fn get_report(&self, id: &str) -> Result<Report, ReportError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(ReportError::Store)?
            .ok_or_else(|| ReportError::NotFound(id.to_string()))
    }

    /// 列出全部报表（新的在前）
    pub async fn list_reports(&self) -> Result<Vec<Report>, ReportError> {
        self.store.list().await.map_err(ReportError::Store)
    }

    /// 异步生成报表：立即返回句柄，生成在后台任务中进行
    ///
    /// 报表不存在时句柄以 NotFound 失败且不写任何记录；同一 ID 的生成
    /// 已在进行时句柄以 GenerationInProgress 失败。
    pub fn generate_report_async(&self, id: &str) -> GenerationHandle {
        let id = id.to_string();
        let store = Arc::clone(&self.store);
        let sources = self.sources.clone();
        let renderer = Arc::clone(&self.renderer);
        let template_id = self.template_id.clone();
        let in_flight = Arc::clone(&self.in_flight);

        tracing::info!("Scheduling report generation [id: {}]", id);

        let inner = tokio::spawn(async move {
            if !in_flight.lock().await.insert(id.clone()) {
                tracing::warn!("Generation already in progress [id: {}]", id);
                return Err(ReportError::GenerationInProgress(id));
            }

            let result = run_generation(store, sources, renderer, &template_id, &id).await;
            in_flight.lock().await.remove(&id);
            result
        });

        GenerationHandle { inner }
    }
}

/// 一次生成：取记录、扇出取数、join、渲染、落盘终态
async fn run_generation(
    store: Arc<dyn ReportStore>,
    sources: Vec<Arc<dyn DataSource>>,
    renderer: Arc<dyn Renderer>,
    template_id: &str,
    report_id: &str,
) -> Result<(), ReportError> {
    tracing::debug!("Starting report generation [id: {}]", report_id);

    let report = store
        .find_by_id(report_id)
        .await
        .map_err(ReportError::Store)?
        .ok_or_else(|| ReportError::NotFound(report_id.to_string()))?;

    if report.is_finished() {
        tracing::warn!(
            "Report already in terminal state [id: {}, status: {}]",
            report_id,
            report.status.as_str()
        );
        return Err(ReportError::AlreadyGenerated(report_id.to_string()));
    }

    let start = Instant::now();
    let generated_at = chrono::Utc::now().timestamp_millis();

    // 扇出：每个数据源一个任务，任务只拥有自己的结果
    let mut handles = Vec::with_capacity(sources.len());
    for source in sources {
        handles.push(tokio::spawn(async move {
            let begin = Instant::now();
            let value = source.fetch().await;
            SourceOutcome {
                key: source.key().to_string(),
                value,
                elapsed_ms: begin.elapsed().as_millis() as u64,
            }
        }));
    }

    // join 屏障：所有任务结束后才继续
    let joined = join_all(handles).await;

    let mut outcomes = Vec::with_capacity(joined.len());
    let mut failure: Option<String> = None;
    for result in joined {
        match result {
            Ok(outcome) => {
                if let Err(e) = &outcome.value {
                    tracing::error!(
                        "Source '{}' failed [id: {}]: {}",
                        outcome.key,
                        report_id,
                        e
                    );
                    if failure.is_none() {
                        failure = Some(format!("source '{}' failed: {}", outcome.key, e));
                    }
                } else {
                    tracing::debug!(
                        "Source '{}' finished in {} ms [id: {}]",
                        outcome.key,
                        outcome.elapsed_ms,
                        report_id
                    );
                }
                outcomes.push(outcome);
            }
            Err(e) => {
                tracing::error!("Source task panicked [id: {}]: {}", report_id, e);
                if failure.is_none() {
                    failure = Some(format!("source task panicked: {}", e));
                }
            }
        }
    }

    // 总耗时按墙钟独立测量，可能小于各源耗时之和
    let total_ms = start.elapsed().as_millis() as u64;

    if let Some(reason) = failure {
        return fail(
            store,
            report,
            ReportError::SourceFailure(reason),
            generated_at,
            total_ms,
        )
        .await;
    }

    let mut context: RenderContext = HashMap::new();
    for outcome in outcomes {
        context.insert(format!("time_{}", outcome.key), json!(outcome.elapsed_ms));
        if let Ok(value) = outcome.value {
            context.insert(outcome.key, value);
        }
    }
    context.insert("total_time_ms".to_string(), json!(total_ms));
    context.insert("generated_at".to_string(), json!(generated_at));

    match renderer.render(template_id, &context).await {
        Ok(content) => {
            let mut report = report;
            report.status = ReportStatus::Completed;
            report.content = content;
            report.generated_at = Some(generated_at);
            report.generation_ms = Some(total_ms);
            store.save(report).await.map_err(ReportError::Store)?;
            tracing::info!(
                "Report generated [id: {}, total: {} ms]",
                report_id,
                total_ms
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Render failed [id: {}]: {}", report_id, e);
            fail(
                store,
                report,
                ReportError::RenderFailure(e),
                generated_at,
                total_ms,
            )
            .await
        }
    }
}

/// 失败路径：写入 ERROR 状态与转义后的错误片段，再把错误抛回句柄
async fn fail(
    store: Arc<dyn ReportStore>,
    mut report: Report,
    err: ReportError,
    generated_at: i64,
    total_ms: u64,
) -> Result<(), ReportError> {
    report.status = ReportStatus::Error;
    report.content = format!(
        "<div class='alert alert-danger'>\
         <h4>Report generation failed</h4>\
         <p><strong>Reason:</strong> {}</p>\
         </div>",
        escape_html(&err.to_string())
    );
    report.generated_at = Some(generated_at);
    report.generation_ms = Some(total_ms);

    let id = report.id.clone();
    store.save(report).await.map_err(ReportError::Store)?;
    tracing::warn!("Report marked ERROR [id: {}, total: {} ms]", id, total_ms);
    Err(err)
}
