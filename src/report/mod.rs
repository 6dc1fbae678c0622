//! 报表领域
//!
//! 报表的生命周期：`create_report` 建立 CREATED 记录；`generate_report_async`
//! 在后台为每个数据源启一个并发任务，join 全部任务后合并结果与耗时、
//! 调用渲染器，最终把 COMPLETED（渲染内容）或 ERROR（转义后的错误片段）
//! 写回存储。COMPLETED / ERROR 为终态。

pub mod engine;
pub mod error;
pub mod escape;
pub mod model;
pub mod persistence;
pub mod render;
pub mod source;
pub mod store;

pub use engine::{GenerationHandle, ReportEngine};
pub use error::ReportError;
pub use escape::escape_html;
pub use model::{Report, ReportId, ReportStatus};
pub use persistence::SqliteReportStore;
pub use render::{HtmlRenderer, RenderContext, Renderer, CONTENT_TEMPLATE_ID};
pub use source::{ContactListSource, DataSource, SourceOutcome, UserCountSource};
pub use store::{MemoryReportStore, ReportStore};
