//! Rolo - 联系人管理报表引擎
//!
//! 入口：初始化日志、按配置装配存储/数据源/渲染器，生成一份演示报表并输出。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use rolo::config::{load_config, AppConfig};
use rolo::directory::{ContactSummary, InMemoryDirectory};
use rolo::report::{
    ContactListSource, DataSource, HtmlRenderer, MemoryReportStore, ReportEngine, ReportStore,
    SqliteReportStore, UserCountSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rolo::observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    // 存储后端：配置选择 memory / sqlite
    let store: Arc<dyn ReportStore> = if cfg.storage.backend == "sqlite" {
        let path = cfg
            .storage
            .db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("data/reports.db"));
        tracing::info!("Using SQLite report store ({})", path.display());
        let store = SqliteReportStore::open(&path)
            .map_err(anyhow::Error::msg)
            .context("Failed to open report db")?;
        Arc::new(store)
    } else {
        tracing::info!("Using in-memory report store");
        Arc::new(MemoryReportStore::new())
    };

    // 演示目录：固定的用户计数与联系人列表（真实部署中由 CRUD 域提供）
    let directory = Arc::new(InMemoryDirectory::new(
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
    ));

    let sources: Vec<Arc<dyn DataSource>> = vec![
        Arc::new(UserCountSource::new(directory.clone())),
        Arc::new(ContactListSource::new(directory)),
    ];

    let engine = ReportEngine::new(store, sources, Arc::new(HtmlRenderer))
        .with_template(cfg.report.template_id.clone());

    let report = engine
        .create_report()
        .await
        .context("Failed to create report")?;

    let handle = engine.generate_report_async(&report.id);
    handle.wait().await.context("Report generation failed")?;

    let report = engine
        .get_report(&report.id)
        .await
        .context("Failed to fetch report")?;
    println!("{}", report.content);

    Ok(())
}
