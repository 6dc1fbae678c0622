//! 报表引擎集成测试

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use rolo::directory::{ContactSummary, InMemoryDirectory, UserDirectory};
    use rolo::report::{
        ContactListSource, DataSource, HtmlRenderer, MemoryReportStore, ReportEngine,
        ReportError, ReportStatus, SqliteReportStore, UserCountSource,
    };

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

    fn default_engine() -> ReportEngine {
        let directory = sample_directory();
        let sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(UserCountSource::new(directory.clone())),
            Arc::new(ContactListSource::new(directory)),
        ];
        ReportEngine::new(
            Arc::new(MemoryReportStore::new()),
            sources,
            Arc::new(HtmlRenderer),
        )
    }

    #[tokio::test]
    async fn test_full_report_generation() {
        let engine = default_engine();

        let report = engine.create_report().await.unwrap();
        assert_eq!(report.status, ReportStatus::Created);
        assert!(report.content.is_empty());

        engine.generate_report_async(&report.id).wait().await.unwrap();

        let stored = engine.get_report(&report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Completed);
        // 5 个用户、2 个联系人出现在渲染结果里
        assert!(stored.content.contains("Total users: <strong>5</strong>"));
        assert!(stored.content.contains("Contacts listed: <strong>2</strong>"));
        assert!(stored.content.contains("Ada Lovelace"));
        assert!(stored.generation_ms.is_some());
    }

    #[tokio::test]
    async fn test_count_source_failure_marks_error() {
        struct DownUserDirectory;

        #[async_trait]
        impl UserDirectory for DownUserDirectory {
            async fn count_total(&self) -> Result<u64, String> {
                Err("db down".to_string())
            }
        }

        let directory = sample_directory();
        let sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(UserCountSource::new(Arc::new(DownUserDirectory))),
            Arc::new(ContactListSource::new(directory)),
        ];
        let engine = ReportEngine::new(
            Arc::new(MemoryReportStore::new()),
            sources,
            Arc::new(HtmlRenderer),
        );

        let report = engine.create_report().await.unwrap();
        let err = engine
            .generate_report_async(&report.id)
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::SourceFailure(_)));

        // 失败的报表仍可读取，内容为人类可读（已转义）的说明
        let stored = engine.get_report(&report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Error);
        assert!(stored.content.contains("db down"));
        assert!(stored.content.contains("alert-danger"));
    }

    #[tokio::test]
    async fn test_generate_unknown_id_fails_without_side_effects() {
        let engine = default_engine();

        let err = engine
            .generate_report_async("report_nope")
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::NotFound(_)));
        assert!(engine.list_reports().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_engine_over_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteReportStore::open(dir.path().join("reports.db")).unwrap();

        let directory = sample_directory();
        let sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(UserCountSource::new(directory.clone())),
            Arc::new(ContactListSource::new(directory)),
        ];
        let engine = ReportEngine::new(Arc::new(store), sources, Arc::new(HtmlRenderer));

        let report = engine.create_report().await.unwrap();
        engine.generate_report_async(&report.id).wait().await.unwrap();

        let stored = engine.get_report(&report.id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Completed);
        assert!(stored.content.contains("Total users: <strong>5</strong>"));

        let all = engine.list_reports().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_report_listed_alongside_completed() {
        struct DownUserDirectory;

        #[async_trait]
        impl UserDirectory for DownUserDirectory {
            async fn count_total(&self) -> Result<u64, String> {
                Err("db down".to_string())
            }
        }

        let store = Arc::new(MemoryReportStore::new());
        let directory = sample_directory();

        let good_sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(UserCountSource::new(directory.clone())),
            Arc::new(ContactListSource::new(directory.clone())),
        ];
        let bad_sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(UserCountSource::new(Arc::new(DownUserDirectory))),
            Arc::new(ContactListSource::new(directory)),
        ];

        let good = ReportEngine::new(store.clone(), good_sources, Arc::new(HtmlRenderer));
        let bad = ReportEngine::new(store, bad_sources, Arc::new(HtmlRenderer));

        let ok_report = good.create_report().await.unwrap();
        good.generate_report_async(&ok_report.id).wait().await.unwrap();

        let err_report = bad.create_report().await.unwrap();
        bad.generate_report_async(&err_report.id)
            .wait()
            .await
            .unwrap_err();

        let all = good.list_reports().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|r| r.status == ReportStatus::Error));
        assert!(all.iter().any(|r| r.status == ReportStatus::Completed));
    }
}
