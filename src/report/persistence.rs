//! 报表持久化（SQLite）
//!
//! 单连接 + 互斥锁的 rusqlite 实现，适合单机部署；
//! 语句都很短，不会长时间占用锁。

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};

use super::model::{Report, ReportStatus};
use super::store::ReportStore;

/// SQLite 报表存储
pub struct SqliteReportStore {
    conn: Mutex<Connection>,
}

impl SqliteReportStore {
    /// 打开（或创建）数据库文件并建表
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, String> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let conn = Connection::open(db_path.as_ref()).map_err(|e| e.to_string())?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS reports (
                id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                generated_at INTEGER,
                generation_ms INTEGER
            )",
            [],
        )
        .map_err(|e| e.to_string())?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_reports_created ON reports(created_at)",
            [],
        )
        .map_err(|e| e.to_string())?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn save(&self, report: Report) -> Result<Report, String> {
        let conn = self.conn.lock().map_err(|_| "report db lock poisoned".to_string())?;
        conn.execute(
            "INSERT OR REPLACE INTO reports
             (id, status, content, created_at, generated_at, generation_ms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report.id,
                report.status.as_str(),
                report.content,
                report.created_at,
                report.generated_at,
                report.generation_ms.map(|v| v as i64),
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(report)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Report>, String> {
        let conn = self.conn.lock().map_err(|_| "report db lock poisoned".to_string())?;
        let mut stmt = conn
            .prepare(
                "SELECT id, status, content, created_at, generated_at, generation_ms
                 FROM reports WHERE id = ?1",
            )
            .map_err(|e| e.to_string())?;
        let mut rows = stmt.query(params![id]).map_err(|e| e.to_string())?;
        match rows.next().map_err(|e| e.to_string())? {
            Some(row) => Ok(Some(row_to_report(row).map_err(|e| e.to_string())?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Report>, String> {
        let conn = self.conn.lock().map_err(|_| "report db lock poisoned".to_string())?;
        let mut stmt = conn
            .prepare(
                "SELECT id, status, content, created_at, generated_at, generation_ms
                 FROM reports ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map([], row_to_report)
            .map_err(|e| e.to_string())?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| e.to_string())?);
        }
        Ok(out)
    }
}

fn row_to_report(row: &rusqlite::Row<'_>) -> rusqlite::Result<Report> {
    Ok(Report {
        id: row.get(0)?,
        status: parse_status(&row.get::<_, String>(1)?),
        content: row.get(2)?,
        created_at: row.get(3)?,
        generated_at: row.get(4)?,
        generation_ms: row.get::<_, Option<i64>>(5)?.map(|v| v as u64),
    })
}

fn parse_status(s: &str) -> ReportStatus {
    match s {
        "CREATED" => ReportStatus::Created,
        "COMPLETED" => ReportStatus::Completed,
        "ERROR" => ReportStatus::Error,
        _ => ReportStatus::Created,
    }
}
