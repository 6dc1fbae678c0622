//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `ROLO__*` 覆盖（双下划线表示嵌套，如 `ROLO__STORAGE__BACKEND=sqlite`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub storage: StorageSection,
}

/// [app] 段：应用名
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [report] 段：渲染模板
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// 渲染器使用的模板 ID
    #[serde(default = "default_template_id")]
    pub template_id: String,
}

fn default_template_id() -> String {
    "report/content".to_string()
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            template_id: default_template_id(),
        }
    }
}

/// [storage] 段：报表存储后端选择
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// 后端：memory / sqlite
    #[serde(default = "default_backend")]
    pub backend: String,
    /// SQLite 数据库路径，未设置时用 data/reports.db
    pub db_path: Option<PathBuf>,
}

fn default_backend() -> String {
    "memory".to_string()
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            db_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            report: ReportSection::default(),
            storage: StorageSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 ROLO__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 ROLO__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("ROLO")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
