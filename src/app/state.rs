// ==========================================
// 销售预测决策引擎 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 共享: 一个 SQLite 连接（配置 + 预测历史）、一个只读预测器
// ==========================================

use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use crate::api::ForecastApi;
use crate::config::config_manager::ConfigManager;
use crate::config::forecast_config::ForecastConfig;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::predictor::LinearModelPredictor;
use crate::repository::forecast_repo::ForecastRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SALES_FORECAST_DB_PATH";

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生效的预测配置（默认值 + config_kv 覆写）
    pub config: ForecastConfig,

    pub config_manager: Arc<ConfigManager>,

    pub forecast_api: Arc<ForecastApi<LinearModelPredictor>>,
}

impl AppState {
    /// 创建应用状态
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - model_path: 线性模型 JSON 文件路径
    pub fn new<P: AsRef<Path>>(db_path: String, model_path: P) -> Result<Self, Box<dyn Error>> {
        info!(db_path = %db_path, "初始化应用状态");

        let conn = open_sqlite_connection(&db_path)?;
        ensure_schema(&conn)?;
        let conn: Arc<Mutex<Connection>> = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let config = config_manager.load_forecast_config()?;

        let predictor = Arc::new(LinearModelPredictor::from_json_file(model_path)?);
        let repo = Arc::new(ForecastRepository::new(conn));
        let forecast_api = Arc::new(ForecastApi::new(predictor, config.clone(), repo));

        Ok(Self {
            db_path,
            config,
            config_manager,
            forecast_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 SALES_FORECAST_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./sales_forecast.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("sales-forecast");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("sales_forecast.db");
        }
    }

    path.to_string_lossy().to_string()
}
