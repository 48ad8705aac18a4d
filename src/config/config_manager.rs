// ==========================================
// 销售预测决策引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::forecast_config::{ForecastConfig, HorizonPolicy};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取并解析数值配置；缺失或格式错误时返回默认值
    fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy,
    {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 加载预测配置（config_kv 覆写默认值）
    pub fn load_forecast_config(&self) -> Result<ForecastConfig, Box<dyn Error>> {
        let defaults = ForecastConfig::default();
        let policy = HorizonPolicy::default();

        let mut config = ForecastConfig {
            default_threshold: self
                .get_parsed_or(config_keys::DEFAULT_THRESHOLD, defaults.default_threshold)?,
            horizon: HorizonPolicy {
                quarterly_min_months: self
                    .get_parsed_or(config_keys::QUARTERLY_MIN_MONTHS, policy.quarterly_min_months)?,
                quarterly_min_completeness: self.get_parsed_or(
                    config_keys::QUARTERLY_MIN_COMPLETENESS,
                    policy.quarterly_min_completeness,
                )?,
                monthly_min_months: self
                    .get_parsed_or(config_keys::MONTHLY_MIN_MONTHS, policy.monthly_min_months)?,
                monthly_min_completeness: self.get_parsed_or(
                    config_keys::MONTHLY_MIN_COMPLETENESS,
                    policy.monthly_min_completeness,
                )?,
                weekly_min_weeks: self
                    .get_parsed_or(config_keys::WEEKLY_MIN_WEEKS, policy.weekly_min_weeks)?,
                weekly_min_completeness: self.get_parsed_or(
                    config_keys::WEEKLY_MIN_COMPLETENESS,
                    policy.weekly_min_completeness,
                )?,
                short_term_divisor: self
                    .get_parsed_or(config_keys::SHORT_TERM_DIVISOR, policy.short_term_divisor)?,
                short_term_min_days: self
                    .get_parsed_or(config_keys::SHORT_TERM_MIN_DAYS, policy.short_term_min_days)?,
                short_term_max_days: self
                    .get_parsed_or(config_keys::SHORT_TERM_MAX_DAYS, policy.short_term_max_days)?,
            },
            ..defaults
        };

        if let Some(v) = self.get_config_value(config_keys::DATE_COLUMN)? {
            config.date_column = v;
        }
        if let Some(v) = self.get_config_value(config_keys::PRODUCT_COLUMN)? {
            config.product_column = v;
        }
        if let Some(v) = self.get_config_value(config_keys::TARGET_COLUMN)? {
            config.target_column = v;
        }
        if let Some(v) = self.get_config_value(config_keys::LOCALE)? {
            config.locale = v;
        }
        if let Some(raw) = self.get_config_value(config_keys::CALENDAR_COLUMNS)? {
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(cols) => config.calendar_columns = cols,
                Err(_) => tracing::warn!(
                    config_key = config_keys::CALENDAR_COLUMNS,
                    raw_value = %raw,
                    "日历列配置格式错误，使用默认配置"
                ),
            }
        }

        if config.horizon.short_term_divisor == 0 {
            tracing::warn!("short_term_divisor 配置为 0，回退为默认值");
            config.horizon.short_term_divisor = policy.short_term_divisor;
        }

        Ok(config)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 列名约定
    pub const DATE_COLUMN: &str = "date_column";
    pub const PRODUCT_COLUMN: &str = "product_column";
    pub const TARGET_COLUMN: &str = "target_column";
    pub const CALENDAR_COLUMNS: &str = "calendar_columns"; // JSON 数组

    // 阈值与文案
    pub const DEFAULT_THRESHOLD: &str = "default_threshold";
    pub const LOCALE: &str = "locale";

    // 预测周期判定表
    pub const QUARTERLY_MIN_MONTHS: &str = "horizon_quarterly_min_months";
    pub const QUARTERLY_MIN_COMPLETENESS: &str = "horizon_quarterly_min_completeness";
    pub const MONTHLY_MIN_MONTHS: &str = "horizon_monthly_min_months";
    pub const MONTHLY_MIN_COMPLETENESS: &str = "horizon_monthly_min_completeness";
    pub const WEEKLY_MIN_WEEKS: &str = "horizon_weekly_min_weeks";
    pub const WEEKLY_MIN_COMPLETENESS: &str = "horizon_weekly_min_completeness";
    pub const SHORT_TERM_DIVISOR: &str = "horizon_short_term_divisor";
    pub const SHORT_TERM_MIN_DAYS: &str = "horizon_short_term_min_days";
    pub const SHORT_TERM_MAX_DAYS: &str = "horizon_short_term_max_days";
}
