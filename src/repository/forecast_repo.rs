// ==========================================
// 销售预测决策引擎 - 预测历史数据仓储
// ==========================================
// 表: forecast_history
// 结果整体以 JSON 存储，摘要字段单独成列便于列表查询
// 红线: Repository 不做业务逻辑，只做数据映射
// ==========================================

use crate::db;
use crate::domain::forecast::ForecastResult;
use crate::engine::sink::ForecastSink;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// created_at 存储格式（微秒精度，保证同秒内的先后顺序）
const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// ==========================================
// ForecastHistoryEntry - 历史列表项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastHistoryEntry {
    pub forecast_id: String,
    pub product_selection: String,
    pub forecast_type: String,
    pub forecast_days: u32,
    pub threshold: f64,
    pub total_sales: f64,
    pub created_at: NaiveDateTime,
}

// ==========================================
// ForecastRepository - 预测历史仓储
// ==========================================
pub struct ForecastRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ForecastRepository {
    /// 基于共享连接创建（调用方负责 ensure_schema）
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 打开数据库文件并初始化 schema
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        db::ensure_schema(&conn)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 保存预测结果
    ///
    /// # 返回
    /// - `Ok(forecast_id)`
    /// - `Err(UniqueConstraintViolation)`: forecast_id 已存在
    pub fn insert(&self, result: &ForecastResult) -> RepositoryResult<String> {
        let result_json = serde_json::to_string(result)?;
        let forecast_days = i64::from(result.plan.forecast_days);
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO forecast_history (
                forecast_id, product_selection, forecast_type, forecast_days,
                threshold, total_sales, result_json, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                result.forecast_id,
                result.product_selection.as_str(),
                result.plan.forecast_type.as_str(),
                forecast_days,
                result.threshold,
                result.summary.total,
                result_json,
                result.generated_at.format(TS_FORMAT).to_string(),
            ],
        )?;

        debug!(forecast_id = %result.forecast_id, "预测结果已保存");
        Ok(result.forecast_id.clone())
    }

    /// 删除预测记录
    ///
    /// # 返回
    /// - Ok(true): 已删除；Ok(false): 记录不存在
    pub fn delete(&self, forecast_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM forecast_history WHERE forecast_id = ?1",
            params![forecast_id],
        )?;
        Ok(rows > 0)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 forecast_id 查询完整结果
    pub fn find_by_id(&self, forecast_id: &str) -> RepositoryResult<Option<ForecastResult>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT result_json FROM forecast_history WHERE forecast_id = ?")?;

        let raw: Option<String> = match stmt.query_row(params![forecast_id], |row| row.get(0)) {
            Ok(json) => Some(json),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => return Err(e.into()),
        };

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// 最近的预测记录（按创建时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ForecastHistoryEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT forecast_id, product_selection, forecast_type, forecast_days,
                   threshold, total_sales, created_at
            FROM forecast_history
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = stmt
            .query_map(params![limit], map_entry)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// 指定产品选择的预测记录（按创建时间倒序）
    pub fn list_by_product(&self, product_selection: &str) -> RepositoryResult<Vec<ForecastHistoryEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT forecast_id, product_selection, forecast_type, forecast_days,
                   threshold, total_sales, created_at
            FROM forecast_history
            WHERE product_selection = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let entries = stmt
            .query_map(params![product_selection], map_entry)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM forecast_history", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

fn map_entry(row: &Row) -> SqliteResult<ForecastHistoryEntry> {
    let created_at: String = row.get(6)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let forecast_days: i64 = row.get(3)?;

    Ok(ForecastHistoryEntry {
        forecast_id: row.get(0)?,
        product_selection: row.get(1)?,
        forecast_type: row.get(2)?,
        forecast_days: u32::try_from(forecast_days).unwrap_or(0),
        threshold: row.get(4)?,
        total_sales: row.get(5)?,
        created_at,
    })
}

impl ForecastSink for ForecastRepository {
    fn save_forecast(&self, result: &ForecastResult) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.insert(result)?;
        Ok(())
    }
}
