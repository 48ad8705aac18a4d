// ==========================================
// 销售预测决策引擎 - 数据仓储层
// ==========================================
// 职责: 预测历史的持久化
// ==========================================

pub mod error;
pub mod forecast_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use forecast_repo::{ForecastHistoryEntry, ForecastRepository};
