// ==========================================
// 销售预测决策引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod dataset;
pub mod forecast;
pub mod profile;
pub mod types;

// 重导出核心类型
pub use dataset::{Dataset, ProductSelection, SalesRecord, ALL_PRODUCTS};
pub use forecast::{
    DecisionRecord, FeatureReport, ForecastPlan, ForecastResult, ForecastRow, ForecastSummary,
};
pub use profile::CompletenessProfile;
pub use types::{DecisionTier, ForecastType, Severity, Trend};
