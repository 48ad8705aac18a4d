// ==========================================
// 销售预测决策引擎 - 预测配置
// ==========================================
// 职责: 列名约定、默认阈值、预测周期策略常量
// 默认值可被 config_kv 表或 JSON 文件覆写
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// 默认销售阈值（调用方未设置时使用）
pub const DEFAULT_THRESHOLD: f64 = 100.0;

// ==========================================
// HorizonPolicy - 预测周期判定表常量
// ==========================================
// 短期回退公式 clamp(distinct_days / divisor, min, max) 的除数与上下限
// 没有推导依据，保留为可调策略常量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonPolicy {
    pub quarterly_min_months: usize,
    pub quarterly_min_completeness: f64,
    pub monthly_min_months: usize,
    pub monthly_min_completeness: f64,
    pub weekly_min_weeks: usize,
    pub weekly_min_completeness: f64,
    pub short_term_divisor: usize,
    pub short_term_min_days: u32,
    pub short_term_max_days: u32,
}

impl Default for HorizonPolicy {
    fn default() -> Self {
        Self {
            quarterly_min_months: 4,
            quarterly_min_completeness: 0.7,
            monthly_min_months: 2,
            monthly_min_completeness: 0.5,
            weekly_min_weeks: 3,
            weekly_min_completeness: 0.6,
            short_term_divisor: 2,
            short_term_min_days: 3,
            short_term_max_days: 15,
        }
    }
}

// ==========================================
// ForecastConfig - 预测配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// 日期列名
    pub date_column: String,

    /// 产品列名
    pub product_column: String,

    /// 训练目标列（推理时排除）
    pub target_column: String,

    /// 派生日历列（推理时排除）
    pub calendar_columns: Vec<String>,

    /// 可接受的日期格式（按顺序尝试）
    pub date_formats: Vec<String>,

    /// 默认阈值
    pub default_threshold: f64,

    /// 决策文案语言（en / zh-CN）
    pub locale: String,

    /// 预测周期判定策略
    pub horizon: HorizonPolicy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            date_column: "Date".to_string(),
            product_column: "Product Name".to_string(),
            target_column: "Total Sales".to_string(),
            calendar_columns: ["Year", "Month", "Day", "Week", "Weekday", "Day of Week", "Quarter"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            date_formats: ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%Y%m%d"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_threshold: DEFAULT_THRESHOLD,
            locale: "en".to_string(),
            horizon: HorizonPolicy::default(),
        }
    }
}

impl ForecastConfig {
    /// 从 JSON 文件加载配置（缺省字段取默认值）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config: ForecastConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// 是否为簿记列（日期/产品/目标/日历派生列），不参与特征矩阵
    pub fn is_bookkeeping_column(&self, name: &str) -> bool {
        name == self.date_column
            || name == self.product_column
            || name == self.target_column
            || self
                .calendar_columns
                .iter()
                .any(|c| c.eq_ignore_ascii_case(name))
    }
}
