// ==========================================
// 销售预测决策引擎 - 预测方案与预测结果
// ==========================================
// ForecastPlan / DecisionRecord / ForecastResult
// ==========================================

use crate::domain::dataset::ProductSelection;
use crate::domain::profile::CompletenessProfile;
use crate::domain::types::{DecisionTier, ForecastType, Severity, Trend};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastPlan - 预测方案
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPlan {
    pub forecast_type: ForecastType,
    pub forecast_days: u32,
    /// 是否由用户指定周期覆盖
    pub overridden: bool,
}

// ==========================================
// DecisionRecord - 单日决策记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// 第几天（从 1 开始）
    pub day_offset: usize,
    pub tier: DecisionTier,
    pub icon: String,
    pub severity: Severity,
    pub trend: Trend,
    pub predicted_value: f64,
    /// 相对阈值的变化百分比（阈值 <= 0 时为 0）
    pub pct_change: f64,
    /// 相对预测均值的标准分
    pub z_score: f64,
    pub text: String,
}

// ==========================================
// FeatureReport - 特征列对齐报告
// ==========================================
// 缺失列补零不是错误，但需要给调用方诊断信号
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    /// 模型期望的特征数
    pub expected: usize,
    /// 数据集中存在的期望特征
    pub present: Vec<String>,
    /// 缺失并补零的期望特征
    pub missing: Vec<String>,
    /// 数据集中多余、被丢弃的数值列
    pub dropped: Vec<String>,
    /// 列内缺值按均值补齐的单元格数
    pub imputed_cells: usize,
}

impl FeatureReport {
    /// 是否所有期望特征都存在
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

// ==========================================
// ForecastSummary - 预测汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total: f64,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

impl ForecastSummary {
    /// 由预测值计算汇总；空向量返回全 0
    pub fn from_predictions(predictions: &[f64]) -> Self {
        if predictions.is_empty() {
            return Self {
                total: 0.0,
                average: 0.0,
                highest: 0.0,
                lowest: 0.0,
            };
        }

        let total: f64 = predictions.iter().sum();
        let highest = predictions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = predictions.iter().copied().fold(f64::INFINITY, f64::min);

        Self {
            total,
            average: total / predictions.len() as f64,
            highest,
            lowest,
        }
    }
}

// ==========================================
// ForecastResult - 预测结果（对外聚合）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub forecast_id: String,
    pub product_selection: ProductSelection,
    pub plan: ForecastPlan,
    pub threshold: f64,
    /// 已截断到 forecast_days 的预测值
    pub predictions: Vec<f64>,
    pub decisions: Vec<DecisionRecord>,
    pub profile: CompletenessProfile,
    pub summary: ForecastSummary,
    pub feature_report: FeatureReport,
    pub generated_at: NaiveDateTime,
}

/// 扁平导出行（API 响应 / 表格导出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub day: usize,
    pub predicted_sales: f64,
    pub icon: String,
    pub severity: Severity,
    pub trend: Trend,
    pub decision: String,
}

impl ForecastResult {
    /// 展开为逐日扁平行
    pub fn to_rows(&self) -> Vec<ForecastRow> {
        self.decisions
            .iter()
            .map(|d| ForecastRow {
                day: d.day_offset,
                predicted_sales: d.predicted_value,
                icon: d.icon.clone(),
                severity: d.severity,
                trend: d.trend,
                decision: d.text.clone(),
            })
            .collect()
    }

    /// 严重程度最高的决策（同级取最早一天）
    pub fn most_severe(&self) -> Option<&DecisionRecord> {
        self.decisions
            .iter()
            .fold(None, |best: Option<&DecisionRecord>, d| match best {
                Some(b) if b.severity >= d.severity => Some(b),
                _ => Some(d),
            })
    }
}
