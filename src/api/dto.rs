// ==========================================
// 销售预测决策引擎 - API 数据传输对象
// ==========================================

use crate::domain::forecast::{ForecastResult, ForecastRow, ForecastSummary};
use crate::domain::profile::CompletenessProfile;
use crate::importer::dataset_loader::LoadReport;
use serde::{Deserialize, Serialize};

/// 产品列表响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    /// 首项恒为 "all"
    pub products: Vec<String>,
    pub load_report: LoadReport,
}

/// 预测响应（扁平化，供前端/报表直接使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub forecast_id: String,
    pub product_selection: String,
    pub forecast_type: String,
    pub forecast_days: u32,
    pub overridden: bool,
    pub threshold: f64,
    pub summary: ForecastSummary,
    pub rows: Vec<ForecastRow>,
    pub profile: CompletenessProfile,
    /// 所有模型特征均存在
    pub features_complete: bool,
    /// 缺失并补零的特征
    pub missing_features: Vec<String>,
    /// 整体最严重决策的图标（无决策时为 💡）
    pub headline_icon: String,
    pub generated_at: String,
}

impl From<&ForecastResult> for ForecastResponse {
    fn from(result: &ForecastResult) -> Self {
        Self {
            forecast_id: result.forecast_id.clone(),
            product_selection: result.product_selection.to_string(),
            forecast_type: result.plan.forecast_type.to_string(),
            forecast_days: result.plan.forecast_days,
            overridden: result.plan.overridden,
            threshold: result.threshold,
            summary: result.summary,
            rows: result.to_rows(),
            profile: result.profile.clone(),
            features_complete: result.feature_report.is_complete(),
            missing_features: result.feature_report.missing.clone(),
            headline_icon: result
                .most_severe()
                .map(|d| d.icon.clone())
                .unwrap_or_else(|| "💡".to_string()),
            generated_at: result.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// 批量预测单项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchForecastItem {
    pub product_selection: String,
    pub forecast: Option<ForecastResponse>,
    pub error: Option<String>,
}
