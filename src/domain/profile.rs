// ==========================================
// 销售预测决策引擎 - 数据完整度画像
// ==========================================
// 生命周期: 每次预测请求计算一次，不单独持久化
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 数据完整度画像（只读快照）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessProfile {
    /// 参与统计的记录数
    pub record_count: usize,

    /// 最早日期
    pub first_date: NaiveDate,

    /// 最晚日期
    pub last_date: NaiveDate,

    /// 日期跨度（天）= last_date - first_date
    pub span_days: i64,

    /// 有数据的不同日期数
    pub distinct_days: usize,

    /// 有数据的不同自然月数 (year, month)
    pub distinct_months: usize,

    /// 有数据的不同 ISO 周数 (iso_year, iso_week)
    pub distinct_weeks: usize,

    /// 月内覆盖率均值（每月不同日期数 / 30 的平均）
    pub monthly_completeness: f64,

    /// 周内覆盖率均值（每周不同日期数 / 7 的平均）
    pub weekly_completeness: f64,

    /// 日密度 = distinct_days / max(span_days, 1)
    pub day_density: f64,
}
