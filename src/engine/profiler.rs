// ==========================================
// 销售预测决策引擎 - 数据完整度画像引擎
// ==========================================
// 输入: 数据集 + 产品选择
// 输出: CompletenessProfile
// 红线: 不排除任何稀疏周期，单条记录的月/周同样参与均值
// ==========================================

use crate::domain::dataset::{Dataset, ProductSelection, SalesRecord};
use crate::domain::profile::CompletenessProfile;
use crate::engine::error::{EngineResult, ForecastError};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// 月覆盖率分母（天）
pub const DAYS_PER_MONTH: f64 = 30.0;

/// 周覆盖率分母（天）
pub const DAYS_PER_WEEK: f64 = 7.0;

// ==========================================
// DataProfiler - 数据完整度画像引擎
// ==========================================
pub struct DataProfiler {
    // 无状态引擎
}

impl DataProfiler {
    pub fn new() -> Self {
        Self {}
    }

    /// 按产品选择过滤后计算画像
    ///
    /// # 返回
    /// - Err(InsufficientData): 过滤后没有任何有效日期记录
    #[instrument(skip(self, dataset, selection), fields(selection = %selection))]
    pub fn profile(
        &self,
        dataset: &Dataset,
        selection: &ProductSelection,
    ) -> EngineResult<CompletenessProfile> {
        let records = dataset.filter(selection);
        self.profile_records(&records).ok_or_else(|| ForecastError::InsufficientData {
            product: selection.to_string(),
        })
    }

    /// 对已过滤的记录计算画像；无记录返回 None
    pub fn profile_records(&self, records: &[&SalesRecord]) -> Option<CompletenessProfile> {
        let days: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();
        let first_date = *days.iter().next()?;
        let last_date = *days.iter().next_back()?;

        // 各月 / 各 ISO 周内的不同日期数
        let mut month_days: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        let mut week_days: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for day in &days {
            *month_days.entry((day.year(), day.month())).or_insert(0) += 1;
            let iso = day.iso_week();
            *week_days.entry((iso.year(), iso.week())).or_insert(0) += 1;
        }

        let span_days = (last_date - first_date).num_days();
        let monthly_completeness = mean_coverage(month_days.values(), DAYS_PER_MONTH);
        let weekly_completeness = mean_coverage(week_days.values(), DAYS_PER_WEEK);
        let day_density = days.len() as f64 / span_days.max(1) as f64;

        let profile = CompletenessProfile {
            record_count: records.len(),
            first_date,
            last_date,
            span_days,
            distinct_days: days.len(),
            distinct_months: month_days.len(),
            distinct_weeks: week_days.len(),
            monthly_completeness,
            weekly_completeness,
            day_density,
        };

        debug!(
            record_count = profile.record_count,
            span_days = profile.span_days,
            distinct_days = profile.distinct_days,
            distinct_months = profile.distinct_months,
            distinct_weeks = profile.distinct_weeks,
            monthly_completeness = profile.monthly_completeness,
            weekly_completeness = profile.weekly_completeness,
            "数据完整度画像完成"
        );

        Some(profile)
    }
}

impl Default for DataProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// 各周期覆盖率（不同日期数 / 周期天数）的算术平均
fn mean_coverage<'a, I>(counts: I, period_days: f64) -> f64
where
    I: ExactSizeIterator<Item = &'a usize>,
{
    let periods = counts.len();
    if periods == 0 {
        return 0.0;
    }
    let total: usize = counts.sum();
    total as f64 / periods as f64 / period_days
}
