// ==========================================
// 销售预测决策引擎 - 预测周期选择引擎
// ==========================================
// 规则（顺序执行，命中即返回）:
// 1) 季度: 月数 >= 4 且 月覆盖率 >= 0.7 → 90 天
// 2) 月度: 月数 >= 2 且 月覆盖率 >= 0.5 → 30 天
// 3) 周度: 周数 >= 3 且 周覆盖率 >= 0.6 → 7 天
// 4) 短期: clamp(distinct_days / 2, 3, 15)
// 用户指定 weekly/monthly/quarterly 时整体替换，不做完整度检查
// ==========================================

use crate::config::forecast_config::HorizonPolicy;
use crate::domain::forecast::ForecastPlan;
use crate::domain::profile::CompletenessProfile;
use crate::domain::types::ForecastType;
use tracing::{debug, warn};

// ==========================================
// HorizonSelector - 预测周期选择引擎
// ==========================================
pub struct HorizonSelector {
    policy: HorizonPolicy,
}

impl HorizonSelector {
    pub fn new(policy: HorizonPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &HorizonPolicy {
        &self.policy
    }

    /// 选择预测方案
    ///
    /// # 参数
    /// - profile: 完整度画像
    /// - user_override: 用户指定的周期类型（原始字符串，非法值视为未指定）
    pub fn select(&self, profile: &CompletenessProfile, user_override: Option<&str>) -> ForecastPlan {
        if let Some(raw) = user_override {
            match ForecastType::parse_override(raw) {
                Some(forecast_type) => {
                    // fixed_days 对三种可覆盖类型必有值
                    let forecast_days = forecast_type.fixed_days().unwrap_or(0);
                    debug!(forecast_type = %forecast_type, forecast_days, "使用用户指定预测周期");
                    return ForecastPlan {
                        forecast_type,
                        forecast_days,
                        overridden: true,
                    };
                }
                None => {
                    if !raw.trim().is_empty() {
                        warn!(user_override = raw, "用户指定的预测周期无效，按数据完整度自动选择");
                    }
                }
            }
        }

        let plan = self.select_by_completeness(profile);
        debug!(
            forecast_type = %plan.forecast_type,
            forecast_days = plan.forecast_days,
            "按数据完整度选择预测周期"
        );
        plan
    }

    /// 按判定表自动选择（无覆盖）
    pub fn select_by_completeness(&self, profile: &CompletenessProfile) -> ForecastPlan {
        let p = &self.policy;

        let forecast_type = if profile.distinct_months >= p.quarterly_min_months
            && profile.monthly_completeness >= p.quarterly_min_completeness
        {
            ForecastType::Quarterly
        } else if profile.distinct_months >= p.monthly_min_months
            && profile.monthly_completeness >= p.monthly_min_completeness
        {
            ForecastType::Monthly
        } else if profile.distinct_weeks >= p.weekly_min_weeks
            && profile.weekly_completeness >= p.weekly_min_completeness
        {
            ForecastType::Weekly
        } else {
            ForecastType::ShortTerm
        };

        let forecast_days = forecast_type
            .fixed_days()
            .unwrap_or_else(|| self.short_term_days(profile.distinct_days));

        ForecastPlan {
            forecast_type,
            forecast_days,
            overridden: false,
        }
    }

    /// 短期天数 = clamp(distinct_days / divisor, min, max)（整数除法）
    pub fn short_term_days(&self, distinct_days: usize) -> u32 {
        let divisor = self.policy.short_term_divisor.max(1);
        let raw = u32::try_from(distinct_days / divisor).unwrap_or(u32::MAX);
        raw.clamp(
            self.policy.short_term_min_days,
            self.policy.short_term_max_days.max(self.policy.short_term_min_days),
        )
    }
}

impl Default for HorizonSelector {
    fn default() -> Self {
        Self::new(HorizonPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn profile(months: usize, monthly: f64, weeks: usize, weekly: f64, days: usize) -> CompletenessProfile {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CompletenessProfile {
            record_count: days,
            first_date: d,
            last_date: d,
            span_days: days as i64,
            distinct_days: days,
            distinct_months: months,
            distinct_weeks: weeks,
            monthly_completeness: monthly,
            weekly_completeness: weekly,
            day_density: 1.0,
        }
    }

    #[test]
    fn test_quarterly_boundary_inclusive() {
        let selector = HorizonSelector::default();
        let plan = selector.select(&profile(4, 0.7, 16, 0.7, 84), None);
        assert_eq!(plan.forecast_type, ForecastType::Quarterly);
        assert_eq!(plan.forecast_days, 90);
        assert!(!plan.overridden);
    }

    #[test]
    fn test_monthly_when_quarterly_completeness_short() {
        let selector = HorizonSelector::default();
        let plan = selector.select(&profile(6, 0.69, 24, 0.7, 124), None);
        assert_eq!(plan.forecast_type, ForecastType::Monthly);
        assert_eq!(plan.forecast_days, 30);
    }

    #[test]
    fn test_weekly_tier() {
        let selector = HorizonSelector::default();
        let plan = selector.select(&profile(1, 0.6, 3, 0.6, 18), None);
        assert_eq!(plan.forecast_type, ForecastType::Weekly);
        assert_eq!(plan.forecast_days, 7);
    }

    #[test]
    fn test_short_term_clamp() {
        let selector = HorizonSelector::default();
        assert_eq!(selector.short_term_days(0), 3);
        assert_eq!(selector.short_term_days(1), 3);
        assert_eq!(selector.short_term_days(7), 3);
        assert_eq!(selector.short_term_days(10), 5);
        assert_eq!(selector.short_term_days(11), 5);
        assert_eq!(selector.short_term_days(30), 15);
        assert_eq!(selector.short_term_days(400), 15);
    }

    #[test]
    fn test_override_wins_regardless_of_completeness() {
        let selector = HorizonSelector::default();
        let sparse = profile(1, 0.01, 1, 0.01, 1);
        let plan = selector.select(&sparse, Some("monthly"));
        assert_eq!(plan.forecast_type, ForecastType::Monthly);
        assert_eq!(plan.forecast_days, 30);
        assert!(plan.overridden);

        let rich = profile(12, 1.0, 52, 1.0, 365);
        let plan = selector.select(&rich, Some("weekly"));
        assert_eq!(plan.forecast_type, ForecastType::Weekly);
        assert_eq!(plan.forecast_days, 7);
    }

    #[test]
    fn test_invalid_override_ignored() {
        let selector = HorizonSelector::default();
        let p = profile(5, 0.8, 20, 0.8, 120);
        assert_eq!(selector.select(&p, Some("short-term")), selector.select(&p, None));
        assert_eq!(selector.select(&p, Some("daily")), selector.select(&p, None));
    }
}
