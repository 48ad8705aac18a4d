// ==========================================
// 销售预测决策引擎 - 决策分类引擎
// ==========================================
// 输入: 预测向量 + 阈值 + 产品上下文
// 输出: 逐日 DecisionRecord（顺序与预测向量一致）
// 规则: 有序规则表，自上而下首个命中即提交
//       每条规则为 (百分比区间 OR 标准分区间)
//       末条规则恒为真，保证全覆盖
// ==========================================

use crate::domain::dataset::ProductSelection;
use crate::domain::forecast::DecisionRecord;
use crate::domain::types::DecisionTier;
use crate::i18n::{self, DEFAULT_LOCALE};
use tracing::{debug, instrument};

/// 规则谓词: (pct_change, z_score) -> 是否命中
type TierPredicate = fn(f64, f64) -> bool;

fn is_major_increase(pct: f64, z: f64) -> bool {
    pct >= 50.0 || z > 2.0
}

fn is_moderate_growth(pct: f64, z: f64) -> bool {
    (20.0..50.0).contains(&pct) || (z > 1.0 && z <= 2.0)
}

fn is_small_increase(pct: f64, z: f64) -> bool {
    (5.0..20.0).contains(&pct) || (z > 0.5 && z <= 1.0)
}

fn is_stable(pct: f64, z: f64) -> bool {
    (-5.0..5.0).contains(&pct) || (-0.5..=0.5).contains(&z)
}

fn is_small_decline(pct: f64, z: f64) -> bool {
    (-20.0..-5.0).contains(&pct) || (-1.0..-0.5).contains(&z)
}

fn is_moderate_drop(pct: f64, z: f64) -> bool {
    (-50.0..-20.0).contains(&pct) || (-2.0..-1.0).contains(&z)
}

fn otherwise(_pct: f64, _z: f64) -> bool {
    true
}

/// 决策规则表（顺序即优先级）
pub const DECISION_RULES: &[(DecisionTier, TierPredicate)] = &[
    (DecisionTier::MajorIncrease, is_major_increase),
    (DecisionTier::ModerateGrowth, is_moderate_growth),
    (DecisionTier::SmallIncrease, is_small_increase),
    (DecisionTier::Stable, is_stable),
    (DecisionTier::SmallDecline, is_small_decline),
    (DecisionTier::ModerateDrop, is_moderate_drop),
    (DecisionTier::MajorDrop, otherwise),
];

// ==========================================
// SpreadStats - 预测向量分布（每次调用计算一次）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadStats {
    pub mean: f64,
    /// 样本标准差；单点时为 mean * 0.1
    pub stdev: f64,
}

impl SpreadStats {
    /// 空向量返回 None
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let stdev = if values.len() > 1 {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1.0)).sqrt()
        } else {
            mean * 0.1
        };
        Some(Self { mean, stdev })
    }

    /// 标准分（分母下限 1）
    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.stdev.max(1.0)
    }
}

/// 相对阈值变化百分比；阈值 <= 0 时为 0
pub fn pct_change(value: f64, threshold: f64) -> f64 {
    if threshold > 0.0 {
        (value - threshold) / threshold * 100.0
    } else {
        0.0
    }
}

/// 按规则表分档（全覆盖）
pub fn classify_tier(pct: f64, z: f64) -> DecisionTier {
    DECISION_RULES
        .iter()
        .find(|(_, predicate)| predicate(pct, z))
        .map(|(tier, _)| *tier)
        .unwrap_or(DecisionTier::MajorDrop)
}

// ==========================================
// DecisionClassifier - 决策分类引擎
// ==========================================
pub struct DecisionClassifier {
    locale: String,
}

impl DecisionClassifier {
    pub fn new() -> Self {
        Self::with_locale(DEFAULT_LOCALE)
    }

    /// 指定决策文案语言
    pub fn with_locale(locale: &str) -> Self {
        Self {
            locale: i18n::normalize_locale(locale),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// 对预测向量逐日分类
    ///
    /// # 参数
    /// - predictions: 已截断的预测向量（第 i 个元素对应第 i+1 天）
    /// - threshold: 阈值
    /// - product: 产品上下文（决定文案中的 "for <product>" / "overall"）
    #[instrument(skip(self, predictions, product), fields(n = predictions.len(), product = %product))]
    pub fn classify(
        &self,
        predictions: &[f64],
        threshold: f64,
        product: &ProductSelection,
    ) -> Vec<DecisionRecord> {
        let stats = match SpreadStats::from_values(predictions) {
            Some(s) => s,
            None => return Vec::new(),
        };

        let context = self.product_context(product);

        let decisions: Vec<DecisionRecord> = predictions
            .iter()
            .enumerate()
            .map(|(idx, &value)| {
                let day_offset = idx + 1;
                let pct = pct_change(value, threshold);
                let z = stats.z_score(value);
                let tier = classify_tier(pct, z);
                DecisionRecord {
                    day_offset,
                    tier,
                    icon: tier.icon().to_string(),
                    severity: tier.severity(),
                    trend: tier.trend(),
                    predicted_value: value,
                    pct_change: pct,
                    z_score: z,
                    text: self.render_text(tier, day_offset, &context, value, pct),
                }
            })
            .collect();

        debug!(
            mean = stats.mean,
            stdev = stats.stdev,
            decisions = decisions.len(),
            "决策分类完成"
        );
        decisions
    }

    fn product_context(&self, product: &ProductSelection) -> String {
        match product {
            ProductSelection::All => i18n::t_in(&self.locale, "common.overall", &[]),
            ProductSelection::Product(name) => {
                i18n::t_in(&self.locale, "common.for_product", &[("product", name)])
            }
        }
    }

    fn render_text(
        &self,
        tier: DecisionTier,
        day_offset: usize,
        context: &str,
        value: f64,
        pct: f64,
    ) -> String {
        let day = day_offset.to_string();
        let value = format!("{:.2}", value);
        let pct = format!("{:+.1}", pct);
        i18n::t_in(
            &self.locale,
            tier.message_key(),
            &[
                ("day", day.as_str()),
                ("context", context),
                ("value", value.as_str()),
                ("pct", pct.as_str()),
            ],
        )
    }
}

impl Default for DecisionClassifier {
    fn default() -> Self {
        Self::new()
    }
}
