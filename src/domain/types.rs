// ==========================================
// 销售预测决策引擎 - 领域类型定义
// ==========================================
// 预测周期 / 严重程度 / 趋势 / 决策档位
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 预测周期类型 (Forecast Type)
// ==========================================
// 序列化格式: kebab-case (与 API 请求参数一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastType {
    Quarterly, // 季度 (90 天)
    Monthly,   // 月度 (30 天)
    Weekly,    // 周度 (7 天)
    ShortTerm, // 短期 (3~15 天, 由数据量推算)
}

impl ForecastType {
    /// 固定周期类型对应的天数
    ///
    /// ShortTerm 的天数由数据量推算, 此处返回 None
    pub fn fixed_days(&self) -> Option<u32> {
        match self {
            ForecastType::Quarterly => Some(90),
            ForecastType::Monthly => Some(30),
            ForecastType::Weekly => Some(7),
            ForecastType::ShortTerm => None,
        }
    }

    /// 解析用户指定的周期类型
    ///
    /// 只接受 weekly / monthly / quarterly（忽略大小写与首尾空白）,
    /// 其他值（包括 short-term）一律视为未指定
    pub fn parse_override(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Some(ForecastType::Weekly),
            "monthly" => Some(ForecastType::Monthly),
            "quarterly" => Some(ForecastType::Quarterly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastType::Quarterly => "quarterly",
            ForecastType::Monthly => "monthly",
            ForecastType::Weekly => "weekly",
            ForecastType::ShortTerm => "short-term",
        }
    }
}

impl fmt::Display for ForecastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 严重程度 (Severity)
// ==========================================
// 顺序: None < Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::None => write!(f, "none"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

// ==========================================
// 趋势 (Trend)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Positive => write!(f, "positive"),
            Trend::Neutral => write!(f, "neutral"),
            Trend::Negative => write!(f, "negative"),
        }
    }
}

// ==========================================
// 决策档位 (Decision Tier)
// ==========================================
// 红线: 档位制,按表顺序命中即返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionTier {
    MajorIncrease,
    ModerateGrowth,
    SmallIncrease,
    Stable,
    SmallDecline,
    ModerateDrop,
    MajorDrop,
}

impl DecisionTier {
    pub fn severity(&self) -> Severity {
        match self {
            DecisionTier::MajorIncrease | DecisionTier::MajorDrop => Severity::High,
            DecisionTier::ModerateGrowth | DecisionTier::ModerateDrop => Severity::Medium,
            DecisionTier::SmallIncrease | DecisionTier::SmallDecline => Severity::Low,
            DecisionTier::Stable => Severity::None,
        }
    }

    pub fn trend(&self) -> Trend {
        match self {
            DecisionTier::MajorIncrease
            | DecisionTier::ModerateGrowth
            | DecisionTier::SmallIncrease => Trend::Positive,
            DecisionTier::Stable => Trend::Neutral,
            DecisionTier::SmallDecline | DecisionTier::ModerateDrop | DecisionTier::MajorDrop => {
                Trend::Negative
            }
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DecisionTier::MajorIncrease => "🚀",
            DecisionTier::ModerateGrowth => "📈",
            DecisionTier::SmallIncrease => "↗️",
            DecisionTier::Stable => "✅",
            DecisionTier::SmallDecline => "↘️",
            DecisionTier::ModerateDrop => "📉",
            DecisionTier::MajorDrop => "⚠️",
        }
    }

    /// i18n 文案键 (decision.<key>)
    pub fn message_key(&self) -> &'static str {
        match self {
            DecisionTier::MajorIncrease => "decision.major_increase",
            DecisionTier::ModerateGrowth => "decision.moderate_growth",
            DecisionTier::SmallIncrease => "decision.small_increase",
            DecisionTier::Stable => "decision.stable",
            DecisionTier::SmallDecline => "decision.small_decline",
            DecisionTier::ModerateDrop => "decision.moderate_drop",
            DecisionTier::MajorDrop => "decision.major_drop",
        }
    }
}

impl fmt::Display for DecisionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionTier::MajorIncrease => write!(f, "Major increase"),
            DecisionTier::ModerateGrowth => write!(f, "Moderate growth"),
            DecisionTier::SmallIncrease => write!(f, "Small increase"),
            DecisionTier::Stable => write!(f, "Stable"),
            DecisionTier::SmallDecline => write!(f, "Small decline"),
            DecisionTier::ModerateDrop => write!(f, "Moderate drop"),
            DecisionTier::MajorDrop => write!(f, "Major drop"),
        }
    }
}
