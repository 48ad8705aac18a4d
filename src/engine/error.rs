// ==========================================
// 销售预测决策引擎 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 规则: 任一阶段失败即中止整个预测，不返回部分结果
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 预测流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStage {
    Validate,
    Profile,
    SelectHorizon,
    BuildFeatures,
    Predict,
    Classify,
    Persist,
    Dispatch,
}

impl fmt::Display for ForecastStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastStage::Validate => write!(f, "validate"),
            ForecastStage::Profile => write!(f, "profile"),
            ForecastStage::SelectHorizon => write!(f, "select_horizon"),
            ForecastStage::BuildFeatures => write!(f, "build_features"),
            ForecastStage::Predict => write!(f, "predict"),
            ForecastStage::Classify => write!(f, "classify"),
            ForecastStage::Persist => write!(f, "persist"),
            ForecastStage::Dispatch => write!(f, "dispatch"),
        }
    }
}

/// 预测器错误（外部模型边界）
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("模型未加载: {0}")]
    NotLoaded(String),

    #[error("模型文件无效: {0}")]
    InvalidArtifact(String),

    #[error("特征矩阵列数不匹配: 期望 {expected}, 实际 {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("推理失败: {0}")]
    Inference(String),
}

impl From<std::io::Error> for PredictorError {
    fn from(err: std::io::Error) -> Self {
        PredictorError::InvalidArtifact(err.to_string())
    }
}

impl From<serde_json::Error> for PredictorError {
    fn from(err: serde_json::Error) -> Self {
        PredictorError::InvalidArtifact(err.to_string())
    }
}

/// 预测流水线错误
#[derive(Error, Debug)]
pub enum ForecastError {
    // ===== 用户可修正 (400 类) =====
    #[error("数据集缺少必填列: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("无有效日期的数据 (产品: {product})，请上传日期可解析的数据")]
    InsufficientData { product: String },

    #[error("阈值无效: {0}（必须为非负有限数）")]
    InvalidThreshold(f64),

    // ===== 服务不可用 (503 类) =====
    #[error("预测模型不可用: {0}")]
    PredictorUnavailable(String),

    // ===== 内部错误 =====
    #[error("预测失败: {0}")]
    Prediction(#[from] PredictorError),

    #[error("预测值无效 (第 {day} 天): {value}")]
    InvalidPrediction { day: usize, value: f64 },

    #[error("预测结果保存失败: {0}")]
    Persistence(String),

    #[error("预测任务异常终止: {0}")]
    TaskAborted(String),
}

impl ForecastError {
    /// 失败所在阶段
    pub fn stage(&self) -> ForecastStage {
        match self {
            ForecastError::Schema { .. } | ForecastError::InvalidThreshold(_) => {
                ForecastStage::Validate
            }
            ForecastError::InsufficientData { .. } => ForecastStage::Profile,
            ForecastError::PredictorUnavailable(_)
            | ForecastError::Prediction(_)
            | ForecastError::InvalidPrediction { .. } => ForecastStage::Predict,
            ForecastError::Persistence(_) => ForecastStage::Persist,
            ForecastError::TaskAborted(_) => ForecastStage::Dispatch,
        }
    }

    /// 是否为用户可修正的输入问题
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            ForecastError::Schema { .. }
                | ForecastError::InsufficientData { .. }
                | ForecastError::InvalidThreshold(_)
        )
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        let err = ForecastError::Schema {
            missing: vec!["Date".to_string()],
        };
        assert_eq!(err.stage(), ForecastStage::Validate);
        assert!(err.is_user_correctable());
        assert!(err.to_string().contains("Date"));

        let err = ForecastError::InsufficientData {
            product: "all".to_string(),
        };
        assert_eq!(err.stage(), ForecastStage::Profile);

        let err = ForecastError::PredictorUnavailable("not loaded".to_string());
        assert_eq!(err.stage(), ForecastStage::Predict);
        assert!(!err.is_user_correctable());
    }

    #[test]
    fn test_predictor_error_conversion() {
        let err: ForecastError = PredictorError::Inference("boom".to_string()).into();
        assert!(matches!(err, ForecastError::Prediction(_)));
        assert_eq!(err.stage(), ForecastStage::Predict);
    }
}
