// ==========================================
// 销售预测决策引擎 - 预测器边界
// ==========================================
// SalesPredictor: 外部回归模型的能力接口（只读推理，可并发共享）
// LinearModelPredictor: 读取导出的线性模型文件
//   y_scaled = bias + Σ w_i * (x_i - mean_i) / scale_i
//   y = y_scaled * (y_max - y_min) + y_min   （提供目标区间时）
//   clip_negative = true 时负值截为 0
// ==========================================

use crate::engine::error::PredictorError;
use crate::engine::features::FeatureMatrix;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// SalesPredictor Trait
// ==========================================
pub trait SalesPredictor: Send + Sync {
    /// 模型期望的特征名（顺序即矩阵列顺序）
    fn feature_names(&self) -> &[String];

    /// 模型是否已就绪
    fn is_ready(&self) -> bool {
        true
    }

    /// 逐行推理，返回业务单位的预测值（每行一个）
    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, PredictorError>;
}

// ==========================================
// LinearModelArtifact - 模型文件结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub feature_names: Vec<String>,
    /// 特征标准化均值
    pub x_mean: Vec<f64>,
    /// 特征标准化尺度（0 视为 1）
    pub x_scale: Vec<f64>,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
    /// 目标 min-max 区间（两者同时提供才生效）
    #[serde(default)]
    pub y_min: Option<f64>,
    #[serde(default)]
    pub y_max: Option<f64>,
    #[serde(default)]
    pub clip_negative: bool,
}

impl LinearModelArtifact {
    /// 校验向量长度一致且数值有限
    pub fn validate(&self) -> Result<(), PredictorError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(PredictorError::InvalidArtifact(
                "feature_names 为空".to_string(),
            ));
        }
        for (name, len) in [
            ("x_mean", self.x_mean.len()),
            ("x_scale", self.x_scale.len()),
            ("weights", self.weights.len()),
        ] {
            if len != n {
                return Err(PredictorError::InvalidArtifact(format!(
                    "{} 长度 {} 与特征数 {} 不一致",
                    name, len, n
                )));
            }
        }

        let all_finite = self
            .x_mean
            .iter()
            .chain(self.x_scale.iter())
            .chain(self.weights.iter())
            .chain(std::iter::once(&self.bias))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(PredictorError::InvalidArtifact(
                "模型参数包含非有限数值".to_string(),
            ));
        }

        if let (Some(lo), Some(hi)) = (self.y_min, self.y_max) {
            if !lo.is_finite() || !hi.is_finite() || hi < lo {
                return Err(PredictorError::InvalidArtifact(format!(
                    "目标区间无效: [{}, {}]",
                    lo, hi
                )));
            }
        }
        Ok(())
    }
}

// ==========================================
// LinearModelPredictor
// ==========================================
#[derive(Debug, Clone)]
pub struct LinearModelPredictor {
    artifact: LinearModelArtifact,
}

impl LinearModelPredictor {
    pub fn new(artifact: LinearModelArtifact) -> Result<Self, PredictorError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// 从 JSON 模型文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PredictorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let artifact: LinearModelArtifact = serde_json::from_str(&raw)?;
        let predictor = Self::new(artifact)?;
        info!(
            path = %path.display(),
            features = predictor.artifact.feature_names.len(),
            "线性模型加载完成"
        );
        Ok(predictor)
    }

    pub fn artifact(&self) -> &LinearModelArtifact {
        &self.artifact
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let a = &self.artifact;
        let scaled: f64 = row
            .iter()
            .zip(a.x_mean.iter())
            .zip(a.x_scale.iter())
            .zip(a.weights.iter())
            .map(|(((x, mean), scale), w)| {
                let s = if *scale == 0.0 { 1.0 } else { *scale };
                w * (x - mean) / s
            })
            .sum::<f64>()
            + a.bias;

        let value = match (a.y_min, a.y_max) {
            (Some(lo), Some(hi)) => scaled * (hi - lo) + lo,
            _ => scaled,
        };

        if a.clip_negative {
            value.max(0.0)
        } else {
            value
        }
    }
}

impl SalesPredictor for LinearModelPredictor {
    fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, PredictorError> {
        let expected = self.artifact.feature_names.len();
        if matrix.n_cols() != expected {
            return Err(PredictorError::ShapeMismatch {
                expected,
                actual: matrix.n_cols(),
            });
        }

        let predictions: Vec<f64> = matrix.rows().iter().map(|row| self.predict_row(row)).collect();
        debug!(rows = predictions.len(), "线性模型推理完成");
        Ok(predictions)
    }
}

/// 读取特征名文件（每行一个，忽略空行与首尾空白）
pub fn load_feature_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>, PredictorError> {
    let raw = std::fs::read_to_string(path)?;
    let names: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(PredictorError::InvalidArtifact("特征名文件为空".to_string()));
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn artifact() -> LinearModelArtifact {
        LinearModelArtifact {
            feature_names: vec!["Units Sold".to_string(), "Unit Price".to_string()],
            x_mean: vec![10.0, 5.0],
            x_scale: vec![2.0, 0.0],
            weights: vec![1.0, 0.5],
            bias: 0.25,
            y_min: None,
            y_max: None,
            clip_negative: false,
        }
    }

    #[test]
    fn test_linear_prediction() {
        let predictor = LinearModelPredictor::new(artifact()).unwrap();
        let matrix = FeatureMatrix::new(
            predictor.feature_names().to_vec(),
            vec![vec![12.0, 7.0], vec![10.0, 5.0]],
        );
        let out = predictor.predict(&matrix).unwrap();
        // (12-10)/2*1 + (7-5)/1*0.5 + 0.25 = 2.25
        assert!((out[0] - 2.25).abs() < 1e-9);
        assert!((out[1] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_target_range_and_clip() {
        let mut a = artifact();
        a.y_min = Some(100.0);
        a.y_max = Some(300.0);
        a.bias = -1.0;
        a.clip_negative = true;
        let predictor = LinearModelPredictor::new(a).unwrap();
        let matrix = FeatureMatrix::new(predictor.feature_names().to_vec(), vec![vec![10.0, 5.0]]);
        // -1 * 200 + 100 = -100 → 0
        assert_eq!(predictor.predict(&matrix).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let predictor = LinearModelPredictor::new(artifact()).unwrap();
        let matrix = FeatureMatrix::new(vec!["Units Sold".to_string()], vec![vec![1.0]]);
        assert!(matches!(
            predictor.predict(&matrix),
            Err(PredictorError::ShapeMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_invalid_artifact_rejected() {
        let mut a = artifact();
        a.weights.pop();
        assert!(matches!(
            LinearModelPredictor::new(a),
            Err(PredictorError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_from_json_file_and_feature_names() {
        let mut model = NamedTempFile::new().unwrap();
        write!(model, "{}", serde_json::to_string(&artifact()).unwrap()).unwrap();
        let predictor = LinearModelPredictor::from_json_file(model.path()).unwrap();
        assert_eq!(predictor.feature_names().len(), 2);

        let mut names = NamedTempFile::new().unwrap();
        writeln!(names, "Units Sold\n\n  Unit Price  ").unwrap();
        assert_eq!(
            load_feature_names(names.path()).unwrap(),
            vec!["Units Sold".to_string(), "Unit Price".to_string()]
        );
    }
}
