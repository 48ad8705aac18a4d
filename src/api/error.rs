// ==========================================
// 销售预测决策引擎 - API层错误类型
// ==========================================
// 职责: 将引擎/导入/仓储错误转换为带状态码的用户可读错误
// 状态码: 400 用户可修正 / 404 不存在 / 503 模型不可用 / 500 内部错误
// ==========================================

use crate::engine::error::{ForecastError, ForecastStage, PredictorError};
use crate::importer::error::ImportError;
use crate::report::ReportError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 用户可修正 (400)
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据结构错误: {0}")]
    SchemaError(String),

    #[error("数据不足: {0}")]
    InsufficientData(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 资源不存在 (404)
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 服务不可用 (503)
    // ==========================================
    #[error("服务不可用: {0}")]
    ServiceUnavailable(String),

    // ==========================================
    // 内部错误 (500)
    // ==========================================
    #[error("预测失败 ({stage}): {message}")]
    ForecastFailed { stage: ForecastStage, message: String },

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP 风格状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::SchemaError(_)
            | ApiError::InsufficientData(_)
            | ApiError::ImportError(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::ServiceUnavailable(_) => 503,
            _ => 500,
        }
    }

    /// 转为错误响应体
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status: self.status_code(),
            message: self.to_string(),
        }
    }
}

/// 错误响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

// ==========================================
// 从 ForecastError 转换
// ==========================================
impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        let stage = err.stage();
        match err {
            ForecastError::Schema { .. } => ApiError::SchemaError(err.to_string()),
            ForecastError::InsufficientData { .. } => ApiError::InsufficientData(err.to_string()),
            ForecastError::InvalidThreshold(_) => ApiError::InvalidInput(err.to_string()),
            ForecastError::PredictorUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            other => ApiError::ForecastFailed {
                stage,
                message: other.to_string(),
            },
        }
    }
}

// ==========================================
// 从 PredictorError 转换（模型加载阶段）
// ==========================================
impl From<PredictorError> for ApiError {
    fn from(err: PredictorError) -> Self {
        ApiError::ServiceUnavailable(err.to_string())
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件不存在: {}", path)),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段 {} 错误: {}", field, message))
            }
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

// ==========================================
// 从 ReportError 转换
// ==========================================
impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
