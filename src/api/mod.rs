// ==========================================
// 销售预测决策引擎 - API 层
// ==========================================
// 职责: 面向调用方的预测接口，错误统一带状态码
// ==========================================

pub mod dto;
pub mod error;
pub mod forecast_api;

pub use dto::{BatchForecastItem, ForecastResponse, ProductListResponse};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use forecast_api::ForecastApi;
