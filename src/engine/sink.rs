// ==========================================
// 销售预测决策引擎 - 预测结果下游接收者
// ==========================================
// 职责: 定义结果落库 trait，实现依赖倒置
// 说明: Engine 层定义 trait，Repository 层实现
// ==========================================

use crate::domain::forecast::ForecastResult;
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 结果接收 Trait
// ==========================================

/// 预测结果接收者
///
/// # 实现说明
/// - `ForecastRepository` 实现此 trait，将结果写入 forecast_history
/// - 实现必须可跨线程共享（批量预测时并发调用）
pub trait ForecastSink: Send + Sync {
    /// 保存预测结果
    fn save_forecast(&self, result: &ForecastResult) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作接收者（单元测试用）
#[derive(Debug, Clone, Default)]
pub struct NoOpForecastSink;

impl ForecastSink for NoOpForecastSink {
    fn save_forecast(&self, result: &ForecastResult) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpForecastSink: 跳过保存 - forecast_id={}",
            result.forecast_id
        );
        Ok(())
    }
}

/// 可选的结果接收者包装
pub struct OptionalForecastSink {
    inner: Option<Arc<dyn ForecastSink>>,
}

impl OptionalForecastSink {
    pub fn with_sink(sink: Arc<dyn ForecastSink>) -> Self {
        Self { inner: Some(sink) }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 保存结果（如果配置了接收者）
    pub fn save(&self, result: &ForecastResult) -> Result<(), Box<dyn Error + Send + Sync>> {
        match &self.inner {
            Some(sink) => sink.save_forecast(result),
            None => Ok(()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalForecastSink {
    fn default() -> Self {
        Self::none()
    }
}
