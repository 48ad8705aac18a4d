// ==========================================
// 销售预测决策引擎 - 引擎层
// ==========================================
// 职责: 画像 → 周期选择 → 特征对齐 → 推理 → 决策分类
// 红线: Engine 不拼 SQL，不修改输入数据集
// ==========================================

pub mod classifier;
pub mod error;
pub mod features;
pub mod horizon;
pub mod orchestrator;
pub mod predictor;
pub mod profiler;
pub mod sink;

// 重导出核心引擎
pub use classifier::{DecisionClassifier, SpreadStats, DECISION_RULES};
pub use error::{EngineResult, ForecastError, ForecastStage, PredictorError};
pub use features::{FeatureMatrix, FeatureMatrixBuilder};
pub use horizon::HorizonSelector;
pub use orchestrator::{ForecastOrchestrator, ForecastRequest};
pub use predictor::{load_feature_names, LinearModelArtifact, LinearModelPredictor, SalesPredictor};
pub use profiler::DataProfiler;
pub use sink::{ForecastSink, NoOpForecastSink, OptionalForecastSink};
