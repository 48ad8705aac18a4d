// ==========================================
// 销售预测决策引擎 - 核心库
// ==========================================
// 流程: 数据导入 → 完整度画像 → 预测周期选择 → 特征对齐 → 推理 → 决策分级
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (预测结果供人工参考)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 预测历史
pub mod repository;

// 引擎层 - 预测流水线
pub mod engine;

// 导入层 - CSV / Excel
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 报表导出
pub mod report;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DecisionTier, ForecastType, Severity, Trend};

// 领域实体
pub use domain::{
    CompletenessProfile, Dataset, DecisionRecord, FeatureReport, ForecastPlan, ForecastResult,
    ProductSelection, SalesRecord,
};

// 引擎
pub use engine::{
    DataProfiler, DecisionClassifier, ForecastError, ForecastOrchestrator, ForecastRequest,
    HorizonSelector, LinearModelPredictor, SalesPredictor,
};

// API
pub use api::{ApiError, ForecastApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "销售预测决策引擎";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
