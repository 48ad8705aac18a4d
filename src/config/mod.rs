// ==========================================
// 销售预测决策引擎 - 配置层
// ==========================================
// 职责: 预测配置管理,支持 config_kv 覆写
// 存储: config_kv 表 / JSON 文件
// ==========================================

pub mod config_manager;
pub mod forecast_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use forecast_config::{ForecastConfig, HorizonPolicy, DEFAULT_THRESHOLD};
