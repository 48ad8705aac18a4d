// ==========================================
// 销售预测决策引擎 - 应用层
// ==========================================
// 职责: 组装共享连接、配置与 API 实例
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState};
