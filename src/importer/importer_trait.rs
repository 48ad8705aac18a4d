// ==========================================
// 销售预测决策引擎 - 导入接口定义
// ==========================================
// 阶段: 文件解析 → 清洗 → 组装 Dataset
// ==========================================

use crate::importer::error::ImportResult;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawTable - 解析后的原始表格
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// 表头（已 trim，保持源文件顺序）
    pub headers: Vec<String>,
    /// 行数据（表头 → 原始文本），已跳过完全空白的行
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 职责: 读取文件为原始表格
pub trait FileParser: Send + Sync {
    /// 解析文件
    ///
    /// # 错误
    /// - FileNotFound / UnsupportedFormat / 解析失败
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 职责: 单元格级清洗（空值、数值、日期）
pub trait DataCleaner: Send + Sync {
    /// 空白串视为缺失
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 解析数值（去除千分位、货币符号）；无法解析或非有限数返回 None
    fn parse_number(&self, value: &str) -> Option<f64>;

    /// 按给定格式依次尝试解析日期；无法解析返回 None
    fn parse_date(&self, value: &str, formats: &[String]) -> Option<NaiveDate>;
}
