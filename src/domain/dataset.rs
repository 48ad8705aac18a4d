// ==========================================
// 销售预测决策引擎 - 销售台账数据集
// ==========================================
// 职责: 定义清洗后的行记录、数据集与产品选择
// 红线: 日期无法解析的行不进入下游，绝不伪造日期
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// "全部产品" 哨兵值
pub const ALL_PRODUCTS: &str = "all";

// ==========================================
// SalesRecord - 单行销售记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// 源文件行号（从 1 开始，不含表头）
    pub row_number: usize,

    /// 日期（已解析）
    pub date: NaiveDate,

    /// 产品标识
    pub product: String,

    /// 数值特征（列名 → 数值）
    pub features: BTreeMap<String, f64>,
}

impl SalesRecord {
    pub fn new(row_number: usize, date: NaiveDate, product: impl Into<String>) -> Self {
        Self {
            row_number,
            date,
            product: product.into(),
            features: BTreeMap::new(),
        }
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: f64) -> Self {
        self.features.insert(name.into(), value);
        self
    }
}

// ==========================================
// Dataset - 数据集
// ==========================================
// columns: 源文件表头（用于必填列校验）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<SalesRecord>) -> Self {
        Self { columns, records }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// 数据集中出现的全部产品（去重、排序）
    pub fn products(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.product.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn contains_product(&self, product: &str) -> bool {
        self.records.iter().any(|r| r.product == product)
    }

    /// 按产品选择过滤（只借用，不修改原数据集）
    pub fn filter<'a>(&'a self, selection: &ProductSelection) -> Vec<&'a SalesRecord> {
        self.records
            .iter()
            .filter(|r| selection.matches(&r.product))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// ProductSelection - 产品选择
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "product", rename_all = "snake_case")]
pub enum ProductSelection {
    All,
    Product(String),
}

impl ProductSelection {
    /// 解析产品选择
    ///
    /// # 规则
    /// - "all"（忽略大小写）→ All
    /// - 数据集中存在的产品 → Product
    /// - 其他值 → 回退为 All（由调用方记录告警）
    pub fn resolve(raw: &str, dataset: &Dataset) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_PRODUCTS) {
            return ProductSelection::All;
        }
        if dataset.contains_product(trimmed) {
            ProductSelection::Product(trimmed.to_string())
        } else {
            ProductSelection::All
        }
    }

    pub fn matches(&self, product: &str) -> bool {
        match self {
            ProductSelection::All => true,
            ProductSelection::Product(p) => p == product,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ProductSelection::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProductSelection::All => ALL_PRODUCTS,
            ProductSelection::Product(p) => p.as_str(),
        }
    }
}

impl fmt::Display for ProductSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Dataset::new(
            vec!["Date".to_string(), "Product Name".to_string()],
            vec![
                SalesRecord::new(1, d, "Latte"),
                SalesRecord::new(2, d, "Mocha"),
                SalesRecord::new(3, d, "Latte"),
            ],
        )
    }

    #[test]
    fn test_resolve_known_product() {
        let ds = sample_dataset();
        assert_eq!(
            ProductSelection::resolve("Mocha", &ds),
            ProductSelection::Product("Mocha".to_string())
        );
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_all() {
        let ds = sample_dataset();
        assert_eq!(ProductSelection::resolve("Espresso", &ds), ProductSelection::All);
        assert_eq!(ProductSelection::resolve("ALL", &ds), ProductSelection::All);
        assert_eq!(ProductSelection::resolve("", &ds), ProductSelection::All);
    }

    #[test]
    fn test_products_sorted_unique() {
        let ds = sample_dataset();
        assert_eq!(ds.products(), vec!["Latte".to_string(), "Mocha".to_string()]);
    }

    #[test]
    fn test_filter_borrows_matching_rows() {
        let ds = sample_dataset();
        let rows = ds.filter(&ProductSelection::Product("Latte".to_string()));
        assert_eq!(rows.len(), 2);
        assert_eq!(ds.filter(&ProductSelection::All).len(), 3);
    }
}
