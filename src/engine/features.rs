// ==========================================
// 销售预测决策引擎 - 特征矩阵构建
// ==========================================
// 职责: 按模型期望的特征名顺序构建矩阵（列对齐）
// 规则:
// - 期望列缺失 → 整列补 0（不是错误，给出诊断）
// - 多余数值列 → 丢弃
// - 存在列中的缺值 → 用该列窗口均值补齐（无任何值时补 0）
// - 簿记列（日期/产品/目标/日历派生列）不参与矩阵
// 红线: 只借用数据集，不修改
// ==========================================

use crate::config::forecast_config::ForecastConfig;
use crate::domain::dataset::SalesRecord;
use crate::domain::forecast::FeatureReport;
use std::collections::BTreeSet;
use tracing::warn;

// ==========================================
// FeatureMatrix - 特征矩阵（行 × 命名列）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// 按列名取某一列（测试/诊断用）
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }
}

// ==========================================
// FeatureMatrixBuilder - 特征矩阵构建器
// ==========================================
pub struct FeatureMatrixBuilder<'a> {
    config: &'a ForecastConfig,
}

impl<'a> FeatureMatrixBuilder<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// 取按日期排序后的最近 window 条记录（同日期保持源文件顺序）
    ///
    /// 窗口按记录条数计，不按日历天数计：选择 "all" 且同日有多个产品时，
    /// 窗口覆盖的天数少于 window。每条记录对应一行推理输入。
    pub fn trailing_window<'r>(records: &[&'r SalesRecord], window: usize) -> Vec<&'r SalesRecord> {
        let mut sorted: Vec<&SalesRecord> = records.to_vec();
        sorted.sort_by_key(|r| (r.date, r.row_number));
        let skip = sorted.len().saturating_sub(window);
        sorted.into_iter().skip(skip).collect()
    }

    /// 构建特征矩阵
    ///
    /// # 参数
    /// - records: 参与推理的记录（已过滤、已截取窗口）
    /// - expected: 模型期望特征名（顺序即列顺序）
    ///
    /// # 返回
    /// (矩阵, 对齐报告)；矩阵列数恒等于 expected.len()
    pub fn build(&self, records: &[&SalesRecord], expected: &[String]) -> (FeatureMatrix, FeatureReport) {
        // 数据集中出现过的数值特征列（排除簿记列）
        let available: BTreeSet<&str> = records
            .iter()
            .flat_map(|r| r.features.keys())
            .map(|k| k.as_str())
            .filter(|k| !self.config.is_bookkeeping_column(k))
            .collect();

        let expected_set: BTreeSet<&str> = expected.iter().map(|s| s.as_str()).collect();

        let present: Vec<String> = expected
            .iter()
            .filter(|name| available.contains(name.as_str()))
            .cloned()
            .collect();
        let missing: Vec<String> = expected
            .iter()
            .filter(|name| !available.contains(name.as_str()))
            .cloned()
            .collect();
        let dropped: Vec<String> = available
            .iter()
            .filter(|name| !expected_set.contains(*name))
            .map(|name| name.to_string())
            .collect();

        // 列均值（仅存在列；簿记列与缺失列恒为 0）
        let fill_values: Vec<f64> = expected
            .iter()
            .map(|name| {
                if available.contains(name.as_str()) {
                    column_mean(records, name).unwrap_or(0.0)
                } else {
                    0.0
                }
            })
            .collect();

        let mut imputed_cells = 0;
        let rows: Vec<Vec<f64>> = records
            .iter()
            .map(|record| {
                expected
                    .iter()
                    .zip(fill_values.iter())
                    .map(|(name, fill)| {
                        if !available.contains(name.as_str()) {
                            return 0.0;
                        }
                        match record.features.get(name) {
                            Some(v) => *v,
                            None => {
                                imputed_cells += 1;
                                *fill
                            }
                        }
                    })
                    .collect()
            })
            .collect();

        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                expected = expected.len(),
                "特征列缺失，已按 0 补齐"
            );
        }

        let report = FeatureReport {
            expected: expected.len(),
            present,
            missing,
            dropped,
            imputed_cells,
        };

        (FeatureMatrix::new(expected.to_vec(), rows), report)
    }
}

/// 列均值；该列在记录中没有任何值时返回 None
fn column_mean(records: &[&SalesRecord], name: &str) -> Option<f64> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.features.get(name).copied())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
