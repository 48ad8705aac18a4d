// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use sales_forecast::domain::{Dataset, SalesRecord};
use sales_forecast::engine::error::PredictorError;
use sales_forecast::engine::features::FeatureMatrix;
use sales_forecast::engine::predictor::SalesPredictor;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// Dataset 构建器
// ==========================================

pub struct DatasetBuilder {
    columns: Vec<String>,
    records: Vec<SalesRecord>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self {
            columns: ["Date", "Product Name", "Units Sold", "Unit Price", "Total Sales"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            records: Vec::new(),
        }
    }

    /// 覆盖表头
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|s| s.to_string()).collect();
        self
    }

    /// 追加一条记录（units 同时作为 Units Sold，Total Sales = units * 3）
    pub fn record(mut self, day: NaiveDate, product: &str, units: f64) -> Self {
        let row_number = self.records.len() + 1;
        self.records.push(
            SalesRecord::new(row_number, day, product)
                .with_feature("Units Sold", units)
                .with_feature("Unit Price", 3.0)
                .with_feature("Total Sales", units * 3.0),
        );
        self
    }

    /// 从 start 开始连续 days 天，每天一条
    pub fn daily(mut self, start: NaiveDate, days: i64, product: &str, units: f64) -> Self {
        for offset in 0..days {
            self = self.record(start + Duration::days(offset), product, units);
        }
        self
    }

    /// 每月 1..=days_per_month 日各一条
    pub fn monthly_block(
        mut self,
        year: i32,
        months: std::ops::RangeInclusive<u32>,
        days_per_month: u32,
        product: &str,
    ) -> Self {
        for month in months {
            for day in 1..=days_per_month {
                self = self.record(date(year, month, day), product, 10.0);
            }
        }
        self
    }

    pub fn build(self) -> Dataset {
        Dataset::new(self.columns, self.records)
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 桩预测器
// ==========================================

/// 桩预测器: 每行返回 Units Sold 列的值 * scale，可额外多返回 extra 个值
pub struct StubPredictor {
    pub names: Vec<String>,
    pub scale: f64,
    pub extra: usize,
    pub ready: bool,
}

impl StubPredictor {
    pub fn units(scale: f64) -> Self {
        Self {
            names: vec!["Units Sold".to_string()],
            scale,
            extra: 0,
            ready: true,
        }
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_extra(mut self, extra: usize) -> Self {
        self.extra = extra;
        self
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }
}

impl SalesPredictor for StubPredictor {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, PredictorError> {
        let units = matrix
            .column("Units Sold")
            .unwrap_or_else(|| vec![0.0; matrix.n_rows()]);
        let mut out: Vec<f64> = units.iter().map(|u| u * self.scale).collect();
        let last = out.last().copied().unwrap_or(0.0);
        out.extend(std::iter::repeat(last).take(self.extra));
        Ok(out)
    }
}
