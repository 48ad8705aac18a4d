// ==========================================
// 销售预测决策引擎 - 数据集加载器
// ==========================================
// 流程: 文件解析 → 逐行清洗 → 组装 Dataset + LoadReport
// 规则:
// - 日期无法解析的行丢弃（计数）
// - 产品为空的行丢弃（计数）
// - 非数值单元格不进入特征表（计数）
// ==========================================

use crate::config::forecast_config::ForecastConfig;
use crate::domain::dataset::{Dataset, SalesRecord};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{DataCleaner as DataCleanerTrait, RawTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

// ==========================================
// LoadReport - 加载报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// 原始数据行数（不含空白行）
    pub total_rows: usize,
    /// 进入数据集的行数
    pub loaded_rows: usize,
    /// 日期无法解析而丢弃的行数
    pub dropped_invalid_date: usize,
    /// 产品为空而丢弃的行数
    pub dropped_missing_product: usize,
    /// 非数值单元格数
    pub non_numeric_cells: usize,
    /// 数据集中的产品（去重排序）
    pub products: Vec<String>,
    pub elapsed_ms: u64,
}

// ==========================================
// DatasetLoader - 数据集加载器
// ==========================================
pub struct DatasetLoader {
    config: ForecastConfig,
    parser: UniversalFileParser,
    cleaner: DataCleaner,
}

impl DatasetLoader {
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            config,
            parser: UniversalFileParser,
            cleaner: DataCleaner,
        }
    }

    /// 从文件加载数据集
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn load_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<(Dataset, LoadReport)> {
        let start = Instant::now();
        let table = self.parser.parse(file_path.as_ref())?;
        let (dataset, mut report) = self.build_dataset(&table);
        report.elapsed_ms = start.elapsed().as_millis() as u64;

        info!(
            total_rows = report.total_rows,
            loaded_rows = report.loaded_rows,
            dropped_invalid_date = report.dropped_invalid_date,
            dropped_missing_product = report.dropped_missing_product,
            products = report.products.len(),
            elapsed_ms = report.elapsed_ms,
            "数据集加载完成"
        );
        Ok((dataset, report))
    }

    /// 将原始表格组装为数据集
    ///
    /// 缺少日期列或产品列时不报错：数据集保留原始表头，由编排器做必填列校验
    pub fn build_dataset(&self, table: &RawTable) -> (Dataset, LoadReport) {
        let mut report = LoadReport {
            total_rows: table.len(),
            ..Default::default()
        };

        let date_col = &self.config.date_column;
        let product_col = &self.config.product_column;
        let has_required = table.headers.contains(date_col) && table.headers.contains(product_col);

        let mut records = Vec::with_capacity(table.len());
        if has_required {
            for (idx, row) in table.rows.iter().enumerate() {
                let row_number = idx + 1;

                let date = row
                    .get(date_col)
                    .and_then(|v| self.cleaner.parse_date(v, &self.config.date_formats));
                let date = match date {
                    Some(d) => d,
                    None => {
                        report.dropped_invalid_date += 1;
                        continue;
                    }
                };

                let product = match self.cleaner.clean_product(row.get(product_col).map(String::as_str)) {
                    Some(p) => p,
                    None => {
                        report.dropped_missing_product += 1;
                        continue;
                    }
                };

                let mut record = SalesRecord::new(row_number, date, product);
                for header in &table.headers {
                    if header.is_empty() || header == date_col || header == product_col {
                        continue;
                    }
                    let raw = match self.cleaner.normalize_null(row.get(header).map(String::as_str)) {
                        Some(v) => v,
                        None => continue,
                    };
                    match self.cleaner.parse_number(&raw) {
                        Some(value) => {
                            record.features.insert(header.clone(), value);
                        }
                        None => report.non_numeric_cells += 1,
                    }
                }
                records.push(record);
            }
        }

        if report.dropped_invalid_date > 0 {
            warn!(
                dropped = report.dropped_invalid_date,
                "存在日期无法解析的行，已丢弃"
            );
        }

        let dataset = Dataset::new(table.headers.clone(), records);
        report.loaded_rows = dataset.len();
        report.products = dataset.products();
        (dataset, report)
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}
