// ==========================================
// 销售预测决策引擎 - 数据导入模块
// ==========================================
// 职责: CSV / Excel → Dataset
// ==========================================

pub mod data_cleaner;
pub mod dataset_loader;
pub mod error;
pub mod file_parser;
pub mod importer_trait;

pub use data_cleaner::DataCleaner;
pub use dataset_loader::{DatasetLoader, LoadReport};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use importer_trait::{FileParser, RawTable};
