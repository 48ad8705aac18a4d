// ==========================================
// 销售预测决策引擎 - 预测报表导出
// ==========================================
// 格式: CSV，表头 day,predicted_sales,icon,severity,trend,decision
// 每条决策一行，顺序与预测天数一致
// ==========================================

use crate::domain::forecast::ForecastResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// 报表导出错误
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("报表写入失败: {0}")]
    Write(String),
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Write(err.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Write(err.to_string())
    }
}

/// 导出表头
pub const REPORT_HEADER: [&str; 6] = ["day", "predicted_sales", "icon", "severity", "trend", "decision"];

/// 将预测结果写为 CSV
///
/// # 返回
/// 写入的数据行数
pub fn write_forecast_csv<W: Write>(result: &ForecastResult, writer: W) -> Result<usize, ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;

    let rows = result.to_rows();
    for row in &rows {
        csv_writer.write_record([
            row.day.to_string(),
            format!("{:.2}", row.predicted_sales),
            row.icon.clone(),
            row.severity.to_string(),
            row.trend.to_string(),
            row.decision.clone(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(rows.len())
}

/// 将预测结果写入 CSV 文件
pub fn export_forecast_csv<P: AsRef<Path>>(result: &ForecastResult, path: P) -> Result<usize, ReportError> {
    let file = File::create(path)?;
    write_forecast_csv(result, file)
}
