// ==========================================
// 数据导入集成测试
// ==========================================
// 测试目标: CSV 文件 → RawTable → Dataset + LoadReport
// ==========================================


use sales_forecast::config::ForecastConfig;
use sales_forecast::importer::{DatasetLoader, FileParser, ImportError, UniversalFileParser};
use tempfile::TempDir;
use test_helpers::{write_csv, SALES_HEADER};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_load_csv_counts_dropped_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "sales.csv",
        &SALES_HEADER,
        &[
            row(&["2024-03-01", "Latte", "40", "3.5", "120", "140"]),
            row(&["2024/03/02", "Mocha", "1,200", "$4.00", "N/A", "4800"]),
            row(&["not a date", "Latte", "10", "3.5", "90", "35"]),
            row(&["2024-03-03", "", "10", "3.5", "90", "35"]),
            row(&["2024-03-04 08:30:00", "Latte", "abc", "3.5", "95", "0"]),
        ],
    );

    let loader = DatasetLoader::new(ForecastConfig::default());
    let (dataset, report) = loader.load_file(&path).unwrap();

    assert_eq!(report.total_rows, 5);
    assert_eq!(report.loaded_rows, 3);
    assert_eq!(report.dropped_invalid_date, 1);
    assert_eq!(report.dropped_missing_product, 1);
    assert_eq!(report.non_numeric_cells, 1);
    assert_eq!(report.products, vec!["Latte".to_string(), "Mocha".to_string()]);

    assert_eq!(dataset.len(), 3);
    assert!(dataset.has_column("Foot Traffic"));

    let mocha = &dataset.records[1];
    assert_eq!(mocha.product, "Mocha");
    assert_eq!(mocha.features.get("Units Sold"), Some(&1200.0));
    assert_eq!(mocha.features.get("Unit Price"), Some(&4.0));
    assert!(mocha.features.get("Foot Traffic").is_none());

    let last = &dataset.records[2];
    assert_eq!(last.date.to_string(), "2024-03-04");
    assert!(last.features.get("Units Sold").is_none());
}

#[test]
fn test_decimal_comma_counted_as_non_numeric() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "sales.csv",
        &SALES_HEADER,
        &[
            row(&["2024-03-01", "Latte", "1,5", "3.5", "120", "140"]),
            row(&["2024-03-02", "Latte", "2,000", "3.5", "120", "7000"]),
        ],
    );

    let (dataset, report) = DatasetLoader::new(ForecastConfig::default())
        .load_file(&path)
        .unwrap();

    assert_eq!(report.loaded_rows, 2);
    assert_eq!(report.non_numeric_cells, 1);
    assert!(dataset.records[0].features.get("Units Sold").is_none());
    assert_eq!(dataset.records[1].features.get("Units Sold"), Some(&2000.0));
}

#[test]
fn test_load_csv_without_product_column_keeps_headers() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "no_product.csv",
        &["Date", "Units Sold"],
        &[row(&["2024-03-01", "5"])],
    );

    let (dataset, report) = DatasetLoader::default().load_file(&path).unwrap();
    assert!(dataset.is_empty());
    assert_eq!(report.total_rows, 1);
    assert!(dataset.has_column("Date"));
    assert!(!dataset.has_column("Product Name"));
}

#[test]
fn test_csv_with_bom_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bom.csv");
    std::fs::write(
        &path,
        "\u{feff}Date,Product Name,Units Sold\n2024-03-01,Latte,3\n",
    )
    .unwrap();

    let table = UniversalFileParser.parse(&path).unwrap();
    assert_eq!(table.headers[0], "Date");
    assert_eq!(table.len(), 1);

    let (dataset, _) = DatasetLoader::default().load_file(&path).unwrap();
    assert_eq!(dataset.len(), 1);
}

#[test]
fn test_duplicate_header_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "dup.csv",
        &["Date", "Date", "Product Name"],
        &[row(&["2024-03-01", "2024-03-01", "Latte"])],
    );
    let err = sales_forecast::importer::CsvParser.parse_table(&path).unwrap_err();
    assert!(matches!(err, ImportError::DuplicateHeader(h) if h == "Date"));
}

#[test]
fn test_unsupported_extension_and_missing_file() {
    let dir = TempDir::new().unwrap();
    let txt = dir.path().join("sales.txt");
    std::fs::write(&txt, "Date\n").unwrap();
    assert!(matches!(
        DatasetLoader::default().load_file(&txt),
        Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
    ));

    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        DatasetLoader::default().load_file(&missing),
        Err(ImportError::FileNotFound(_))
    ));
}
