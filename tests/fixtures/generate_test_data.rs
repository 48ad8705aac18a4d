// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成不同完整度的销售数据集 CSV 文件
// 输出: tests/fixtures/datasets/*.csv
// 用法: cargo run --bin generate_test_data
// ==========================================

use chrono::{Datelike, Duration, Local, NaiveDate};
use csv::Writer;
use std::error::Error;
use std::fs::File;

// CSV 表头
const CSV_HEADER: &[&str] = &[
    "Date",
    "Product Name",
    "Units Sold",
    "Unit Price",
    "Foot Traffic",
    "Total Sales",
];

const PRODUCTS: &[(&str, f64)] = &[("Latte", 4.5), ("Mocha", 5.0), ("Espresso", 3.0)];

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// 销售记录结构
#[derive(Clone)]
struct SalesRow {
    date: NaiveDate,
    product: String,
    units_sold: u32,
    unit_price: f64,
    foot_traffic: u32,
}

impl SalesRow {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            self.product.clone(),
            self.units_sold.to_string(),
            format!("{:.2}", self.unit_price),
            self.foot_traffic.to_string(),
            format!("{:.2}", self.units_sold as f64 * self.unit_price),
        ]
    }
}

/// 线性同余伪随机数（输出可复现）
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next() % u64::from(hi - lo + 1)) as u32
    }
}

// 生成单日单产品记录（周末客流更高）
fn generate_row(rng: &mut Lcg, date: NaiveDate, product: &str, price: f64) -> SalesRow {
    let weekend = date.weekday().number_from_monday() >= 6;
    let base_traffic = if weekend { 180 } else { 120 };
    let foot_traffic = base_traffic + rng.range(0, 60);
    SalesRow {
        date,
        product: product.to_string(),
        units_sold: foot_traffic / 4 + rng.range(0, 10),
        unit_price: price,
        foot_traffic,
    }
}

/// 从 start 起 days 天，按 keep(offset) 决定是否保留该日
fn generate_rows<F>(seed: u64, start: NaiveDate, days: i64, keep: F) -> Vec<SalesRow>
where
    F: Fn(i64) -> bool,
{
    let mut rng = Lcg(seed);
    let mut rows = Vec::new();
    for offset in (0..days).filter(|o| keep(*o)) {
        let date = start + Duration::days(offset);
        for (product, price) in PRODUCTS {
            rows.push(generate_row(&mut rng, date, product, *price));
        }
    }
    rows
}

fn write_dataset(name: &str, rows: &[SalesRow]) -> Result<(), Box<dyn Error>> {
    let file = File::create(format!("{}/{}", OUTPUT_DIR, name))?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record(row.to_row())?;
    }
    wtr.flush()?;
    println!("✓ 生成 {} ({}条)", name, rows.len());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    std::fs::create_dir_all(OUTPUT_DIR)?;

    let today = Local::now().date_naive();

    // 1. 半年连续数据 → 季度预测
    let start = today - Duration::days(180);
    write_dataset("01_quarterly_dense.csv", &generate_rows(1, start, 180, |_| true))?;

    // 2. 两个月，隔天一条 → 月度预测
    let start = today - Duration::days(60);
    write_dataset("02_monthly_half.csv", &generate_rows(2, start, 60, |o| o % 2 == 0))?;

    // 3. 四周，每周 5 天 → 周度预测
    let start = today - Duration::days(28);
    write_dataset("03_weekly_workdays.csv", &generate_rows(3, start, 28, |o| o % 7 < 5))?;

    // 4. 稀疏数据，每 10 天一条 → 短期预测
    let start = today - Duration::days(100);
    write_dataset("04_sparse_short_term.csv", &generate_rows(4, start, 100, |o| o % 10 == 0))?;

    // 5. 含脏数据（非法日期、空产品、货币符号、缺失值）
    let start = today - Duration::days(14);
    let mut dirty: Vec<Vec<String>> = generate_rows(5, start, 14, |_| true)
        .iter()
        .map(SalesRow::to_row)
        .collect();
    for (idx, row) in dirty.iter_mut().enumerate() {
        match idx % 9 {
            1 => row[0] = "not-a-date".to_string(),
            3 => row[1] = String::new(),
            5 => row[3] = format!("${}", row[3]),
            7 => row[4] = "N/A".to_string(),
            _ => {}
        }
    }
    let file = File::create(format!("{}/05_dirty_data.csv", OUTPUT_DIR))?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(CSV_HEADER)?;
    for row in &dirty {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    println!("✓ 生成 05_dirty_data.csv ({}条)", dirty.len());

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}
