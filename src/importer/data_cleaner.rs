// ==========================================
// 销售预测决策引擎 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析 / 日期解析
// 红线: 日期无法解析时返回 None，绝不猜测或伪造
// ==========================================

use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;
use chrono::NaiveDate;

/// 数值中允许出现并被剔除的符号
const NUMBER_NOISE: &[char] = &['$', '€', '£', '¥', '￥', ' '];

/// 常见空值标记
const NULL_MARKERS: &[&str] = &["nan", "null", "none", "n/a", "na", "-"];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty()
                || NULL_MARKERS
                    .iter()
                    .any(|m| trimmed.eq_ignore_ascii_case(m))
            {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_number(&self, value: &str) -> Option<f64> {
        let cleaned: String = value
            .trim()
            .chars()
            .filter(|c| !NUMBER_NOISE.contains(c))
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        let digits = if cleaned.contains(',') {
            strip_thousands_separators(&cleaned)?
        } else {
            cleaned
        };
        digits.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn parse_date(&self, value: &str, formats: &[String]) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        // 先尝试整串，再尝试日期时间的日期部分（"2024-01-05 08:30:00" / "2024-01-05T08:30:00"）
        let candidates = [
            Some(trimmed),
            trimmed.split(|c| c == ' ' || c == 'T').next(),
        ];

        candidates
            .iter()
            .flatten()
            .find_map(|candidate| {
                formats
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
            })
    }
}

impl DataCleaner {
    /// 清洗产品名（TRIM，空值返回 None）
    pub fn clean_product(&self, value: Option<&str>) -> Option<String> {
        self.normalize_null(value)
    }
}

/// 千分位逗号剔除；逗号后分组不是 3 位数字（如小数逗号 "1,5"）时视为歧义，返回 None
fn strip_thousands_separators(value: &str) -> Option<String> {
    let (integer, fraction) = match value.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (value, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }
    let mut groups = integer.split(',');
    let head = groups.next()?;
    let head_digits = head.trim_start_matches(['-', '+']);
    if head_digits.is_empty() || !head_digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut out = head.to_string();
    for group in groups {
        if group.len() != 3 || !group.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        out.push_str(group);
    }
    if let Some(f) = fraction {
        out.push('.');
        out.push_str(f);
    }
    Some(out)
}
