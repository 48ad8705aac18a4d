// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// 语言由调用方逐次显式传入，不修改全局 locale
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

/// 规范化语言代码
///
/// - "zh" / "zh-cn" / "zh_CN" → "zh-CN"
/// - 已加载的语言原样返回
/// - 其他 → 默认语言
pub fn normalize_locale(locale: &str) -> String {
    let trimmed = locale.trim();
    let lowered = trimmed.to_ascii_lowercase().replace('_', "-");
    if lowered == "zh" || lowered == "zh-cn" {
        return "zh-CN".to_string();
    }

    let available = rust_i18n::available_locales!();
    available
        .iter()
        .find(|l| l.eq_ignore_ascii_case(&lowered))
        .map(|l| l.to_string())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// 按指定语言翻译（带参数）
///
/// # 示例
/// ```no_run
/// use sales_forecast::i18n::t_in;
/// let msg = t_in("zh-CN", "api.file_not_found", &[("path", "/tmp/sales.csv")]);
/// ```
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let locale = normalize_locale(locale);
    let mut result = rust_i18n::t!(key, locale = locale.as_str()).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 按默认语言翻译（带参数）
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    t_in(DEFAULT_LOCALE, key, args)
}
