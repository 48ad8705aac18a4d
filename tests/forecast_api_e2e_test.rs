// ==========================================
// 预测 API 端到端测试
// ==========================================
// 测试目标: 文件 → 预测 → 历史 → 导出 / 删除
// 错误状态码: 400 / 404 / 503
// ==========================================


#[path = "helpers/test_data_builder.rs"]
mod test_data_builder;

use sales_forecast::api::{ApiError, ForecastApi};
use sales_forecast::config::ForecastConfig;
use sales_forecast::engine::predictor::{LinearModelPredictor, SalesPredictor};
use sales_forecast::engine::ForecastRequest;
use sales_forecast::repository::ForecastRepository;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};
use test_data_builder::StubPredictor;
use test_helpers::{write_csv, write_model_json, SALES_HEADER, UNITS_MODEL_JSON};

struct TestEnv {
    _db: NamedTempFile,
    dir: TempDir,
    repo: Arc<ForecastRepository>,
}

impl TestEnv {
    fn new() -> Self {
        let (db, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
        let conn = test_helpers::open_test_connection(&db_path).expect("Failed to open db");
        Self {
            _db: db,
            dir: TempDir::new().unwrap(),
            repo: Arc::new(ForecastRepository::new(Arc::new(Mutex::new(conn)))),
        }
    }

    fn api<P: SalesPredictor + 'static>(&self, predictor: P) -> ForecastApi<P> {
        ForecastApi::new(Arc::new(predictor), ForecastConfig::default(), self.repo.clone())
    }

    /// Latte / Mocha 各 10 天，Units Sold = 45
    fn sales_csv(&self) -> PathBuf {
        let mut rows = Vec::new();
        for day in 1..=10 {
            for product in ["Latte", "Mocha"] {
                rows.push(vec![
                    format!("2024-03-{:02}", day),
                    product.to_string(),
                    "45".to_string(),
                    "3.5".to_string(),
                    "100".to_string(),
                    "157.5".to_string(),
                ]);
            }
        }
        write_csv(&self.dir, "sales.csv", &SALES_HEADER, &rows)
    }
}

#[test]
fn test_generate_forecast_with_linear_model() {
    let env = TestEnv::new();
    let model_path = write_model_json(&env.dir, UNITS_MODEL_JSON);
    let api = env.api(LinearModelPredictor::from_json_file(&model_path).unwrap());

    let response = api
        .generate_forecast(env.sales_csv(), &ForecastRequest::for_product("Latte"))
        .unwrap();

    // 2 * 45 + 10 = 100，等于默认阈值
    assert_eq!(response.product_selection, "Latte");
    assert_eq!(response.forecast_type, "short-term");
    assert_eq!(response.forecast_days, 5);
    assert_eq!(response.threshold, 100.0);
    assert_eq!(response.rows.len(), 5);
    assert!(response.rows.iter().all(|r| r.predicted_sales == 100.0));
    assert_eq!(response.summary.total, 500.0);
    assert_eq!(response.headline_icon, "✅");
    assert!(response.features_complete);
    assert!(response.missing_features.is_empty());
}

#[test]
fn test_history_get_export_delete() {
    let env = TestEnv::new();
    let api = env.api(StubPredictor::units(4.0));

    let created = api
        .generate_forecast(env.sales_csv(), &ForecastRequest::default())
        .unwrap();

    let history = api.list_history(10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].forecast_id, created.forecast_id);

    let fetched = api.get_forecast(&created.forecast_id).unwrap();
    assert_eq!(fetched.rows, created.rows);

    let out = env.dir.path().join("export.csv");
    let rows = api.export_forecast_csv(&created.forecast_id, &out).unwrap();
    assert_eq!(rows, created.rows.len());
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), rows + 1);
    assert!(text.starts_with("day,predicted_sales,icon,severity,trend,decision"));

    api.delete_forecast(&created.forecast_id).unwrap();
    let err = api.get_forecast(&created.forecast_id).unwrap_err();
    assert_eq!(err.status_code(), 404);
    let err = api.delete_forecast(&created.forecast_id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_list_products() {
    let env = TestEnv::new();
    let api = env.api(StubPredictor::units(1.0));

    let response = api.list_products(env.sales_csv()).unwrap();
    assert_eq!(
        response.products,
        vec!["all".to_string(), "Latte".to_string(), "Mocha".to_string()]
    );
    assert_eq!(response.load_report.loaded_rows, 20);
}

#[test]
fn test_error_status_codes() {
    let env = TestEnv::new();
    let csv = env.sales_csv();

    // 文件不存在 → 404
    let api = env.api(StubPredictor::units(1.0));
    let err = api
        .generate_forecast(env.dir.path().join("missing.csv"), &ForecastRequest::default())
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    // 负阈值 → 400
    let request = ForecastRequest {
        threshold: Some(-5.0),
        ..ForecastRequest::default()
    };
    let err = api.generate_forecast(&csv, &request).unwrap_err();
    assert_eq!(err.status_code(), 400);

    // limit = 0 → 400
    assert_eq!(api.list_history(0).unwrap_err().status_code(), 400);

    // 缺少产品列 → 400
    let no_product = write_csv(
        &env.dir,
        "no_product.csv",
        &["Date", "Units Sold"],
        &[vec!["2024-03-01".to_string(), "5".to_string()]],
    );
    let err = api.generate_forecast(&no_product, &ForecastRequest::default()).unwrap_err();
    assert!(matches!(err, ApiError::SchemaError(_)));
    assert_eq!(err.to_response().status, 400);

    // 模型未就绪 → 503
    let api = env.api(StubPredictor::units(1.0).not_ready());
    let err = api.generate_forecast(&csv, &ForecastRequest::default()).unwrap_err();
    assert_eq!(err.status_code(), 503);

    // 失败的请求不写历史
    assert_eq!(env.repo.count().unwrap(), 0);
}

#[tokio::test]
async fn test_generate_all_products() {
    let env = TestEnv::new();
    let api = env.api(StubPredictor::units(4.0));

    let items = api
        .generate_all_products(env.sales_csv(), ForecastRequest::default())
        .await
        .unwrap();

    let names: Vec<&str> = items.iter().map(|i| i.product_selection.as_str()).collect();
    assert_eq!(names, vec!["all", "Latte", "Mocha"]);
    assert!(items.iter().all(|i| i.error.is_none() && i.forecast.is_some()));
    assert_eq!(env.repo.count().unwrap(), 3);
}
