// ==========================================
// 销售预测决策引擎 - 命令行入口
// ==========================================
// 用法:
//   sales-forecast <数据文件> <模型.json> [产品|all|*] [周期|-] [阈值|-]
// 产品为 * 时对 all 及每个产品批量预测
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use sales_forecast::api::{ApiError, ApiResult};
use sales_forecast::app::{get_default_db_path, AppState};
use sales_forecast::engine::ForecastRequest;
use std::error::Error;
use std::process::ExitCode;

fn usage() -> String {
    "用法: sales-forecast <数据文件> <模型.json> [产品|all|*] [weekly|monthly|quarterly|-] [阈值|-]"
        .to_string()
}

/// "-" 或空串视为未指定
fn optional_arg(args: &[String], idx: usize) -> Option<&str> {
    args.get(idx)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "-")
}

fn parse_request(args: &[String]) -> Result<ForecastRequest, ApiError> {
    let threshold = match optional_arg(args, 5) {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| ApiError::InvalidInput(format!("阈值不是数字: {}", raw)))?,
        ),
        None => None,
    };

    Ok(ForecastRequest {
        product_selection: optional_arg(args, 3).unwrap_or("all").to_string(),
        forecast_type: optional_arg(args, 4).map(str::to_string),
        threshold,
        locale: std::env::var("SALES_FORECAST_LOCALE").ok(),
    })
}

fn run(state: &AppState, args: &[String]) -> ApiResult<String> {
    let data_path = &args[1];
    let request = parse_request(args)?;
    let api = &state.forecast_api;

    if request.product_selection == "*" {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::InternalError(format!("异步运行时创建失败: {}", e)))?;
        let template = ForecastRequest {
            product_selection: "all".to_string(),
            ..request
        };
        let items = runtime.block_on(api.generate_all_products(data_path, template))?;
        serde_json::to_string_pretty(&items).map_err(|e| ApiError::InternalError(e.to_string()))
    } else {
        let response = api.generate_forecast(data_path, &request)?;
        serde_json::to_string_pretty(&response).map_err(|e| ApiError::InternalError(e.to_string()))
    }
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    sales_forecast::logging::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", usage());
        return Ok(ExitCode::from(2));
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", sales_forecast::APP_NAME, sales_forecast::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path, &args[2]) {
        Ok(state) => state,
        Err(e) => {
            let err = ApiError::ServiceUnavailable(e.to_string());
            println!("{}", serde_json::to_string_pretty(&err.to_response())?);
            return Ok(ExitCode::from(1));
        }
    };

    match run(&state, &args) {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(status = e.status_code(), error = %e, "预测失败");
            println!("{}", serde_json::to_string_pretty(&e.to_response())?);
            Ok(ExitCode::from(1))
        }
    }
}
