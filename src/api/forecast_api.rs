// ==========================================
// 销售预测决策引擎 - 预测 API
// ==========================================
// 职责: 上传数据 → 预测 → 历史查询 / 删除 / 导出
// 所有错误统一转换为 ApiError（带状态码）
// ==========================================

use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::dto::{BatchForecastItem, ForecastResponse, ProductListResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::config::forecast_config::ForecastConfig;
use crate::domain::dataset::{Dataset, ALL_PRODUCTS};
use crate::engine::orchestrator::{ForecastOrchestrator, ForecastRequest};
use crate::engine::predictor::SalesPredictor;
use crate::engine::sink::ForecastSink;
use crate::i18n;
use crate::importer::dataset_loader::{DatasetLoader, LoadReport};
use crate::report;
use crate::repository::forecast_repo::{ForecastHistoryEntry, ForecastRepository};

// ==========================================
// ForecastApi - 预测 API
// ==========================================
pub struct ForecastApi<P>
where
    P: SalesPredictor + 'static,
{
    orchestrator: Arc<ForecastOrchestrator<P>>,
    repo: Arc<ForecastRepository>,
    loader: DatasetLoader,
    locale: String,
}

impl<P> ForecastApi<P>
where
    P: SalesPredictor + 'static,
{
    /// 创建 API 实例（预测结果自动写入历史库）
    pub fn new(predictor: Arc<P>, config: ForecastConfig, repo: Arc<ForecastRepository>) -> Self {
        let sink: Arc<dyn ForecastSink> = repo.clone();
        let locale = config.locale.clone();
        Self {
            loader: DatasetLoader::new(config.clone()),
            orchestrator: Arc::new(ForecastOrchestrator::new(predictor, config).with_sink(sink)),
            repo,
            locale,
        }
    }

    fn load(&self, path: &Path) -> ApiResult<(Dataset, LoadReport)> {
        if !path.exists() {
            let shown = path.display().to_string();
            return Err(ApiError::NotFound(i18n::t_in(
                &self.locale,
                "api.file_not_found",
                &[("path", shown.as_str())],
            )));
        }
        Ok(self.loader.load_file(path)?)
    }

    fn not_found(&self, forecast_id: &str) -> ApiError {
        ApiError::NotFound(i18n::t_in(
            &self.locale,
            "api.forecast_not_found",
            &[("id", forecast_id)],
        ))
    }

    /// 列出数据文件中的产品（首项为 "all"）
    pub fn list_products<Q: AsRef<Path>>(&self, data_path: Q) -> ApiResult<ProductListResponse> {
        let (_, load_report) = self.load(data_path.as_ref())?;
        let mut products = vec![ALL_PRODUCTS.to_string()];
        products.extend(load_report.products.iter().cloned());
        Ok(ProductListResponse {
            products,
            load_report,
        })
    }

    /// 加载数据文件并生成预测
    #[instrument(skip(self, data_path, request), fields(product = %request.product_selection))]
    pub fn generate_forecast<Q: AsRef<Path>>(
        &self,
        data_path: Q,
        request: &ForecastRequest,
    ) -> ApiResult<ForecastResponse> {
        let (dataset, _) = self.load(data_path.as_ref())?;
        self.generate_for_dataset(&dataset, request)
    }

    /// 对已加载的数据集生成预测
    pub fn generate_for_dataset(
        &self,
        dataset: &Dataset,
        request: &ForecastRequest,
    ) -> ApiResult<ForecastResponse> {
        let result = self.orchestrator.run_request(dataset, request)?;
        if !result.feature_report.is_complete() {
            let columns = result.feature_report.missing.join(", ");
            warn!(
                forecast_id = %result.forecast_id,
                "{}",
                i18n::t_in(&self.locale, "forecast.missing_features", &[("columns", columns.as_str())])
            );
        }
        let days = result.plan.forecast_days.to_string();
        info!(
            "{}",
            i18n::t_in(
                &self.locale,
                "forecast.completed",
                &[
                    ("id", result.forecast_id.as_str()),
                    ("days", days.as_str()),
                    ("type", result.plan.forecast_type.as_str()),
                ],
            )
        );
        Ok(ForecastResponse::from(&result))
    }

    /// 对 "all" 及每个产品批量预测（并发）
    pub async fn generate_all_products<Q: AsRef<Path>>(
        &self,
        data_path: Q,
        template: ForecastRequest,
    ) -> ApiResult<Vec<BatchForecastItem>> {
        let (dataset, _) = self.load(data_path.as_ref())?;
        let outcomes = Arc::clone(&self.orchestrator)
            .run_per_product(Arc::new(dataset), template)
            .await;

        Ok(outcomes
            .into_iter()
            .map(|(product_selection, outcome)| match outcome {
                Ok(result) => BatchForecastItem {
                    product_selection,
                    forecast: Some(ForecastResponse::from(&result)),
                    error: None,
                },
                Err(e) => BatchForecastItem {
                    product_selection,
                    forecast: None,
                    error: Some(ApiError::from(e).to_string()),
                },
            })
            .collect())
    }

    /// 查询单条预测
    pub fn get_forecast(&self, forecast_id: &str) -> ApiResult<ForecastResponse> {
        let result = self
            .repo
            .find_by_id(forecast_id)?
            .ok_or_else(|| self.not_found(forecast_id))?;
        Ok(ForecastResponse::from(&result))
    }

    /// 最近的预测历史
    pub fn list_history(&self, limit: usize) -> ApiResult<Vec<ForecastHistoryEntry>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit 必须大于 0".to_string()));
        }
        Ok(self.repo.list_recent(limit)?)
    }

    /// 删除预测记录
    pub fn delete_forecast(&self, forecast_id: &str) -> ApiResult<()> {
        if self.repo.delete(forecast_id)? {
            info!(forecast_id, "预测记录已删除");
            Ok(())
        } else {
            Err(self.not_found(forecast_id))
        }
    }

    /// 导出预测为 CSV
    ///
    /// # 返回
    /// 写入的数据行数
    pub fn export_forecast_csv<Q: AsRef<Path>>(&self, forecast_id: &str, output: Q) -> ApiResult<usize> {
        let result = self
            .repo
            .find_by_id(forecast_id)?
            .ok_or_else(|| self.not_found(forecast_id))?;
        let rows = report::export_forecast_csv(&result, output)?;
        info!(forecast_id, rows, "预测报表已导出");
        Ok(rows)
    }
}
