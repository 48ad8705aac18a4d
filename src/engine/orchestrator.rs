// ==========================================
// 销售预测决策引擎 - 引擎编排器
// ==========================================
// 主流程:
// 校验必填列 → 校验阈值 → 解析产品选择 → 画像 → 选择周期
// → 检查预测器 → 构建特征矩阵 → 推理 → 截断 → 分类 → 组装 → 落库
// 红线: 任一阶段失败即中止，不返回部分结果，不在流程内重试
// ==========================================

use crate::config::forecast_config::ForecastConfig;
use crate::domain::dataset::{Dataset, ProductSelection};
use crate::domain::forecast::{ForecastResult, ForecastSummary};
use crate::engine::classifier::DecisionClassifier;
use crate::engine::error::{EngineResult, ForecastError};
use crate::engine::features::FeatureMatrixBuilder;
use crate::engine::horizon::HorizonSelector;
use crate::engine::predictor::SalesPredictor;
use crate::engine::profiler::DataProfiler;
use crate::engine::sink::{ForecastSink, OptionalForecastSink};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ForecastRequest - 单次预测请求
// ==========================================
// 阈值、产品选择、语言均随请求携带，不依赖任何全局状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// "all" 或产品名
    #[serde(default = "default_product_selection")]
    pub product_selection: String,

    /// weekly / monthly / quarterly，其余值视为未指定
    #[serde(default)]
    pub forecast_type: Option<String>,

    /// 缺省时使用配置中的默认阈值
    #[serde(default)]
    pub threshold: Option<f64>,

    /// 决策文案语言，缺省时使用配置
    #[serde(default)]
    pub locale: Option<String>,
}

fn default_product_selection() -> String {
    crate::domain::dataset::ALL_PRODUCTS.to_string()
}

impl ForecastRequest {
    pub fn for_product(product_selection: &str) -> Self {
        Self {
            product_selection: product_selection.to_string(),
            forecast_type: None,
            threshold: None,
            locale: None,
        }
    }
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::for_product(crate::domain::dataset::ALL_PRODUCTS)
    }
}

// ==========================================
// ForecastOrchestrator - 引擎编排器
// ==========================================
pub struct ForecastOrchestrator<P>
where
    P: SalesPredictor,
{
    predictor: Arc<P>,
    config: ForecastConfig,
    profiler: DataProfiler,
    horizon: HorizonSelector,
    sink: OptionalForecastSink,
}

impl<P> ForecastOrchestrator<P>
where
    P: SalesPredictor,
{
    /// 创建编排器
    ///
    /// # 参数
    /// - predictor: 共享的只读预测器
    /// - config: 预测配置（列名、默认阈值、周期策略）
    pub fn new(predictor: Arc<P>, config: ForecastConfig) -> Self {
        Self {
            horizon: HorizonSelector::new(config.horizon.clone()),
            profiler: DataProfiler::new(),
            sink: OptionalForecastSink::none(),
            predictor,
            config,
        }
    }

    /// 附加结果接收者（成功的预测会被转发保存）
    pub fn with_sink(mut self, sink: Arc<dyn ForecastSink>) -> Self {
        self.sink = OptionalForecastSink::with_sink(sink);
        self
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn predictor(&self) -> &Arc<P> {
        &self.predictor
    }

    /// 执行一次预测
    ///
    /// # 参数
    /// - dataset: 已清洗的数据集（只借用）
    /// - product_selection: "all" 或产品名（未知产品回退为 all）
    /// - user_forecast_type: 用户指定周期
    /// - threshold: 阈值（None → 配置默认值）
    pub fn run(
        &self,
        dataset: &Dataset,
        product_selection: &str,
        user_forecast_type: Option<&str>,
        threshold: Option<f64>,
    ) -> EngineResult<ForecastResult> {
        let request = ForecastRequest {
            product_selection: product_selection.to_string(),
            forecast_type: user_forecast_type.map(str::to_string),
            threshold,
            locale: None,
        };
        self.run_request(dataset, &request)
    }

    /// 按请求对象执行一次预测
    #[instrument(skip(self, dataset, request), fields(product = %request.product_selection))]
    pub fn run_request(
        &self,
        dataset: &Dataset,
        request: &ForecastRequest,
    ) -> EngineResult<ForecastResult> {
        info!(
            records = dataset.len(),
            forecast_type = ?request.forecast_type,
            threshold = ?request.threshold,
            "开始执行预测流程"
        );

        // ==========================================
        // 步骤1: 输入校验
        // ==========================================
        self.validate_schema(dataset)?;
        let threshold = self.resolve_threshold(request.threshold)?;

        let selection = ProductSelection::resolve(&request.product_selection, dataset);
        let raw = request.product_selection.trim();
        if selection.is_all() && !raw.is_empty() && !raw.eq_ignore_ascii_case(crate::domain::dataset::ALL_PRODUCTS) {
            warn!(product = raw, "未知产品，回退为全部产品");
        }

        // ==========================================
        // 步骤2: 数据完整度画像
        // ==========================================
        let profile = self.profiler.profile(dataset, &selection)?;

        // ==========================================
        // 步骤3: 选择预测周期
        // ==========================================
        let plan = self.horizon.select(&profile, request.forecast_type.as_deref());
        debug!(
            forecast_type = %plan.forecast_type,
            forecast_days = plan.forecast_days,
            overridden = plan.overridden,
            "步骤3: 预测周期已确定"
        );

        // ==========================================
        // 步骤4: 构建特征矩阵
        // ==========================================
        if !self.predictor.is_ready() {
            return Err(ForecastError::PredictorUnavailable(
                "预测模型未就绪".to_string(),
            ));
        }

        let records = dataset.filter(&selection);
        let window = FeatureMatrixBuilder::trailing_window(&records, plan.forecast_days as usize);
        let (matrix, feature_report) =
            FeatureMatrixBuilder::new(&self.config).build(&window, self.predictor.feature_names());
        debug!(
            rows = matrix.n_rows(),
            cols = matrix.n_cols(),
            missing = feature_report.missing.len(),
            imputed = feature_report.imputed_cells,
            "步骤4: 特征矩阵构建完成"
        );

        // ==========================================
        // 步骤5: 推理并截断到 forecast_days
        // ==========================================
        let mut predictions = self.predictor.predict(&matrix)?;
        predictions.truncate(plan.forecast_days as usize);
        if let Some((idx, value)) = predictions
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ForecastError::InvalidPrediction {
                day: idx + 1,
                value: *value,
            });
        }

        // ==========================================
        // 步骤6: 决策分类
        // ==========================================
        let locale = request.locale.as_deref().unwrap_or(&self.config.locale);
        let decisions = DecisionClassifier::with_locale(locale).classify(&predictions, threshold, &selection);

        // ==========================================
        // 步骤7: 组装结果并转发保存
        // ==========================================
        let result = ForecastResult {
            forecast_id: Uuid::new_v4().to_string(),
            product_selection: selection,
            plan,
            threshold,
            summary: ForecastSummary::from_predictions(&predictions),
            predictions,
            decisions,
            profile,
            feature_report,
            generated_at: chrono::Utc::now().naive_utc(),
        };

        self.sink
            .save(&result)
            .map_err(|e| ForecastError::Persistence(e.to_string()))?;

        info!(
            forecast_id = %result.forecast_id,
            forecast_type = %result.plan.forecast_type,
            forecast_days = result.plan.forecast_days,
            predictions = result.predictions.len(),
            total = result.summary.total,
            "预测流程完成"
        );

        Ok(result)
    }

    /// 校验必填列（日期列、产品列）
    fn validate_schema(&self, dataset: &Dataset) -> EngineResult<()> {
        let missing: Vec<String> = [&self.config.date_column, &self.config.product_column]
            .into_iter()
            .filter(|col| !dataset.has_column(col))
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ForecastError::Schema { missing })
        }
    }

    /// 阈值校验：缺省取配置默认值；必须为非负有限数
    fn resolve_threshold(&self, threshold: Option<f64>) -> EngineResult<f64> {
        let value = threshold.unwrap_or(self.config.default_threshold);
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(ForecastError::InvalidThreshold(value))
        }
    }
}

impl<P> ForecastOrchestrator<P>
where
    P: SalesPredictor + 'static,
{
    /// 对 "all" 及每个产品并发预测
    ///
    /// 每个选择在独立的 blocking 任务中执行，状态均为请求级
    ///
    /// # 返回
    /// (产品选择, 结果) 列表，顺序为 all 在前、产品按名称排序
    pub async fn run_per_product(
        self: Arc<Self>,
        dataset: Arc<Dataset>,
        template: ForecastRequest,
    ) -> Vec<(String, EngineResult<ForecastResult>)> {
        let mut selections = vec![crate::domain::dataset::ALL_PRODUCTS.to_string()];
        selections.extend(dataset.products());

        info!(selections = selections.len(), "开始批量预测");

        let handles: Vec<_> = selections
            .iter()
            .map(|selection| {
                let orchestrator = Arc::clone(&self);
                let dataset = Arc::clone(&dataset);
                let request = ForecastRequest {
                    product_selection: selection.clone(),
                    ..template.clone()
                };
                tokio::task::spawn_blocking(move || orchestrator.run_request(&dataset, &request))
            })
            .collect();

        let joined = futures::future::join_all(handles).await;

        selections
            .into_iter()
            .zip(joined)
            .map(|(selection, outcome)| {
                let result = match outcome {
                    Ok(result) => result,
                    Err(e) => {
                        error!(product = %selection, error = %e, "批量预测任务异常终止");
                        Err(ForecastError::TaskAborted(e.to_string()))
                    }
                };
                (selection, result)
            })
            .collect()
    }
}
