use super::validator::PromoValidator;
use crate::{
    abstract_trait::promo::{DynPromoRepository, PromoServiceTrait},
    domain::{
        requests::promo::{ApplyPromoRequest, CreatePromoCodeRequest},
        response::promo::{PromoCodeResponse, PromoDiscountResponse},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::ApiResponse,
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use tracing::info;

const TRACER: &str = "promo-service";

#[derive(Clone)]
pub struct PromoService {
    repository: DynPromoRepository,
    metrics: Metrics,
}

impl PromoService {
    pub fn new(repository: DynPromoRepository, registry: &mut Registry) -> Self {
        Self {
            repository,
            metrics: Metrics::registered(registry, "promo_service", "PromoService"),
        }
    }
}

#[async_trait]
impl PromoServiceTrait for PromoService {
    async fn find_all(&self) -> Result<ApiResponse<Vec<PromoCodeResponse>>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "find_all_promo_codes",
            vec![KeyValue::new("component", "promo")],
        );

        let promos = match self.repository.find_all().await {
            Ok(promos) => promos,
            Err(err) => {
                ctx.complete(&self.metrics, Method::Get, false, &err.to_string());
                return Err(err.into());
            }
        };

        ctx.complete(&self.metrics, Method::Get, true, "Promo codes retrieved");

        Ok(ApiResponse::success(
            "Promo codes retrieved successfully",
            promos.into_iter().map(PromoCodeResponse::from).collect(),
        ))
    }

    async fn create_promo(
        &self,
        req: &CreatePromoCodeRequest,
    ) -> Result<ApiResponse<PromoCodeResponse>, ServiceError> {
        info!("🏷️ Creating promo code {}", req.code);

        let ctx = TracingContext::start(
            TRACER,
            "create_promo_code",
            vec![
                KeyValue::new("component", "promo"),
                KeyValue::new("promo.code", req.code.clone()),
            ],
        );

        let promo = match self.repository.create_promo(req).await {
            Ok(promo) => promo,
            Err(err) => {
                ctx.complete(&self.metrics, Method::Post, false, &err.to_string());
                return Err(err.into());
            }
        };

        ctx.complete(&self.metrics, Method::Post, true, "Promo code created");

        Ok(ApiResponse::success(
            "Promo code created successfully",
            PromoCodeResponse::from(promo),
        ))
    }

    async fn apply_promo(
        &self,
        req: &ApplyPromoRequest,
    ) -> Result<ApiResponse<PromoDiscountResponse>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "apply_promo_code",
            vec![
                KeyValue::new("component", "promo"),
                KeyValue::new("promo.code", req.code.clone()),
            ],
        );

        let now = Utc::now();
        let result = match self.repository.find_active_by_code(&req.code, now).await {
            Ok(promo) => PromoValidator::evaluate(promo.as_ref(), req.subtotal, now),
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(discount) => {
                ctx.complete(&self.metrics, Method::Post, true, "Promo code applied");
                Ok(ApiResponse::success("Promo code applied", discount))
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Post, false, &err.to_string());
                Err(err)
            }
        }
    }
}
