use crate::{
    abstract_trait::order::{
        repository::DynOrderQueryRepository, service::OrderQueryServiceTrait,
    },
    domain::response::order::{OrderResponse, OrderStatsResponse, StatusCountResponse},
    model::{Order, OrderStatus, StatusBucket},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use tracing::info;

const TRACER: &str = "order-query-service";

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    metrics: Metrics,
}

impl OrderQueryService {
    pub fn new(query: DynOrderQueryRepository, registry: &mut Registry) -> Self {
        Self {
            query,
            metrics: Metrics::registered(registry, "order_query_service", "OrderQueryService"),
        }
    }

    async fn with_details(&self, orders: Vec<Order>) -> Result<Vec<OrderResponse>, ServiceError> {
        let ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let items = self.query.find_items(&ids).await?;
        let history = self.query.find_history(&ids).await?;

        Ok(OrderResponse::assemble(orders, items, history))
    }
}

fn summarize(buckets: &[StatusBucket]) -> OrderStatsResponse {
    let total_orders = buckets.iter().map(|b| b.count).sum();
    let revenue = buckets
        .iter()
        .filter(|b| b.status != OrderStatus::Cancelled)
        .map(|b| b.total)
        .sum::<Decimal>();

    let by_status = OrderStatus::ALL
        .iter()
        .map(|status| StatusCountResponse {
            status: *status,
            count: buckets
                .iter()
                .find(|b| b.status == *status)
                .map_or(0, |b| b.count),
        })
        .collect();

    OrderStatsResponse {
        total_orders,
        revenue,
        by_status,
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_my_orders(
        &self,
        user: &AuthUser,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        info!("📦 Listing orders of user {}", user.user_id);

        let ctx = TracingContext::start(
            TRACER,
            "find_my_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("user.id", user.user_id.to_string()),
            ],
        );

        let result = async {
            let orders = self.query.find_by_user(user.user_id).await?;
            self.with_details(orders).await
        }
        .await;

        match result {
            Ok(orders) => {
                ctx.complete(&self.metrics, Method::Get, true, "Orders retrieved");
                Ok(ApiResponse::success("Orders retrieved successfully", orders))
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Get, false, &err.to_string());
                Err(err)
            }
        }
    }

    async fn find_all(&self) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "find_all_orders",
            vec![KeyValue::new("component", "order")],
        );

        let result = async {
            let orders = self.query.find_all().await?;
            self.with_details(orders).await
        }
        .await;

        match result {
            Ok(orders) => {
                ctx.complete(&self.metrics, Method::Get, true, "All orders retrieved");
                Ok(ApiResponse::success("Orders retrieved successfully", orders))
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Get, false, &err.to_string());
                Err(err)
            }
        }
    }

    async fn stats(&self) -> Result<ApiResponse<OrderStatsResponse>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "order_stats",
            vec![KeyValue::new("component", "order")],
        );

        match self.query.status_buckets().await {
            Ok(buckets) => {
                ctx.complete(&self.metrics, Method::Get, true, "Order stats computed");
                Ok(ApiResponse::success(
                    "Order stats retrieved successfully",
                    summarize(&buckets),
                ))
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Get, false, &err.to_string());
                Err(err.into())
            }
        }
    }
}
