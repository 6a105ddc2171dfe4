use crate::model::{
    Order, OrderItem, OrderStatus, OrderStatusHistory, PaymentMethod, StatusActor,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub book_id: i32,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(value: OrderItem) -> Self {
        OrderItemResponse {
            id: value.order_item_id,
            book_id: value.book_id,
            quantity: value.quantity,
            price: value.price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusHistoryResponse {
    pub status: OrderStatus,
    pub changed_by: StatusActor,
    pub changed_at: DateTime<Utc>,
}

impl From<OrderStatusHistory> for OrderStatusHistoryResponse {
    fn from(value: OrderStatusHistory) -> Self {
        OrderStatusHistoryResponse {
            status: value.status,
            changed_by: value.changed_by,
            changed_at: value.changed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub promo_code_id: Option<i32>,
    #[schema(value_type = String, example = "37.50")]
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub order_date: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
    pub status_history: Vec<OrderStatusHistoryResponse>,
    /// Where to send the customer to pay; set only on a freshly placed `vnpay` order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

impl OrderResponse {
    pub fn new(order: Order, items: Vec<OrderItem>, history: Vec<OrderStatusHistory>) -> Self {
        OrderResponse {
            id: order.order_id,
            user_id: order.user_id,
            promo_code_id: order.promo_code_id,
            total_price: order.total_price,
            status: order.status,
            payment_method: order.payment_method,
            order_date: order.order_date,
            status_updated_at: order.status_updated_at,
            items: items.into_iter().map(Into::into).collect(),
            status_history: history.into_iter().map(Into::into).collect(),
            payment_url: None,
        }
    }

    /// Attaches items and history rows to their orders, keeping the order of `orders`.
    pub fn assemble(
        orders: Vec<Order>,
        items: Vec<OrderItem>,
        history: Vec<OrderStatusHistory>,
    ) -> Vec<Self> {
        let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for item in items {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let mut history_by_order: HashMap<i32, Vec<OrderStatusHistory>> = HashMap::new();
        for entry in history {
            history_by_order.entry(entry.order_id).or_default().push(entry);
        }

        orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.order_id).unwrap_or_default();
                let history = history_by_order
                    .remove(&order.order_id)
                    .unwrap_or_default();
                OrderResponse::new(order, items, history)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusCountResponse {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStatsResponse {
    pub total_orders: i64,
    /// Sum of `total_price` over orders that were not cancelled.
    #[schema(value_type = String, example = "1250.00")]
    pub revenue: Decimal,
    pub by_status: Vec<StatusCountResponse>,
}
