use super::order::{OrderStatus, StatusActor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderStatusHistory {
    pub history_id: i32,
    pub order_id: i32,
    pub status: OrderStatus,
    pub changed_by: StatusActor,
    pub changed_at: DateTime<Utc>,
}
