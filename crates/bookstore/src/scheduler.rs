//! Background job that walks orders through shipping and delivery.
//!
//! An order qualifies for the next step once it has spent the configured dwell
//! time in its current status, counted from `status_updated_at`. Each step is a
//! single guarded bulk update, so overlapping sweeps or a restart mid-sweep
//! never move an order twice.

use crate::{abstract_trait::order::repository::DynOrderCommandRepository, model::OrderStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use prometheus_client::{metrics::counter::Counter, registry::Registry};
use shared::{config::SchedulerSettings, errors::ServiceError};
use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast, task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    pub ship_after: ChronoDuration,
    pub deliver_after: ChronoDuration,
}

impl TryFrom<&SchedulerSettings> for SchedulerConfig {
    type Error = anyhow::Error;

    fn try_from(settings: &SchedulerSettings) -> Result<Self> {
        Ok(Self {
            interval: Duration::from_secs(settings.interval_secs),
            ship_after: ChronoDuration::try_hours(settings.ship_after_hours)
                .context("SHIP_AFTER_HOURS is out of range")?,
            deliver_after: ChronoDuration::try_hours(settings.deliver_after_hours)
                .context("DELIVER_AFTER_HOURS is out of range")?,
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepOutcome {
    pub shipped: Vec<i32>,
    pub delivered: Vec<i32>,
    /// Steps that failed, by the status they start from, with the error text.
    pub failures: Vec<(OrderStatus, String)>,
}


#[derive(Clone, Default)]
struct SchedulerMetrics {
    shipped: Counter,
    delivered: Counter,
    failures: Counter,
}

pub struct OrderScheduler {
    command: DynOrderCommandRepository,
    config: SchedulerConfig,
    metrics: SchedulerMetrics,
}

impl OrderScheduler {
    pub fn new(
        command: DynOrderCommandRepository,
        config: SchedulerConfig,
        registry: &mut Registry,
    ) -> Self {
        let metrics = SchedulerMetrics::default();

        registry.register(
            "order_scheduler_shipped",
            "Orders moved to shipped by the scheduler",
            metrics.shipped.clone(),
        );
        registry.register(
            "order_scheduler_delivered",
            "Orders moved to delivered by the scheduler",
            metrics.delivered.clone(),
        );
        registry.register(
            "order_scheduler_failures",
            "Scheduler sweeps that ended in an error",
            metrics.failures.clone(),
        );

        Self {
            command,
            config,
            metrics,
        }
    }

    /// Runs both transitions once, as of `now`.
    ///
    /// Shipping runs first; an order shipped here has `status_updated_at = now`
    /// and so cannot also be delivered in the same sweep. A failing step is
    /// recorded in the outcome and does not stop the other one.
    pub async fn sweep(&self, now: DateTime<Utc>) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();

        match self
            .advance(OrderStatus::Processing, self.config.ship_after, now)
            .await
        {
            Ok(ids) => {
                self.metrics.shipped.inc_by(ids.len() as u64);
                outcome.shipped = ids;
            }
            Err(err) => self.record_failure(&mut outcome, OrderStatus::Processing, err),
        }

        match self
            .advance(OrderStatus::Shipped, self.config.deliver_after, now)
            .await
        {
            Ok(ids) => {
                self.metrics.delivered.inc_by(ids.len() as u64);
                outcome.delivered = ids;
            }
            Err(err) => self.record_failure(&mut outcome, OrderStatus::Shipped, err),
        }

        outcome
    }

    async fn advance(
        &self,
        from: OrderStatus,
        dwell: ChronoDuration,
        now: DateTime<Utc>,
    ) -> Result<Vec<i32>, ServiceError> {
        let Some(to) = from.next_automatic() else {
            return Ok(Vec::new());
        };

        let ids = self
            .command
            .advance_dwelled(from, to, now - dwell, now)
            .await?;

        Ok(ids)
    }

    fn record_failure(&self, outcome: &mut SweepOutcome, from: OrderStatus, err: ServiceError) {
        self.metrics.failures.inc();
        error!("❌ Scheduler could not advance {from} orders: {err}");
        outcome.failures.push((from, err.to_string()));
    }

    async fn tick(&self, now: DateTime<Utc>) {
        let outcome = self.sweep(now).await;

        if !outcome.shipped.is_empty() || !outcome.delivered.is_empty() {
            info!(
                "🚚 Scheduler shipped {:?}, delivered {:?}",
                outcome.shipped, outcome.delivered
            );
        }
    }

    /// Spawns the periodic loop. The first sweep runs immediately.
    pub fn start(self: Arc<Self>) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

        info!(
            "⏱️ Order scheduler every {:?} (ship after {}h, deliver after {}h)",
            self.config.interval,
            self.config.ship_after.num_hours(),
            self.config.deliver_after.num_hours()
        );

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("🛑 Order scheduler stopped");
                        break;
                    }
                    _ = interval.tick() => self.tick(Utc::now()).await,
                }
            }
        });

        SchedulerHandle { shutdown_tx, join }
    }
}

pub struct SchedulerHandle {
    shutdown_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the loop and waits for an in-flight sweep to finish.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());

        if let Err(err) = self.join.await {
            error!("❌ Order scheduler task ended abnormally: {err}");
        }
    }
}
