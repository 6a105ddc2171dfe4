use crate::{
    abstract_trait::{email::DynEmailService, payment::DynPaymentGateway},
    di::{DependenciesInject, Repositories},
    scheduler::SchedulerConfig,
    service::{LogEmailService, RedirectPaymentGateway},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{Config, ConnectionPool, JwtConfig},
    utils::SystemMetrics,
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub jwt_config: DynJwtService,
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
    pub system_metrics: Arc<SystemMetrics>,
}

impl AppState {
    pub fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let scheduler = SchedulerConfig::try_from(&config.scheduler)
            .context("Invalid scheduler configuration")?;

        Ok(Self::from_parts(
            Repositories::postgres(pool),
            Arc::new(LogEmailService),
            Arc::new(RedirectPaymentGateway::new(config.payment_url.clone())),
            &config.jwt_secret,
            scheduler,
        ))
    }

    pub fn from_parts(
        repositories: Repositories,
        email: DynEmailService,
        payment: DynPaymentGateway,
        jwt_secret: &str,
        scheduler: SchedulerConfig,
    ) -> Self {
        let mut registry = Registry::default();

        let system_metrics = Arc::new(SystemMetrics::new());
        system_metrics.register(&mut registry);

        let di_container =
            DependenciesInject::new(repositories, email, payment, scheduler, &mut registry);

        Self {
            jwt_config: Arc::new(JwtConfig::new(jwt_secret)) as DynJwtService,
            di_container,
            registry: Arc::new(Mutex::new(registry)),
            system_metrics,
        }
    }
}
