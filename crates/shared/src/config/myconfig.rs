use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub interval_secs: u64,
    pub ship_after_hours: i64,
    pub deliver_after_hours: i64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            ship_after_hours: 48,
            deliver_after_hours: 96,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_min_conn: u32,
    pub db_max_conn: u32,
    pub otel_endpoint: String,
    pub payment_url: String,
    pub scheduler: SchedulerSettings,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_min_conn = env_or("DB_MIN_CONN", 1u32)?;
        let db_max_conn = env_or("DB_MAX_CONN", 10u32)?;

        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        let payment_url = std::env::var("PAYMENT_URL")
            .unwrap_or_else(|_| "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string());

        let defaults = SchedulerSettings::default();
        let scheduler = SchedulerSettings {
            interval_secs: env_or("SCHEDULER_INTERVAL_SECS", defaults.interval_secs)?,
            ship_after_hours: env_or("SHIP_AFTER_HOURS", defaults.ship_after_hours)?,
            deliver_after_hours: env_or("DELIVER_AFTER_HOURS", defaults.deliver_after_hours)?,
        };

        if scheduler.interval_secs == 0 {
            return Err(anyhow!("SCHEDULER_INTERVAL_SECS must be greater than zero"));
        }

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            db_min_conn,
            db_max_conn,
            otel_endpoint,
            payment_url,
            scheduler,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
