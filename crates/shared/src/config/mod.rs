mod database;
mod jwt;
mod myconfig;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::jwt::{Claims, JwtConfig};
pub use self::myconfig::{Config, SchedulerSettings};
