mod service;
mod validator;

pub use self::service::PromoService;
pub use self::validator::{PromoValidator, round_money};
