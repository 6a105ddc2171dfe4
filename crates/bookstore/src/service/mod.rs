mod book;
mod cart;
mod email;
mod order;
mod payment;
mod promo;

pub use self::book::BookService;
pub use self::cart::CartService;
pub use self::email::LogEmailService;
pub use self::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService};
pub use self::payment::RedirectPaymentGateway;
pub use self::promo::{PromoService, PromoValidator, round_money};
