mod book;
mod cart;
mod checkout;
mod order;
mod promo;
mod user;

pub use self::book::BookRepository;
pub use self::cart::CartRepository;
pub use self::checkout::CheckoutRepository;
pub use self::order::{OrderCommandRepository, OrderQueryRepository};
pub use self::promo::PromoRepository;
pub use self::user::UserQueryRepository;
