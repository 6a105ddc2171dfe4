mod book;
mod cart_item;
mod order;
mod order_item;
mod order_status_history;
mod promo_code;
mod user;

pub use self::book::Book;
pub use self::cart_item::{CartItem, CartLine};
pub use self::order::{Order, OrderStatus, PaymentMethod, StatusActor, StatusBucket};
pub use self::order_item::OrderItem;
pub use self::order_status_history::OrderStatusHistory;
pub use self::promo_code::PromoCode;
pub use self::user::User;
