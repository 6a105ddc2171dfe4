pub mod book;
pub mod cart;
pub mod checkout;
pub mod email;
pub mod order;
pub mod payment;
pub mod promo;
pub mod user;
