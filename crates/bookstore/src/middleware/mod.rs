pub mod jwt;
pub mod validate;
