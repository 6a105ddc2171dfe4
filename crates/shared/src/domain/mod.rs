mod auth;
mod responses;

pub use self::auth::{AuthUser, UserRole};
pub use self::responses::{ApiResponse, ApiResponsePagination, Pagination};
