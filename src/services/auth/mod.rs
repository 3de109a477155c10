pub mod access_jwt;
pub mod factory;

pub use access_jwt::{AuthService, Claims};
pub use factory::build_auth_service;
