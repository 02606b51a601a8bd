//! Authentication: password hashing, bearer tokens, login and the route guard

pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

pub use middleware::jwt_auth_middleware;
pub use password::PasswordManager;
pub use service::{AuthService, LoginRequest, LoginResponse};
pub use token::{Claims, IssuedToken, Principal, TokenAuthenticator};

#[cfg(test)]
pub(crate) use token::test_clock;
