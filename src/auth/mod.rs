//! Authentication Module
//! Mission: Gate VM access behind password login and signed session tokens

pub mod api;
pub mod credentials;
pub mod gateway;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use api::AuthState;
pub use credentials::CredentialStore;
pub use gateway::{AuthError, AuthGateway};
pub use jwt::{TokenService, TOKEN_TTL_SECS};
pub use middleware::auth_middleware;
