pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{ActionOutcome, AuthError, AuthResult, AuthService, CreateUser, UserSummary};
pub use auth_service_impl::SeaOrmAuthService;

pub mod password;
pub use password::{PasswordHasher, VerificationError};

pub mod records;
pub use records::RecordService;
