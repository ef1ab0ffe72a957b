mod memory;
mod service;
mod types;

pub use memory::InMemoryAccountService;
pub use service::{AccountService, AccountServiceError, Rejection};
pub use types::{
    AuthResult, ExistsResponse, LoginRequest, ProfileFields, ProfileResponse, RegisterRequest,
    SuccessResponse, TokenCheckResponse, UpdateEmailRequest, UserInfo,
};
