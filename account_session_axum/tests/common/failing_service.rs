use account_session::{
    AccountService, AccountServiceError, AuthResult, ExistsResponse, LoginRequest,
    ProfileFields, ProfileResponse, RegisterRequest, SessionToken, SuccessResponse,
    TokenCheckResponse, UpdateEmailRequest, UserId,
};
use async_trait::async_trait;

/// Backend that cannot be reached
pub struct UnreachableService;

fn unreachable() -> AccountServiceError {
    AccountServiceError::Unavailable("connection refused to 10.0.0.5:5432".to_string())
}

#[async_trait]
impl AccountService for UnreachableService {
    async fn register(&self, _req: RegisterRequest) -> Result<AuthResult, AccountServiceError> {
        Err(unreachable())
    }

    async fn login(&self, _req: LoginRequest) -> Result<AuthResult, AccountServiceError> {
        Err(unreachable())
    }

    async fn exists_by_email(&self, _email: &str) -> Result<ExistsResponse, AccountServiceError> {
        Err(unreachable())
    }

    async fn update_email(
        &self,
        _req: UpdateEmailRequest,
    ) -> Result<SuccessResponse, AccountServiceError> {
        Err(unreachable())
    }

    async fn upsert_profile(
        &self,
        _fields: ProfileFields,
        _uid: UserId,
        _token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        Err(unreachable())
    }

    async fn get_profile(
        &self,
        _uid: UserId,
        _token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        Err(unreachable())
    }

    async fn check_token(
        &self,
        _uid: UserId,
        _token: &SessionToken,
    ) -> Result<TokenCheckResponse, AccountServiceError> {
        Err(unreachable())
    }
}
