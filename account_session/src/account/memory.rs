use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use crate::session::{SESSION_COOKIE_MAX_AGE, SessionToken, UserId};
use crate::utils::gen_random_string;

use super::service::{AccountService, AccountServiceError, Rejection};
use super::types::{
    AuthResult, ExistsResponse, LoginRequest, ProfileFields, ProfileResponse, RegisterRequest,
    SuccessResponse, TokenCheckResponse, UpdateEmailRequest, UserInfo,
};

struct StoredAccount {
    email: String,
    password_hash: String,
    #[allow(dead_code)] // Kept with the record; never returned to clients
    password_hint: Option<String>,
    profile: ProfileFields,
}

struct IssuedToken {
    uid: UserId,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Accounts {
    last_uid: i64,
    by_uid: HashMap<UserId, StoredAccount>,
    tokens: HashMap<String, IssuedToken>,
}

impl Accounts {
    fn uid_by_email(&self, email: &str) -> Option<UserId> {
        self.by_uid
            .iter()
            .find(|(_, account)| account.email.eq_ignore_ascii_case(email))
            .map(|(uid, _)| *uid)
    }

    fn token_is_valid(&mut self, uid: UserId, token: &SessionToken) -> bool {
        let Some(issued) = self.tokens.get(token.as_str()) else {
            return false;
        };
        if issued.expires_at < Utc::now() {
            tracing::debug!("Token for uid {} expired at {}", issued.uid, issued.expires_at);
            self.tokens.remove(token.as_str());
            return false;
        }
        issued.uid == uid
    }

    /// Record an issued token; expired tokens are dropped on the way
    fn store_token(&mut self, token: String, issued: IssuedToken) -> SessionToken {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, t| t.expires_at >= now);
        let pruned = before - self.tokens.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} expired tokens", pruned);
        }
        self.tokens.insert(token.clone(), issued);
        SessionToken::new(token)
    }

    fn user_info(&self, uid: UserId) -> Option<UserInfo> {
        self.by_uid.get(&uid).map(|account| UserInfo {
            uid,
            email: account.email.clone(),
            profile: account.profile.clone(),
        })
    }
}

/// Account Service kept entirely in process memory
///
/// Used by the demo server and tests. Tokens are 32 random bytes, base64url
/// encoded, and expire after the configured session lifetime.
pub struct InMemoryAccountService {
    accounts: Mutex<Accounts>,
    token_ttl: Duration,
}

impl InMemoryAccountService {
    pub fn new() -> Self {
        let ttl = i64::try_from(*SESSION_COOKIE_MAX_AGE)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::days(365));
        Self::with_token_ttl(ttl)
    }

    pub fn with_token_ttl(token_ttl: Duration) -> Self {
        tracing::info!("Creating new in-memory account service");
        Self {
            accounts: Mutex::new(Accounts::default()),
            token_ttl,
        }
    }

    /// Invalidate a previously issued token
    pub async fn revoke_token(&self, token: &str) -> bool {
        self.accounts.lock().await.tokens.remove(token).is_some()
    }

    /// Generate a token for `uid` without recording it
    fn mint_token(&self, uid: UserId) -> Result<(String, IssuedToken), AccountServiceError> {
        let token = gen_random_string(32)
            .map_err(|e| AccountServiceError::Unavailable(e.to_string()))?;
        let issued = IssuedToken {
            uid,
            expires_at: Utc::now()
                .checked_add_signed(self.token_ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        Ok((token, issued))
    }
}

impl Default for InMemoryAccountService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_well_formed_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn hashes_match(stored: &str, presented: &str) -> bool {
    stored.as_bytes().ct_eq(presented.as_bytes()).into()
}

#[async_trait]
impl AccountService for InMemoryAccountService {
    async fn register(&self, request: RegisterRequest) -> Result<AuthResult, AccountServiceError> {
        if !is_well_formed_email(&request.email) || request.password_hash.is_empty() {
            return Err(Rejection::InvalidCredentialFormat.into());
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.uid_by_email(&request.email).is_some() {
            return Err(Rejection::DuplicateEmail.into());
        }

        // Nothing is recorded until the token exists
        let uid = UserId::new(accounts.last_uid + 1);
        let (token, issued) = self.mint_token(uid)?;

        accounts.last_uid = uid.get();
        accounts.by_uid.insert(
            uid,
            StoredAccount {
                email: request.email.clone(),
                password_hash: request.password_hash,
                password_hint: request.password_hint,
                profile: ProfileFields::default(),
            },
        );
        let token = accounts.store_token(token, issued);

        tracing::debug!("Registered uid {}", uid);
        Ok(AuthResult {
            token,
            uid,
            email: request.email,
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthResult, AccountServiceError> {
        let mut accounts = self.accounts.lock().await;
        let uid = accounts
            .uid_by_email(&request.email)
            .ok_or(Rejection::InvalidCredentials)?;

        let email = match accounts.by_uid.get(&uid) {
            Some(account) if hashes_match(&account.password_hash, &request.password_hash) => {
                account.email.clone()
            }
            _ => return Err(Rejection::InvalidCredentials.into()),
        };
        let (token, issued) = self.mint_token(uid)?;
        let token = accounts.store_token(token, issued);

        Ok(AuthResult { token, uid, email })
    }

    async fn exists_by_email(&self, email: &str) -> Result<ExistsResponse, AccountServiceError> {
        let accounts = self.accounts.lock().await;
        Ok(ExistsResponse {
            exists: accounts.uid_by_email(email).is_some(),
        })
    }

    async fn update_email(
        &self,
        request: UpdateEmailRequest,
    ) -> Result<SuccessResponse, AccountServiceError> {
        let mut accounts = self.accounts.lock().await;

        let authorized = accounts.by_uid.get(&request.uid).is_some_and(|account| {
            account.email.eq_ignore_ascii_case(&request.old_email)
                && hashes_match(&account.password_hash, &request.password_hash)
        });
        if !authorized {
            return Err(Rejection::InvalidCredentials.into());
        }
        if !is_well_formed_email(&request.new_email) {
            return Err(Rejection::InvalidCredentialFormat.into());
        }
        if accounts
            .uid_by_email(&request.new_email)
            .is_some_and(|owner| owner != request.uid)
        {
            return Err(Rejection::EmailInUse.into());
        }

        if let Some(account) = accounts.by_uid.get_mut(&request.uid) {
            account.email = request.new_email;
        }
        Ok(SuccessResponse { success: true })
    }

    async fn upsert_profile(
        &self,
        fields: ProfileFields,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        let mut accounts = self.accounts.lock().await;
        if !accounts.token_is_valid(uid, token) {
            return Ok(ProfileResponse::rejected());
        }

        if let Some(account) = accounts.by_uid.get_mut(&uid) {
            account.profile.merge(fields);
        }
        Ok(match accounts.user_info(uid) {
            Some(info) => ProfileResponse {
                success: true,
                user_info: Some(info),
            },
            None => ProfileResponse::rejected(),
        })
    }

    async fn get_profile(
        &self,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<ProfileResponse, AccountServiceError> {
        let mut accounts = self.accounts.lock().await;
        if !accounts.token_is_valid(uid, token) {
            return Ok(ProfileResponse::rejected());
        }
        Ok(match accounts.user_info(uid) {
            Some(info) => ProfileResponse {
                success: true,
                user_info: Some(info),
            },
            None => ProfileResponse::rejected(),
        })
    }

    async fn check_token(
        &self,
        uid: UserId,
        token: &SessionToken,
    ) -> Result<TokenCheckResponse, AccountServiceError> {
        let mut accounts = self.accounts.lock().await;
        let user_token_ok = accounts.token_is_valid(uid, token);
        Ok(TokenCheckResponse {
            success: true,
            user_token_ok,
        })
    }
}
