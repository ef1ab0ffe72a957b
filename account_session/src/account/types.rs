use serde::{Deserialize, Serialize};

use crate::session::{SessionToken, UserId};

/// Result of a successful registration or login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub token: SessionToken,
    pub uid: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    pub uid: UserId,
    pub old_email: String,
    pub new_email: String,
    pub password_hash: String,
}

/// Profile fields accepted by update-or-create; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_banner_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ProfileFields {
    /// Overwrite every field that `update` sets
    pub(crate) fn merge(&mut self, update: ProfileFields) {
        let ProfileFields {
            username,
            avatar,
            user_banner_image,
            signature,
            gender,
            label,
        } = update;
        if username.is_some() {
            self.username = username;
        }
        if avatar.is_some() {
            self.avatar = avatar;
        }
        if user_banner_image.is_some() {
            self.user_banner_image = user_banner_image;
        }
        if signature.is_some() {
            self.signature = signature;
        }
        if gender.is_some() {
            self.gender = gender;
        }
        if label.is_some() {
            self.label = label;
        }
    }
}

/// Account record as returned by profile reads; email is the source of truth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub uid: UserId,
    pub email: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl ProfileResponse {
    pub(crate) fn rejected() -> Self {
        Self {
            success: false,
            user_info: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCheckResponse {
    pub success: bool,
    pub user_token_ok: bool,
}
