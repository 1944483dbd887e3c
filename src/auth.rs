// ABOUTME: Bearer-token authentication for the admin API using HS256 JWTs
// ABOUTME: Issues and verifies tokens, gates admin routes and handles login and logout

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    response::Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::{LoginRequest, LoginResponse, SuccessResponse};
use crate::validate::Validate;
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid authentication credentials";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Signs and verifies admin access tokens.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn create_access_token(&self, username: &str) -> Result<IssuedToken> {
        self.issue(username, self.ttl)
    }

    pub(crate) fn issue(&self, username: &str, ttl: Duration) -> Result<IssuedToken> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(username.to_string()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            jti: claims.jti.unwrap_or_default(),
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("Token has expired".to_string()),
                _ => AppError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            })
    }
}

/// An authenticated administrator, extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
    pub jti: Option<String>,
    pub expires_at: i64,
}

pub fn verify_token(state: &AppState, token: &str) -> Result<AdminSession> {
    let claims = state.auth.decode(token)?;

    let username = claims
        .sub
        .filter(|sub| !sub.is_empty())
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if let Some(jti) = &claims.jti {
        if state.sessions.is_revoked(jti) {
            tracing::warn!("Rejected revoked token for {}", username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    }

    Ok(AdminSession {
        username,
        jti: claims.jti,
        expires_at: claims.exp,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Forbidden("Not authenticated".to_string()))?;

        verify_token(state, bearer.token()).inspect_err(|err| {
            tracing::warn!("Admin authentication failed: {}", err);
        })
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.validate()?;

    let Some(admin) = state
        .storage
        .authenticate_admin(&req.username, &req.password)
        .await?
    else {
        tracing::warn!("Failed admin login for {}", req.username);
        return Ok(Json(LoginResponse {
            success: false,
            message: "Invalid credentials".to_string(),
            username: None,
            access_token: None,
            token_type: None,
        }));
    };

    let issued = state.auth.create_access_token(&admin.username)?;
    state.sessions.cleanup_expired_sessions(issued.issued_at);
    state
        .sessions
        .create_session(&issued.jti, &admin.username, issued.issued_at, issued.expires_at);
    tracing::info!("Admin {} logged in", admin.username);

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        username: Some(admin.username),
        access_token: Some(issued.token),
        token_type: Some("bearer".to_string()),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    session: AdminSession,
) -> Result<Json<SuccessResponse>> {
    if let Some(jti) = &session.jti {
        if let Some(data) = state.sessions.get_session(jti) {
            tracing::debug!(
                "Ending session for {} opened at {}",
                data.username,
                data.issued_at
            );
        }
        state.sessions.revoke(jti, session.expires_at);
    }
    tracing::info!(
        "Admin {} logged out ({} sessions still active)",
        session.username,
        state.sessions.active_sessions()
    );
    Ok(Json(SuccessResponse::new("Logged out successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let authority = TokenAuthority::new("secret", 60);
        let issued = authority.create_access_token("medicaps_admin_2025").unwrap();
        let claims = authority.decode(&issued.token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("medicaps_admin_2025"));
        assert_eq!(claims.jti.as_deref(), Some(issued.jti.as_str()));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_reported() {
        let authority = TokenAuthority::new("secret", 60);
        let issued = authority.issue("admin", Duration::minutes(-5)).unwrap();
        match authority.decode(&issued.token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token has expired"),
            other => panic!("expected expiry error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issued = TokenAuthority::new("one", 60)
            .create_access_token("admin")
            .unwrap();
        match TokenAuthority::new("two", 60).decode(&issued.token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, INVALID_CREDENTIALS),
            other => panic!("expected invalid credentials, got {:?}", other),
        }
    }
}
