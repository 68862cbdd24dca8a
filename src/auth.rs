// src/auth.rs
use crate::app_log;
use crate::core::config_manager::MAX_TOKEN_TTL_HOURS;
use crate::repositories::UserRepository;
use crate::types::{Role, User};
use crate::workflow::ApplicationWorkflow;
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub email: String,
    pub role: Role,
    pub exp: usize, // Expiration timestamp
    pub iat: usize, // Issued at timestamp
}

pub struct AuthConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthConfig {
    /// `token_ttl_hours` is clamped to one year either way
    pub fn new(secret: &str, token_ttl_hours: i64) -> Self {
        let hours = token_ttl_hours.clamp(-MAX_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::hours(hours),
        }
    }

    /// Mint an HS256 bearer token for `user`
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp().max(0) as usize,
            exp: (now + self.token_ttl).timestamp().max(0) as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

/// Caller identified by a verified bearer token
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// Whether the caller may act as `user_id` (themselves, or any user for admins)
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.user.can_act_for(user_id)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                app_log!(error, "AuthConfig is not managed by this server");
                return fail(req, status, AuthError::Misconfigured);
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let workflow = match req.guard::<&State<ApplicationWorkflow>>().await {
            Outcome::Success(workflow) => workflow,
            Outcome::Error((status, _)) => {
                app_log!(error, "ApplicationWorkflow is not managed by this server");
                return fail(req, status, AuthError::Misconfigured);
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        // Extract Authorization header
        let token = match req.headers().get_one("Authorization") {
            Some(header) if header.starts_with("Bearer ") => header[7..].trim(),
            Some(_) => {
                app_log!(warn, "Invalid Authorization header format");
                return fail(req, Status::Unauthorized, AuthError::InvalidToken);
            }
            None => {
                app_log!(warn, "Missing Authorization header");
                return fail(req, Status::Unauthorized, AuthError::MissingToken);
            }
        };

        let claims = match auth_config.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                app_log!(warn, "Token verification failed: {}", e);
                return fail(req, Status::Unauthorized, AuthError::TokenVerificationFailed);
            }
        };

        let mut conn = match workflow.database().pool().acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                app_log!(error, "Database connection failed: {}", e);
                return fail(req, Status::InternalServerError, AuthError::DatabaseError);
            }
        };

        let user = match UserRepository::new(&mut *conn).find_by_id(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                app_log!(warn, "Token subject {} no longer exists", claims.sub);
                return fail(req, Status::Unauthorized, AuthError::UnknownUser);
            }
            Err(e) => {
                app_log!(error, "Failed to load user {}: {}", claims.sub, e);
                return fail(req, Status::InternalServerError, AuthError::DatabaseError);
            }
        };

        app_log!(debug, "User {} authenticated as {}", user.email, user.role);

        Outcome::Success(AuthenticatedUser { user })
    }
}

/// Message of the last authentication failure on a request, for the 401 catcher
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthFailure(pub Option<&'static str>);

fn fail<T>(req: &Request<'_>, status: Status, error: AuthError) -> Outcome<T, AuthError> {
    req.local_cache(|| AuthFailure(Some(error.message())));
    Outcome::Error((status, error))
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    UnknownUser,
    DatabaseError,
    Misconfigured,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Yêu cầu mã xác thực",
            AuthError::InvalidToken => "Định dạng mã xác thực không hợp lệ",
            AuthError::TokenVerificationFailed => "Mã xác thực không hợp lệ hoặc đã hết hạn",
            AuthError::UnknownUser => "Tài khoản không tồn tại",
            AuthError::DatabaseError => "Lỗi cơ sở dữ liệu",
            AuthError::Misconfigured => "Máy chủ chưa được cấu hình đúng",
        }
    }
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}
