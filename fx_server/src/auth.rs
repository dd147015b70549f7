//! Access tokens.
//!
//! Users sign in with a username and password and receive an HS256 JSON web token. Protected handlers take a
//! [`JwtClaims`] argument, which pulls the token out of the `Authorization: Bearer <token>` header and validates it
//! against the [`TokenIssuer`] registered as app data. A request without a valid token is rejected with a 401 before
//! the handler runs.
use std::time::Duration;

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::Utc;
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The username the token was issued to.
    pub sub: String,
    /// The user's id.
    pub uid: i64,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn new<S: Into<String>>(username: S, user_id: i64, duration: Duration) -> Self {
        let iat = Utc::now().timestamp();
        let exp = iat.saturating_add(i64::try_from(duration.as_secs()).unwrap_or(i64::MAX));
        Self { sub: username.into(), uid: user_id, iat, exp }
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            expiry: Duration::from_secs(config.token_expiry),
        }
    }

    /// Issue a new access token for the given user.
    /// This method DOES NOT check the user's credentials. That must be done prior to calling `issue_token`.
    pub fn issue_token(&self, username: &str, user_id: i64) -> Result<String, ServerError> {
        let claims = JwtClaims::new(username, user_id, self.expiry);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServerError::CouldNotIssueAccessToken(e.to_string()))
    }

    /// Checks the token's signature and expiry time, and returns its claims.
    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(data.claims)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected 'Bearer <token>'".to_string()))
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<TokenIssuer>>() {
            None => {
                error!("🔑️ No token issuer has been registered with the application");
                Err(ServerError::ConfigurationError("Access tokens cannot be checked".to_string()))
            },
            Some(issuer) => bearer_token(req).and_then(|token| issuer.validate(token)).map_err(|e| {
                debug!("🔑️ Request to {} was not authenticated. {e}", req.path());
                ServerError::from(e)
            }),
        };
        ready(result)
    }
}
