//! Cookie-backed user identity

use super::cipher::CookieCipher;
use crate::config::models::auth::AuthConfig;
use crate::core::deletion::UserToken;
use crate::utils::error::Result;
use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration};
use tracing::debug;
use uuid::Uuid;

/// The resolved user for one request
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: UserToken,
    /// Cookie to attach to the response when the identity was just issued
    pub issued: Option<Cookie<'static>>,
}

impl Identity {
    pub fn is_new(&self) -> bool {
        self.issued.is_some()
    }
}

/// Resolves the caller of a request to a user token
pub trait IdentityProvider: Send + Sync {
    fn identify(&self, req: &HttpRequest) -> Result<Identity>;
}

/// Identity carried in an encrypted cookie
#[derive(Debug, Clone)]
pub struct CookieIdentity {
    cipher: CookieCipher,
    cookie_name: String,
    max_age: i64,
}

impl CookieIdentity {
    pub fn new(cipher: CookieCipher, cookie_name: impl Into<String>, max_age: i64) -> Self {
        Self {
            cipher,
            cookie_name: cookie_name.into(),
            max_age,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = config.effective_secret();
        Self::new(
            CookieCipher::new(secret.as_bytes()),
            config.cookie_name.clone(),
            config.cookie_max_age,
        )
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Build the cookie for `user`
    pub fn issue(&self, user: &UserToken) -> Result<Cookie<'static>> {
        let value = self.cipher.seal(user.as_str())?;
        Ok(Cookie::build(self.cookie_name.clone(), value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(self.max_age))
            .finish())
    }

    /// Recover the user from a cookie value; `None` when it cannot be trusted
    pub fn recover(&self, value: &str) -> Option<UserToken> {
        let plaintext = match self.cipher.open(value) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                debug!(error = %e, "Rejected identity cookie");
                return None;
            }
        };
        Uuid::parse_str(&plaintext)
            .ok()
            .map(|id| UserToken::new(id.to_string()))
    }
}

impl IdentityProvider for CookieIdentity {
    fn identify(&self, req: &HttpRequest) -> Result<Identity> {
        if let Some(user) = req
            .cookie(&self.cookie_name)
            .and_then(|cookie| self.recover(cookie.value()))
        {
            return Ok(Identity { user, issued: None });
        }

        let user = UserToken::new(Uuid::new_v4().to_string());
        debug!(user = %user, "Issuing new identity");
        let cookie = self.issue(&user)?;
        Ok(Identity {
            user,
            issued: Some(cookie),
        })
    }
}
