/**
 * Google OAuth 2.0 Client
 *
 * Authorization-code flow against Google: build the consent URL, trade the
 * returned code for an access token, then fetch the userinfo document and
 * turn it into an [`IdentityProfile`]. Endpoint URLs come from
 * `GoogleOAuthSettings`.
 */

use serde::Deserialize;
use thiserror::Error;

use crate::backend::auth::users::IdentityProfile;
use crate::backend::server::config::GoogleOAuthSettings;

const GOOGLE_SCOPES: &str = "openid email profile";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Google request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid authorization URL: {0}")]
    InvalidUrl(String),

    #[error("Google {endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("Google response missing {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleUserInfo {
    fn into_profile(self) -> Result<IdentityProfile, OAuthError> {
        let email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(OAuthError::MissingField("email"))?;
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.clone());

        Ok(IdentityProfile {
            provider_id: self.sub,
            name,
            email,
            profile_pic: self.picture,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    client: reqwest::Client,
    settings: GoogleOAuthSettings,
}

impl GoogleOAuth {
    pub fn new(settings: &GoogleOAuthSettings) -> Result<Self, OAuthError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    /// Consent-screen URL carrying `state`
    pub fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        let mut url = reqwest::Url::parse(&self.settings.authorize_url)
            .map_err(|e| OAuthError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", GOOGLE_SCOPES)
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Exchange an authorization code for the signed-in user's profile
    pub async fn exchange_code(&self, code: &str) -> Result<IdentityProfile, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("redirect_uri", self.settings.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let token_resp = self
            .client
            .post(&self.settings.token_url)
            .form(&params)
            .send()
            .await?;
        if !token_resp.status().is_success() {
            return Err(OAuthError::Status {
                endpoint: "token",
                status: token_resp.status().as_u16(),
            });
        }
        let token: TokenResponse = token_resp.json().await?;

        let user_resp = self
            .client
            .get(&self.settings.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !user_resp.status().is_success() {
            return Err(OAuthError::Status {
                endpoint: "userinfo",
                status: user_resp.status().as_u16(),
            });
        }
        let user: GoogleUserInfo = user_resp.json().await?;

        let profile = user.into_profile()?;
        tracing::debug!(provider_id = %profile.provider_id, "Google profile fetched");
        Ok(profile)
    }
}
