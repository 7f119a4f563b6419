use crate::domain::tts::SynthesisError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Tokens are refreshed this long before Google expires them
const REFRESH_MARGIN_SECS: i64 = 60;

/// The subset of a service account JSON key needed for the JWT-bearer grant
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct GoogleAccessToken {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

/// Issues OAuth access tokens for a Google service account.
///
/// Built once at startup and shared by every request; the token cache is the
/// only mutable state.
pub struct GoogleServiceAccountClient {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http_client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl GoogleServiceAccountClient {
    /// Load the key file referenced by `GOOGLE_APPLICATION_CREDENTIALS`
    pub fn from_file(path: &Path, http_client: reqwest::Client) -> Result<Self, SynthesisError> {
        if !path.exists() {
            return Err(SynthesisError::Misconfigured(format!(
                "Credentials file not found at '{}'",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            SynthesisError::Misconfigured(format!(
                "Failed to read credentials file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&raw, http_client)
    }

    pub fn from_json(raw: &str, http_client: reqwest::Client) -> Result<Self, SynthesisError> {
        let key: ServiceAccountKey = serde_json::from_str(raw).map_err(|e| {
            SynthesisError::Misconfigured(format!("Invalid service account key: {}", e))
        })?;

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            SynthesisError::Misconfigured(format!("Invalid service account private key: {}", e))
        })?;

        Ok(Self {
            key,
            encoding_key,
            http_client,
            cached: RwLock::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Return a valid access token, exchanging a new assertion when the
    /// cached one is missing or about to expire
    pub async fn access_token(&self) -> Result<String, SynthesisError> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;

        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange_assertion().await?;
        tracing::info!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Google access token refreshed"
        );

        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });

        Ok(value)
    }

    /// Drop the cached token so the next call exchanges a fresh one
    pub async fn invalidate_token(&self) {
        *self.cached.write().await = None;
    }

    pub fn build_assertion(&self, now: DateTime<Utc>) -> Result<String, SynthesisError> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key).map_err(|e| {
            SynthesisError::Misconfigured(format!("Failed to sign service account assertion: {}", e))
        })
    }

    async fn exchange_assertion(&self) -> Result<GoogleAccessToken, SynthesisError> {
        let assertion = self.build_assertion(Utc::now())?;
        let params = [
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                SynthesisError::Unavailable(format!("Google token exchange failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = format!("Google token exchange failed ({}): {}", status, error_text);
            tracing::error!(status = %status, client_email = %self.key.client_email, "{}", message);

            // 4xx from the token endpoint means the key itself was refused
            return Err(if status.is_client_error() {
                SynthesisError::Misconfigured(message)
            } else {
                SynthesisError::Unavailable(message)
            });
        }

        response.json::<GoogleAccessToken>().await.map_err(|e| {
            SynthesisError::Unavailable(format!("Failed to parse Google token: {}", e))
        })
    }
}
