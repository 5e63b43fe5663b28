//! Remote API gateway.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use tracing::{debug, warn};

use racketeer_config::ApiConfig;
use racketeer_protocols::{
    ActionKind, ActionOutcome, ApiError, CharacterState, GameApi, TrainOutcome, TrainingStat,
};

/// HTTP client for the game API.
///
/// Every request carries the bearer token and a JSON content type. Failures
/// come back as [`ApiError`] values; there are no retries at this layer.
pub struct ApiGateway {
    base_url: String,
    auth_token: String,
    client: reqwest::Client,
}

impl ApiGateway {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_url(config.base_url.clone(), config.auth_token.clone())
    }

    /// Create a gateway against a custom base URL.
    pub fn with_url(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        let auth_token: String = auth_token.into();
        let auth_token = auth_token
            .trim()
            .strip_prefix("Bearer ")
            .unwrap_or(auth_token.trim())
            .to_string();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and return the parsed JSON body.
    ///
    /// `body` is only serialized for non-GET methods. A 2xx response whose
    /// JSON carries `"status": "error"` is reported as [`ApiError::Rejected`].
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .header("Content-Type", "application/json");
        if let Some(body) = body.filter(|_| method != Method::GET) {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| message_of(&v))
                .unwrap_or_else(|| {
                    if text.trim().is_empty() {
                        status.canonical_reason().unwrap_or("Request failed").to_string()
                    } else {
                        text.clone()
                    }
                });
            warn!("{} {} failed with {}: {}", method, endpoint, status.as_u16(), message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;

        if value.get("status").and_then(Value::as_str) == Some("error") {
            let message = message_of(&value).unwrap_or_else(|| "Unknown error".to_string());
            return Err(ApiError::Rejected(message));
        }

        Ok(value)
    }
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl GameApi for ApiGateway {
    async fn character_updates(&self) -> Result<CharacterState, ApiError> {
        self.call("/character-updates", Method::GET, None)
            .await
            .map(CharacterState::new)
    }

    async fn train(&self, stat: TrainingStat) -> Result<TrainOutcome, ApiError> {
        let body = json!({ "stat": stat });
        self.call("/fight-club/train", Method::POST, Some(&body))
            .await
            .map(TrainOutcome::from_value)
    }

    async fn perform(&self, kind: ActionKind, id: u64) -> Result<ActionOutcome, ApiError> {
        self.call(&kind.endpoint(id), Method::POST, None)
            .await
            .map(ActionOutcome::from_value)
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
