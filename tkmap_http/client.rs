use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use tkmap_app::{
    config::Config,
    transport::{CacheRequest, MapTransport, RegionRequest},
};
use tkmap_types::errors::{ApplicationError, TransportError};

/// Talks to the game API over HTTP, reusing the session of a logged-in
/// browser.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    api_url: String,
    session: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            session: config.session.clone(),
        })
    }

    async fn call<P: Serialize + ?Sized>(
        &self,
        controller: &str,
        action: &str,
        params: &P,
    ) -> Result<Value, ApplicationError> {
        let body = envelope(controller, action, params, &self.session)?;
        debug!(controller, action, "Calling game API");

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("c", controller), ("a", action)])
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        if let Some(message) = error_message(&body) {
            return Err(TransportError::Api(message).into());
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl MapTransport for HttpTransport {
    async fn get_by_region_ids(&self, request: &RegionRequest) -> Result<Value, ApplicationError> {
        self.call("map", "getByRegionIds", request).await
    }

    async fn get_cache(&self, request: &CacheRequest) -> Result<Value, ApplicationError> {
        self.call("cache", "get", request).await
    }
}

fn envelope<P: Serialize + ?Sized>(
    controller: &str,
    action: &str,
    params: &P,
    session: &str,
) -> Result<Value, ApplicationError> {
    Ok(json!({
        "controller": controller,
        "action": action,
        "params": serde_json::to_value(params)?,
        "session": session,
    }))
}

/// The API answers failures with a 200 and an `error` member, either a plain
/// message or an object carrying one.
fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(details) => Some(
            details
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        ),
        other => Some(other.to_string()),
    }
}
