//! HttpBackend - REST implementation of the retrieval backend endpoints.
//!
//! Configuration comes from [`ClientConfig`]: the base URL fixes all three
//! endpoint URLs, and each call carries its own timeout.

use async_trait::async_trait;
use contextqa_core::backend::{
    BackendApi, ChatReply, ChatRequest, HealthReply, UploadFile, UploadReply,
};
use contextqa_core::config::{ClientConfig, Endpoints};
use contextqa_core::{ClientError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the backend over HTTP with `reqwest`.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
    chat_timeout: Duration,
    upload_timeout: Duration,
}

impl HttpBackend {
    pub fn new(endpoints: Endpoints, chat_timeout: Duration, upload_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoints,
            chat_timeout,
            upload_timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.endpoints(),
            config.request_timeout(),
            config.upload_timeout(),
        )
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn multipart_form(files: &[UploadFile]) -> Result<Form> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    ClientError::validation(format!(
                        "Invalid content type '{}' for {}: {}",
                        file.content_type, file.name, e
                    ))
                })?;
            form = form.part("files", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn upload(&self, files: &[UploadFile]) -> Result<UploadReply> {
        let form = Self::multipart_form(files)?;

        tracing::info!(
            "[Upload] POST {} ({} file(s))",
            self.endpoints.upload,
            files.len()
        );

        let response = self
            .client
            .post(&self.endpoints.upload)
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        decode_response(response).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        tracing::info!(
            "[Chat] POST {} (session {})",
            self.endpoints.chat,
            request.session_id
        );

        let response = self
            .client
            .post(&self.endpoints.chat)
            .json(request)
            .timeout(self.chat_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        decode_response(response).await
    }

    async fn health(&self) -> Result<HealthReply> {
        let response = self
            .client
            .get(&self.endpoints.health)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(transport_error)?;

        decode_response(response).await
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::transport("Request timed out.")
    } else {
        ClientError::transport(err.to_string())
    }
}

/// Classifies a response: non-2xx becomes `Http`, an undecodable 2xx body
/// becomes `Transport`.
async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        tracing::warn!("[Backend] HTTP {} from {} (detail: {:?})", status, url, detail);
        return Err(ClientError::http(status.as_u16(), detail));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ClientError::transport(format!("Failed to read response body: {}", e)))?;

    parse_success_body(&body)
}

/// Decodes a 2xx body into `T`.
pub fn parse_success_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| ClientError::transport(format!("Malformed response from backend: {}", e)))
}

/// Pulls the human-readable `detail` string out of an error body.
///
/// Returns `None` when the body is not JSON, has no `detail`, or the detail
/// is not a string (request validation errors carry a list there).
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
