#[cfg(test)]
#[path = "stark_api_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ClearReply;
use crate::domain::models::ExchangeClient;
use crate::domain::models::ExchangeError;
use crate::domain::models::FileUpload;
use crate::domain::models::InitReply;
use crate::domain::models::QueryReply;
use crate::domain::models::UploadReply;

/// Sent on every request so tunnelled deployments skip their interstitial
/// warning page.
pub const BYPASS_HEADER: &str = "ngrok-skip-browser-warning";

const CLEARED_FALLBACK: &str = "Invoice context cleared.";

#[derive(Deserialize)]
struct InitResponse {
    message: Option<String>,
    #[serde(default)]
    invoice_loaded: bool,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    success: bool,
}

#[derive(Deserialize)]
struct QueryData {
    answer: Option<String>,
}

#[derive(Deserialize)]
struct QueryResponse {
    data: Option<QueryData>,
    #[serde(default)]
    invoice_loaded: bool,
}

#[derive(Deserialize)]
struct ClearResponse {
    message: Option<String>,
}

pub struct StarkApi {
    url: String,
    http: reqwest::Client,
}

impl StarkApi {
    pub fn new(url: &str, timeout: Duration) -> Result<StarkApi> {
        let mut headers = HeaderMap::new();
        headers.insert(BYPASS_HEADER, HeaderValue::from_static("true"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        return Ok(StarkApi {
            url: url.trim_end_matches('/').to_string(),
            http,
        });
    }

    pub fn from_config() -> Result<StarkApi> {
        let timeout = Config::get(ConfigKey::RequestTimeout).parse::<u64>()?;
        return StarkApi::new(
            &Config::get(ConfigKey::ApiUrl),
            Duration::from_millis(timeout),
        );
    }

    fn endpoint(&self, path: &str) -> String {
        return format!("{}{path}", self.url);
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        call: &str,
        response: reqwest::Response,
    ) -> Result<T, ExchangeError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(call, status = status.as_u16(), body = %body, "STARK call failed");
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        return serde_json::from_str::<T>(&body).map_err(|err| {
            tracing::error!(call, error = %err, "STARK response did not decode");
            return ExchangeError::Decode(err.to_string());
        });
    }
}

#[async_trait]
impl ExchangeClient for StarkApi {
    async fn initialize(&self) -> Result<InitReply, ExchangeError> {
        let response = self.http.get(self.endpoint("/")).send().await?;
        let res: InitResponse = self.decode("init", response).await?;

        return Ok(InitReply {
            welcome_text: res.message.filter(|e| return !e.trim().is_empty()),
            context_loaded: res.invoice_loaded,
        });
    }

    async fn send_file(&self, file: &FileUpload) -> Result<UploadReply, ExchangeError> {
        tracing::debug!(
            name = file.name,
            mime_type = file.mime_type,
            size = file.bytes.len(),
            "uploading file"
        );

        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.to_string())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;
        let res: UploadResponse = self.decode("upload", response).await?;

        return Ok(UploadReply {
            result_text: res.message,
            accepted: res.success,
        });
    }

    async fn send_question(&self, question: &str) -> Result<QueryReply, ExchangeError> {
        let response = self
            .http
            .post(self.endpoint("/query"))
            .json(&json!({ "question": question }))
            .send()
            .await?;
        let res: QueryResponse = self.decode("query", response).await?;

        let answer_text = res
            .data
            .and_then(|e| return e.answer)
            .ok_or_else(|| return ExchangeError::Decode("missing data.answer".to_string()))?;

        return Ok(QueryReply {
            answer_text,
            context_loaded: res.invoice_loaded,
        });
    }

    async fn clear_context(&self) -> Result<ClearReply, ExchangeError> {
        let response = self.http.delete(self.endpoint("/invoice")).send().await?;
        let res: ClearResponse = self.decode("clear", response).await?;

        return Ok(ClearReply {
            confirmation_text: res
                .message
                .unwrap_or_else(|| return CLEARED_FALLBACK.to_string()),
        });
    }
}
