use async_trait::async_trait;
use thiserror::Error;

use super::ClearReply;
use super::FileUpload;
use super::InitReply;
use super::QueryReply;
use super::UploadReply;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("STARK service is not reachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("STARK service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response from STARK service: {0}")]
    Decode(String),
    #[error("Failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Remote calls against the invoice question-answering service. Each call is
/// issued at most once; nothing is retried.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn initialize(&self) -> Result<InitReply, ExchangeError>;
    async fn send_file(&self, file: &FileUpload) -> Result<UploadReply, ExchangeError>;
    async fn send_question(&self, question: &str) -> Result<QueryReply, ExchangeError>;
    async fn clear_context(&self) -> Result<ClearReply, ExchangeError>;
}

pub type ExchangeClientBox = Box<dyn ExchangeClient>;
