use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::Event;
use crate::domain::models::ExchangeClientBox;
use crate::domain::models::FileUpload;
use crate::domain::models::Message;
use crate::domain::models::SendOutcome;

const UPLOAD_OK_FALLBACK: &str = "Invoice uploaded.";
const UPLOAD_REJECTED_FALLBACK: &str = "The invoice could not be processed.";

async fn initialize(
    client: &ExchangeClientBox,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match client.initialize().await {
        Ok(reply) => {
            tracing::info!(
                context_loaded = reply.context_loaded,
                welcome = reply.welcome_text.is_some(),
                "STARK service initialized"
            );
            event_tx.send(Event::InitSucceeded(reply))?;
        }
        Err(err) => {
            tracing::error!(error = %err, "STARK service init failed");
            event_tx.send(Event::InitFailed(err.to_string()))?;
        }
    }

    Ok(())
}

/// Runs the remote half of a send. Each completed call is reported as its own
/// reply, so a failed question still keeps the upload answer.
async fn exchange(
    client: &ExchangeClientBox,
    session_id: &str,
    text: &str,
    file: Option<PathBuf>,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    if let Some(path) = file {
        let upload = FileUpload::from_path(&path).await?;
        let reply = client.send_file(&upload).await?;

        let mut result_text = reply.result_text;
        if result_text.trim().is_empty() {
            result_text = if reply.accepted {
                UPLOAD_OK_FALLBACK.to_string()
            } else {
                UPLOAD_REJECTED_FALLBACK.to_string()
            };
        }

        event_tx.send(Event::AssistantReply {
            session_id: session_id.to_string(),
            message: Message::new(Author::Ai, &result_text),
            context_loaded: reply.accepted.then_some(true),
        })?;
    }

    if !text.trim().is_empty() {
        let reply = client.send_question(text).await?;
        event_tx.send(Event::AssistantReply {
            session_id: session_id.to_string(),
            message: Message::new(Author::Ai, &reply.answer_text),
            context_loaded: Some(reply.context_loaded),
        })?;
    }

    Ok(())
}

async fn submit(
    client: &ExchangeClientBox,
    session_id: String,
    text: String,
    file: Option<PathBuf>,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let outcome = match exchange(client, &session_id, &text, file, event_tx).await {
        Ok(()) => SendOutcome::Success,
        Err(err) => {
            tracing::error!(session_id, error = %err, "send failed");
            SendOutcome::Failure(err.to_string())
        }
    };

    event_tx.send(Event::SendSettled {
        session_id,
        outcome,
    })?;

    Ok(())
}

async fn clear_context(
    client: &ExchangeClientBox,
    session_id: String,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match client.clear_context().await {
        Ok(reply) => {
            event_tx.send(Event::ContextCleared {
                session_id,
                message: Message::new(Author::Ai, &reply.confirmation_text),
            })?;
        }
        Err(err) => {
            tracing::error!(error = %err, "clear context failed");
            event_tx.send(Event::ClearFailed(err.to_string()))?;
        }
    }

    Ok(())
}

async fn run(
    client: &ExchangeClientBox,
    action: Action,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match action {
        Action::Initialize => initialize(client, event_tx).await,
        Action::Submit {
            session_id,
            text,
            file,
        } => submit(client, session_id, text, file, event_tx).await,
        Action::ClearContext { session_id } => clear_context(client, session_id, event_tx).await,
    }
}

pub struct ActionsService {}

impl ActionsService {
    /// Spawns one worker per action until the action channel closes. Workers
    /// are never cancelled and report back only through `event_tx`.
    pub async fn start(
        client: ExchangeClientBox,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let client_arc = Arc::new(client);

        while let Some(action) = rx.recv().await {
            tracing::debug!(action = ?action, "dispatching action");
            let worker_client = client_arc.clone();
            let worker_event_tx = event_tx.clone();
            tokio::spawn(async move {
                if let Err(err) = run(&worker_client, action, &worker_event_tx).await {
                    tracing::error!(error = ?err, "exchange worker could not report back");
                }
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::models::ClearReply;
    use crate::domain::models::ExchangeClient;
    use crate::domain::models::ExchangeError;
    use crate::domain::models::InitReply;
    use crate::domain::models::QueryReply;
    use crate::domain::models::UploadReply;

    struct MockExchangeClient {
        fail_query: bool,
        upload: Option<UploadReply>,
    }

    #[async_trait]
    impl ExchangeClient for MockExchangeClient {
        async fn initialize(&self) -> Result<InitReply, ExchangeError> {
            Ok(InitReply {
                welcome_text: Some("Welcome".to_string()),
                context_loaded: false,
            })
        }

        async fn send_file(&self, file: &FileUpload) -> Result<UploadReply, ExchangeError> {
            if let Some(reply) = &self.upload {
                return Ok(reply.clone());
            }

            Ok(UploadReply {
                result_text: format!("Read {} bytes from {}", file.bytes.len(), file.name),
                accepted: true,
            })
        }

        async fn send_question(&self, question: &str) -> Result<QueryReply, ExchangeError> {
            if self.fail_query {
                return Err(ExchangeError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }

            Ok(QueryReply {
                answer_text: format!("You asked: {question}"),
                context_loaded: true,
            })
        }

        async fn clear_context(&self) -> Result<ClearReply, ExchangeError> {
            Ok(ClearReply {
                confirmation_text: "Cleared".to_string(),
            })
        }
    }

    fn start(fail_query: bool) -> (
        mpsc::UnboundedSender<Action>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        return start_with(MockExchangeClient {
            fail_query,
            upload: None,
        });
    }

    fn start_with(client: MockExchangeClient) -> (
        mpsc::UnboundedSender<Action>,
        mpsc::UnboundedReceiver<Event>,
    ) {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        tokio::spawn(async move {
            ActionsService::start(
                Box::new(client),
                event_tx,
                &mut action_rx,
            )
            .await
            .unwrap();
        });

        (action_tx, event_rx)
    }

    #[tokio::test]
    async fn test_initialize_reports_welcome() {
        let (action_tx, mut event_rx) = start(false);

        action_tx.send(Action::Initialize).unwrap();

        match event_rx.recv().await.unwrap() {
            Event::InitSucceeded(reply) => {
                assert_eq!(reply.welcome_text, Some("Welcome".to_string()));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_uploads_then_asks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.txt");
        std::fs::write(&path, "Total: 42").unwrap();
        let (action_tx, mut event_rx) = start(false);

        action_tx
            .send(Action::Submit {
                session_id: "s1".to_string(),
                text: "total?".to_string(),
                file: Some(path),
            })
            .unwrap();

        let mut replies = vec![];
        loop {
            match event_rx.recv().await.unwrap() {
                Event::AssistantReply {
                    session_id,
                    message,
                    ..
                } => {
                    assert_eq!(session_id, "s1");
                    replies.push(message.text);
                }
                Event::SendSettled {
                    session_id,
                    outcome,
                } => {
                    assert_eq!(session_id, "s1");
                    assert_eq!(outcome, SendOutcome::Success);
                    break;
                }
                other => panic!("unexpected event {other:?}"),
            }
        }

        assert_eq!(
            replies,
            vec![
                "Read 9 bytes from invoice.txt".to_string(),
                "You asked: total?".to_string()
            ]
        );
    }

    async fn upload_reply(result_text: &str, accepted: bool) -> (Message, Option<bool>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, "%PDF").unwrap();
        let (action_tx, mut event_rx) = start_with(MockExchangeClient {
            fail_query: false,
            upload: Some(UploadReply {
                result_text: result_text.to_string(),
                accepted,
            }),
        });

        action_tx
            .send(Action::Submit {
                session_id: "s1".to_string(),
                text: "".to_string(),
                file: Some(path),
            })
            .unwrap();

        let reply = match event_rx.recv().await.unwrap() {
            Event::AssistantReply {
                message,
                context_loaded,
                ..
            } => (message, context_loaded),
            other => panic!("unexpected event {other:?}"),
        };

        match event_rx.recv().await.unwrap() {
            Event::SendSettled { outcome, .. } => assert_eq!(outcome, SendOutcome::Success),
            other => panic!("unexpected event {other:?}"),
        }

        return reply;
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_server_message() {
        let (message, context_loaded) = upload_reply("Not an invoice", false).await;

        assert_eq!(message.text, "Not an invoice");
        assert_eq!(message.sender, Author::Ai);
        assert_eq!(context_loaded, None);
    }

    #[tokio::test]
    async fn test_rejected_upload_without_message_uses_fallback() {
        let (message, context_loaded) = upload_reply("", false).await;

        assert_eq!(message.text, UPLOAD_REJECTED_FALLBACK);
        assert_eq!(context_loaded, None);
    }

    #[tokio::test]
    async fn test_accepted_upload_without_message_uses_fallback() {
        let (message, context_loaded) = upload_reply("  ", true).await;

        assert_eq!(message.text, UPLOAD_OK_FALLBACK);
        assert_eq!(context_loaded, Some(true));
    }

    #[tokio::test]
    async fn test_failed_question_settles_without_reply() {
        let (action_tx, mut event_rx) = start(true);

        action_tx
            .send(Action::Submit {
                session_id: "s1".to_string(),
                text: "total?".to_string(),
                file: None,
            })
            .unwrap();

        match event_rx.recv().await.unwrap() {
            Event::SendSettled { outcome, .. } => {
                assert!(matches!(outcome, SendOutcome::Failure(_)));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_fails_the_send() {
        let (action_tx, mut event_rx) = start(false);

        action_tx
            .send(Action::Submit {
                session_id: "s1".to_string(),
                text: "".to_string(),
                file: Some(PathBuf::from("/definitely/not/here.pdf")),
            })
            .unwrap();

        match event_rx.recv().await.unwrap() {
            Event::SendSettled { outcome, .. } => match outcome {
                SendOutcome::Failure(reason) => assert!(reason.contains("here.pdf")),
                SendOutcome::Success => panic!("expected failure"),
            },
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clear_context_targets_requesting_session() {
        let (action_tx, mut event_rx) = start(false);

        action_tx
            .send(Action::ClearContext {
                session_id: "s2".to_string(),
            })
            .unwrap();

        match event_rx.recv().await.unwrap() {
            Event::ContextCleared {
                session_id,
                message,
            } => {
                assert_eq!(session_id, "s2");
                assert_eq!(message.text, "Cleared");
                assert_eq!(message.sender, Author::Ai);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
