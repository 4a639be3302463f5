use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn api(url: &str) -> StarkApi {
    return StarkApi::new(url, Duration::from_secs(5)).unwrap();
}

#[tokio::test]
async fn it_initializes_with_welcome_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_header(BYPASS_HEADER, "true")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Welcome to STARK. Upload an invoice.", "invoice_loaded": true}"#)
        .create_async()
        .await;

    let reply = api(&server.url()).initialize().await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        reply,
        InitReply {
            welcome_text: Some("Welcome to STARK. Upload an invoice.".to_string()),
            context_loaded: true,
        }
    );
}

#[tokio::test]
async fn it_treats_blank_welcome_as_absent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"message": "  "}"#)
        .create_async()
        .await;

    let reply = api(&format!("{}/", server.url())).initialize().await.unwrap();

    assert_eq!(reply.welcome_text, None);
    assert!(!reply.context_loaded);
}

#[tokio::test]
async fn it_uploads_files_as_multipart() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/upload")
        .match_header(BYPASS_HEADER, "true")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="invoice.txt""#.to_string()),
            Matcher::Regex("Total: 42 EUR".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"message": "Invoice processed", "success": true}"#)
        .create_async()
        .await;

    let upload = FileUpload {
        name: "invoice.txt".to_string(),
        mime_type: "text/plain".to_string(),
        bytes: b"Total: 42 EUR".to_vec(),
    };
    let reply = api(&server.url()).send_file(&upload).await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply.result_text, "Invoice processed");
    assert!(reply.accepted);
}

#[tokio::test]
async fn it_reports_rejected_uploads_without_failing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/upload")
        .with_status(200)
        .with_body(r#"{"message": "Not an invoice", "success": false}"#)
        .create_async()
        .await;

    let upload = FileUpload {
        name: "cat.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    };
    let reply = api(&server.url()).send_file(&upload).await.unwrap();

    assert_eq!(
        reply,
        UploadReply {
            result_text: "Not an invoice".to_string(),
            accepted: false,
        }
    );
}

#[tokio::test]
async fn it_fails_uploads_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/upload")
        .with_status(413)
        .with_body("too large")
        .create_async()
        .await;

    let upload = FileUpload {
        name: "big.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: vec![0; 16],
    };
    let err = api(&server.url()).send_file(&upload).await.unwrap_err();

    match err {
        ExchangeError::Status { status, body } => {
            assert_eq!(status, 413);
            assert_eq!(body, "too large");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn it_posts_questions_as_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/query")
        .match_header(BYPASS_HEADER, "true")
        .match_body(Matcher::Json(json!({ "question": "What is the total?" })))
        .with_status(200)
        .with_body(r#"{"data": {"answer": "42 EUR"}, "invoice_loaded": true}"#)
        .create_async()
        .await;

    let reply = api(&server.url())
        .send_question("What is the total?")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        reply,
        QueryReply {
            answer_text: "42 EUR".to_string(),
            context_loaded: true,
        }
    );
}

#[tokio::test]
async fn it_rejects_answers_without_nested_field() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/query")
        .with_status(200)
        .with_body(r#"{"answer": "flat", "invoice_loaded": false}"#)
        .create_async()
        .await;

    let err = api(&server.url()).send_question("hi").await.unwrap_err();

    assert!(matches!(err, ExchangeError::Decode(_)));
}

#[tokio::test]
async fn it_rejects_non_json_bodies() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_body("<html>interstitial</html>")
        .create_async()
        .await;

    let err = api(&server.url()).initialize().await.unwrap_err();

    assert!(matches!(err, ExchangeError::Decode(_)));
}

#[tokio::test]
async fn it_clears_context() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/invoice")
        .match_header(BYPASS_HEADER, "true")
        .with_status(200)
        .with_body(r#"{"message": "Invoice removed"}"#)
        .create_async()
        .await;

    let reply = api(&server.url()).clear_context().await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply.confirmation_text, "Invoice removed");
}

#[tokio::test]
async fn it_falls_back_when_clear_has_no_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/invoice")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let reply = api(&server.url()).clear_context().await.unwrap();

    assert_eq!(reply.confirmation_text, CLEARED_FALLBACK);
}

#[tokio::test]
async fn it_reports_unreachable_servers_as_transport_errors() {
    let err = api("http://127.0.0.1:1").initialize().await.unwrap_err();

    assert!(matches!(err, ExchangeError::Transport(_)));
}
