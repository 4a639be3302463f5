use std::path::PathBuf;

/// Work handed from the UI task to the exchange workers. Every variant that
/// produces a reply carries the session id captured when it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Initialize,
    Submit {
        session_id: String,
        text: String,
        file: Option<PathBuf>,
    },
    ClearContext {
        session_id: String,
    },
}
