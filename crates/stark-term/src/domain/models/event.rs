use tui_textarea::Input;

use super::InitReply;
use super::Message;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Success,
    Failure(String),
}

#[derive(Debug)]
pub enum Event {
    InitSucceeded(InitReply),
    InitFailed(String),
    AssistantReply {
        session_id: String,
        message: Message,
        /// `None` leaves the invoice indicator as it is.
        context_loaded: Option<bool>,
    },
    SendSettled {
        session_id: String,
        outcome: SendOutcome,
    },
    ContextCleared {
        session_id: String,
        message: Message,
    },
    ClearFailed(String),
    KeyboardCharInput(Input),
    KeyboardCTRLC,
    KeyboardCTRLN,
    KeyboardCTRLO,
    KeyboardEnter,
    KeyboardPaste(String),
    UITick,
    UIScrollDown,
    UIScrollUp,
    UIScrollPageDown,
    UIScrollPageUp,
}
