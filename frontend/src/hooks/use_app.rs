use milk_ledger_client::{ClientConfig, ClientError, QueryClient};
use yew::prelude::*;

/// Kind of a toast notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Success notice for the returned message, error notice for the failure's message
    pub fn from_outcome(outcome: &Result<&'static str, ClientError>) -> Self {
        match outcome {
            Ok(message) => Self::success(*message),
            Err(err) => Self::error(err.to_string()),
        }
    }
}

/// What every page receives from the app shell
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub client: QueryClient,
    pub config: ClientConfig,
    /// False until the gateway has answered its first ping
    pub session_ready: bool,
    pub notify: Callback<Notice>,
}
