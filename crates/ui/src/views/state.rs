use dioxus::prelude::*;
use services::{AnalysisError, ChainError, RecordError, SessionError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    ProviderUnavailable,
    Rejected,
    InvalidAddress,
    FetchFailed,
    CaseNotFound,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::ProviderUnavailable => {
                "No wallet provider found. Open the app inside a wallet client or connect a wallet."
            }
            Self::Rejected => "The transaction was not accepted. Please try again.",
            Self::InvalidAddress => "That is not a valid address.",
            Self::FetchFailed => "Failed to fetch contract data. Check the address and try again.",
            Self::CaseNotFound => "This case file could not be found.",
        }
    }

    #[must_use]
    pub fn from_chain(err: &ChainError) -> Self {
        match err {
            ChainError::ProviderUnavailable | ChainError::NoAccount => Self::ProviderUnavailable,
            ChainError::Rejected(_) | ChainError::Reverted(_) => Self::Rejected,
            _ => Self::FetchFailed,
        }
    }

    #[must_use]
    pub fn from_session(err: &SessionError) -> Self {
        match err {
            SessionError::Record(RecordError::Chain(chain))
            | SessionError::Record(RecordError::AfterRemediation {
                complete: chain, ..
            }) => Self::from_chain(chain),
            SessionError::Storage(_) => Self::CaseNotFound,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn from_analysis(err: &AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidAddress(_) => Self::InvalidAddress,
            _ => Self::FetchFailed,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
