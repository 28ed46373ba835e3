//! Error types shared across the crate.
//!
//! `DirectoryError` carries the cause of a failed call to the remote user
//! directory and only ever reaches the log. What the user sees is an
//! [`OperationError`]: one generic message per dashboard operation.
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::time::SystemTime;

use reqwest::Method;
use thiserror::Error;

use crate::app::RequestId;

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Failure talking to the remote user directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} {url}: request failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url}: server answered {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
    },
    #[error("{method} {url}: unexpected response body: {source}")]
    Decode {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl DirectoryError {
    /// Non-2xx answer; the body is never inspected.
    pub fn status(method: Method, url: impl Into<String>, status: u16) -> Self {
        DirectoryError::Status {
            method,
            url: url.into(),
            status,
        }
    }
}

/// User-visible failure of a dashboard operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationError {
    Load,
    Save,
    Delete,
}

impl OperationError {
    pub fn message(self) -> &'static str {
        match self {
            OperationError::Load => "Failed to fetch users. Please try again later.",
            OperationError::Save => "Failed to save user. Please try again.",
            OperationError::Delete => "Failed to delete user. Please try again.",
        }
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for OperationError {}

/// One reported failure, kept in the [`ErrorSlot`] history.
#[derive(Clone, Debug)]
pub struct ErrorEvent {
    pub kind: OperationError,
    pub request: RequestId,
    pub at: SystemTime,
}

/// Maximum number of events retained by [`ErrorSlot::history`].
pub const ERROR_HISTORY_LIMIT: usize = 32;

/// Single overwritable error slot.
///
/// The displayed error is always the most recently reported one; nothing ever
/// clears it. Every report is also appended to a bounded history so failures of
/// concurrent operations stay visible in the log and the status bar.
#[derive(Clone, Debug, Default)]
pub struct ErrorSlot {
    current: Option<OperationError>,
    history: VecDeque<ErrorEvent>,
}

impl ErrorSlot {
    pub fn report(&mut self, kind: OperationError, request: RequestId) {
        self.current = Some(kind);
        if self.history.len() == ERROR_HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(ErrorEvent {
            kind,
            request,
            at: SystemTime::now(),
        });
    }

    pub fn current(&self) -> Option<OperationError> {
        self.current
    }

    pub fn message(&self) -> Option<&'static str> {
        self.current.map(OperationError::message)
    }

    pub fn history(&self) -> impl Iterator<Item = &ErrorEvent> {
        self.history.iter()
    }

    pub fn reported(&self) -> usize {
        self.history.len()
    }
}
