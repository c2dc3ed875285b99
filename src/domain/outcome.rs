//! Request outcomes with a recorded decision trail.
//!
//! A pipeline starts an [`OutcomeBuilder`], records one step per stage
//! transition and finishes with exactly one terminal call, which consumes the
//! builder and freezes the trail into the returned [`Outcome`].
//!
//! ```
//! use axum::http::StatusCode;
//! use banking_outcome_api::domain::{OutcomeBuilder, OutcomeKind};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Step { Start, Done }
//!
//! let mut builder = OutcomeBuilder::<u32, Step>::begin();
//! builder.record(Step::Start).record(Step::Done);
//! let outcome = builder.success(7, StatusCode::OK);
//!
//! assert_eq!(outcome.kind(), OutcomeKind::Success);
//! assert_eq!(outcome.payload(), Some(&7));
//! assert_eq!(outcome.decision_trail(), &[Step::Start, Step::Done]);
//! ```

use std::marker::PhantomData;

use axum::http::StatusCode;
use serde::Serialize;

/// Closed set of outcome shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    InvalidInput,
    EmptyResult,
    Failure,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::InvalidInput => "INVALID_INPUT",
            Self::EmptyResult => "EMPTY_RESULT",
            Self::Failure => "FAILURE",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific content of an outcome.
///
/// `Success` always carries its payload, so a successful outcome without one
/// cannot be constructed. `Failure` may carry a typed negative payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Success(T),
    InvalidInput {
        message: Option<String>,
    },
    EmptyResult {
        message: Option<String>,
    },
    Failure {
        payload: Option<T>,
        message: Option<String>,
    },
}

impl<T> Resolution<T> {
    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::InvalidInput { .. } => OutcomeKind::InvalidInput,
            Self::EmptyResult { .. } => OutcomeKind::EmptyResult,
            Self::Failure { .. } => OutcomeKind::Failure,
        }
    }
}

/// Finalized, immutable result of one pipeline evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T, S> {
    resolution: Resolution<T>,
    status: StatusCode,
    decision_trail: Box<[S]>,
}

impl<T, S> Outcome<T, S> {
    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        self.resolution.kind()
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        match &self.resolution {
            Resolution::Success(payload) => Some(payload),
            Resolution::Failure { payload, .. } => payload.as_ref(),
            Resolution::InvalidInput { .. } | Resolution::EmptyResult { .. } => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::Success(_) => None,
            Resolution::InvalidInput { message }
            | Resolution::EmptyResult { message }
            | Resolution::Failure { message, .. } => message.as_deref(),
        }
    }

    #[must_use]
    pub fn decision_trail(&self) -> &[S] {
        &self.decision_trail
    }

    /// Split into resolution and status, dropping the trail
    #[must_use]
    pub fn into_resolution(self) -> (Resolution<T>, StatusCode) {
        (self.resolution, self.status)
    }
}

/// Single-use accumulator of decision steps.
///
/// Terminal methods take `self`, so a builder produces exactly one outcome.
#[derive(Debug)]
pub struct OutcomeBuilder<T, S> {
    trail: Vec<S>,
    _payload: PhantomData<fn() -> T>,
}

impl<T, S> Default for OutcomeBuilder<T, S> {
    fn default() -> Self {
        Self::begin()
    }
}

impl<T, S> OutcomeBuilder<T, S> {
    #[must_use]
    pub fn begin() -> Self {
        Self {
            trail: Vec::new(),
            _payload: PhantomData,
        }
    }

    /// Append a step. No ordering or uniqueness checks.
    pub fn record(&mut self, step: S) -> &mut Self {
        self.trail.push(step);
        self
    }

    /// Steps recorded so far
    #[must_use]
    pub fn trail(&self) -> &[S] {
        &self.trail
    }

    #[must_use]
    pub fn success(self, payload: T, status: StatusCode) -> Outcome<T, S> {
        self.finish(Resolution::Success(payload), status)
    }

    #[must_use]
    pub fn invalid(self, status: StatusCode, message: Option<&str>) -> Outcome<T, S> {
        self.finish(
            Resolution::InvalidInput {
                message: message.map(str::to_owned),
            },
            status,
        )
    }

    #[must_use]
    pub fn empty(self, status: StatusCode, message: Option<&str>) -> Outcome<T, S> {
        self.finish(
            Resolution::EmptyResult {
                message: message.map(str::to_owned),
            },
            status,
        )
    }

    #[must_use]
    pub fn failure(self, status: StatusCode, message: Option<&str>) -> Outcome<T, S> {
        self.finish(
            Resolution::Failure {
                payload: None,
                message: message.map(str::to_owned),
            },
            status,
        )
    }

    /// Failure that still reports a typed negative payload
    #[must_use]
    pub fn failure_with(
        self,
        payload: T,
        status: StatusCode,
        message: Option<&str>,
    ) -> Outcome<T, S> {
        self.finish(
            Resolution::Failure {
                payload: Some(payload),
                message: message.map(str::to_owned),
            },
            status,
        )
    }

    fn finish(self, resolution: Resolution<T>, status: StatusCode) -> Outcome<T, S> {
        Outcome {
            resolution,
            status,
            decision_trail: self.trail.into_boxed_slice(),
        }
    }
}
