//! Outcome to HTTP response translation.
//!
//! The status always comes from the outcome. A success renders its payload as
//! JSON; every other kind renders its message as plain text, falling back to a
//! route-specific default when the pipeline left the message empty.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::{Outcome, Resolution};
use crate::domain::messages::{
    CREATE_ACCOUNT_FAILED, INSUFFICIENT_ACCOUNT_BALANCE, INVALID_SEARCH_CRITERIA,
    INVALID_TRANSACTION, NO_ACCOUNT_FOUND,
};

/// Default messages per non-success kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallbacks {
    pub empty: &'static str,
    pub invalid: &'static str,
    pub failure: &'static str,
}

impl Fallbacks {
    pub const LOOKUP: Self = Self {
        empty: NO_ACCOUNT_FOUND,
        invalid: INVALID_SEARCH_CRITERIA,
        failure: NO_ACCOUNT_FOUND,
    };

    pub const CREATE: Self = Self {
        empty: CREATE_ACCOUNT_FAILED,
        invalid: INVALID_SEARCH_CRITERIA,
        failure: CREATE_ACCOUNT_FAILED,
    };

    pub const TRANSFER: Self = Self {
        empty: INVALID_TRANSACTION,
        invalid: INVALID_TRANSACTION,
        failure: INVALID_TRANSACTION,
    };

    pub const WITHDRAW: Self = Self {
        empty: NO_ACCOUNT_FOUND,
        invalid: INVALID_SEARCH_CRITERIA,
        failure: INSUFFICIENT_ACCOUNT_BALANCE,
    };

    pub const DEPOSIT: Self = Self {
        empty: NO_ACCOUNT_FOUND,
        invalid: INVALID_SEARCH_CRITERIA,
        failure: INVALID_SEARCH_CRITERIA,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody<T> {
    Payload(T),
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeResponse<T> {
    pub status: StatusCode,
    pub body: ResponseBody<T>,
}

fn message_or<T>(message: Option<String>, fallback: &str) -> ResponseBody<T> {
    ResponseBody::Message(message.unwrap_or_else(|| fallback.to_string()))
}

/// Translate an outcome, ignoring any payload carried by a failure
pub fn translate<T, S>(outcome: Outcome<T, S>, fallbacks: &Fallbacks) -> OutcomeResponse<T> {
    let (resolution, status) = outcome.into_resolution();
    let body = match resolution {
        Resolution::Success(payload) => ResponseBody::Payload(payload),
        Resolution::InvalidInput { message } => message_or(message, fallbacks.invalid),
        Resolution::EmptyResult { message } => message_or(message, fallbacks.empty),
        Resolution::Failure { message, .. } => message_or(message, fallbacks.failure),
    };
    OutcomeResponse { status, body }
}

/// Like [`translate`], but a failure that carries a payload renders it
pub fn translate_preferring_payload<T, S>(
    outcome: Outcome<T, S>,
    fallbacks: &Fallbacks,
) -> OutcomeResponse<T> {
    let (resolution, status) = outcome.into_resolution();
    let body = match resolution {
        Resolution::Success(payload)
        | Resolution::Failure {
            payload: Some(payload),
            ..
        } => ResponseBody::Payload(payload),
        Resolution::InvalidInput { message } => message_or(message, fallbacks.invalid),
        Resolution::EmptyResult { message } => message_or(message, fallbacks.empty),
        Resolution::Failure {
            payload: None,
            message,
        } => message_or(message, fallbacks.failure),
    };
    OutcomeResponse { status, body }
}

impl<T: Serialize> IntoResponse for OutcomeResponse<T> {
    fn into_response(self) -> Response {
        match self.body {
            ResponseBody::Payload(payload) => (self.status, Json(payload)).into_response(),
            ResponseBody::Message(message) => (
                self.status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                message,
            )
                .into_response(),
        }
    }
}
