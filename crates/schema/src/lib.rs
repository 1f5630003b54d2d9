use std::fmt::{Display, Formatter};

use backtrace::Backtrace;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod conf;
pub mod droplet;
pub mod errors;
pub mod helpers;
pub mod servers;
pub mod util;

pub use helpers::easy_json::{json, json_from, json_or, EasyJson, EasyJsonDeser};

/// Broad category of a failure, carried on every `ErrorInfo`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum ErrorCode {
    UnknownError,
    MissingField,
    ApiRequestFailure,
    ApiResponseFailure,
    RegistryCardinality,
    MissingArguments,
    InvalidRegion,
    CommandFailure,
    ConfigLoadFailure,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub detail_name: String,
    pub detail: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    pub lib_message: String,
    pub details: Vec<ErrorDetails>,
    pub stacktrace: String,
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message.trim())?;
        if !self.lib_message.is_empty() {
            write!(f, " ({})", self.lib_message)?;
        }
        for d in &self.details {
            write!(f, " [{}={}]", d.detail_name, d.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorInfo {}

pub type DsResult<T> = Result<T, ErrorInfo>;

pub trait SafeOption<T> {
    fn ok_msg(self, err: impl Into<String>) -> Result<T, ErrorInfo>;
}

impl<T> SafeOption<T> for Option<T> {
    fn ok_msg(self, err: impl Into<String>) -> DsResult<T> {
        match self {
            Some(v) => Ok(v),
            None => Err(error_message(ErrorCode::MissingField, err.into())),
        }
    }
}

pub trait ErrorInfoContext<T, E> {
    /// Wrap the error value with additional context.
    fn error_info<C: Into<String>>(self, context: C) -> Result<T, ErrorInfo>
        where
            C: Display + Send + Sync + 'static;
    fn error_msg<C: Into<String>>(self, code: ErrorCode, context: C) -> Result<T, ErrorInfo>
        where
            C: Display + Send + Sync + 'static;
}

impl<T, E> ErrorInfoContext<T, E> for Result<T, E>
    where
        E: std::error::Error + Send + Sync + 'static,
{
    fn error_info<C: Into<String>>(self, context: C) -> Result<T, ErrorInfo>
        where
            C: Display + Send + Sync + 'static {
        self.map_err(|e| error_msg(ErrorCode::UnknownError, context.into(), e.to_string()))
    }

    fn error_msg<C: Into<String>>(self, code: ErrorCode, context: C) -> Result<T, ErrorInfo>
        where
            C: Display + Send + Sync + 'static {
        self.map_err(|e| error_msg(code, context.into(), e.to_string()))
    }
}

pub fn error_info<S: Into<String>>(message: S) -> ErrorInfo {
    error_message(ErrorCode::UnknownError, message.into())
}

pub fn error_msg<S: Into<String>, P: Into<String>>(code: ErrorCode, message: S, lib_message: P) -> ErrorInfo {
    let stacktrace = format!("{:?}", Backtrace::new());
    // Only the innermost frames are useful, the rest is runtime prelude.
    let stack = stacktrace.split('\n').take(50).join("\n");

    ErrorInfo {
        code,
        message: message.into(),
        lib_message: lib_message.into(),
        details: vec![],
        stacktrace: stack,
    }
}

pub fn error_message<S: Into<String>>(error_code: ErrorCode, message: S) -> ErrorInfo {
    error_msg(error_code, message, "".to_string())
}
