//! The chained, traceable request-time error.
//!
//! # Responsibilities
//! - Carry an HTTP-status kind, message, machine code, technical message,
//!   offending field names and a correlation UUID per node
//! - Link every wrap to the node it wraps (newest → oldest)
//! - Answer chain-wide queries: classification, kind lookup, traces, origin
//!
//! # Design Decisions
//! - The head of the chain owns the rest (`Box` links, no sharing)
//! - A bare wrap node has no kind; classification skips it but its trace
//!   is still reported
//! - Foreign errors are attached as a `source`, never converted

use std::error::Error as StdError;
use std::fmt;

use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use super::correlation::new_correlation_id;
use super::kind::ErrorKind;
use super::trace::Trace;

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// One node of a request-time error chain; the value held by callers is
/// always the newest node.
#[derive(Debug)]
pub struct ApiError {
    kind: Option<ErrorKind>,
    code: Option<String>,
    message: String,
    technical_message: Option<String>,
    fields: Vec<String>,
    uuid: Option<Uuid>,
    trace: Trace,
    source: Option<BoxedSource>,
    previous: Option<Box<ApiError>>,
}

impl ApiError {
    /// Creates a typed error traced at the caller's location.
    ///
    /// The trace records file, line and column only; use
    /// [`api_error!`](crate::api_error) to also record module and function.
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new_at(kind, message, Trace::caller())
    }

    /// Creates a typed error with an explicit trace.
    pub fn new_at(kind: ErrorKind, message: impl Into<String>, trace: Trace) -> Self {
        Self {
            kind: Some(kind),
            code: None,
            message: message.into(),
            technical_message: None,
            fields: Vec::new(),
            uuid: None,
            trace,
            source: None,
            previous: None,
        }
    }

    /// Pushes a bare trace node on top of this chain.
    #[track_caller]
    pub fn wrap(self) -> Self {
        self.wrap_at(Trace::caller())
    }

    /// Pushes a bare node with an explicit trace.
    pub fn wrap_at(self, trace: Trace) -> Self {
        Self {
            kind: None,
            code: None,
            message: String::new(),
            technical_message: None,
            fields: Vec::new(),
            uuid: None,
            trace,
            source: None,
            previous: Some(Box::new(self)),
        }
    }

    /// Pushes a typed node on top of this chain.
    #[track_caller]
    pub fn wrap_as(self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.wrap_as_at(kind, message, Trace::caller())
    }

    pub fn wrap_as_at(self, kind: ErrorKind, message: impl Into<String>, trace: Trace) -> Self {
        let mut node = Self::new_at(kind, message, trace);
        node.previous = Some(Box::new(self));
        node
    }

    /// Sets the machine-readable code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the developer-oriented message. It also becomes the trace
    /// observation unless one was already recorded.
    pub fn with_technical(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if self.trace.observation.is_none() {
            self.trace.observation = Some(message.clone());
        }
        self.technical_message = Some(message);
        self
    }

    /// Adds names of request fields that failed validation.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Assigns a fresh correlation UUID.
    pub fn with_uuid(mut self) -> Self {
        self.uuid = Some(new_correlation_id());
        self
    }

    /// Attaches the foreign error that caused this node.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxedSource>,
    {
        self.source = Some(source.into());
        self
    }

    /// Overrides the trace observation.
    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.trace.observation = Some(observation.into());
        self
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// This node's own message; empty for bare wrap nodes.
    pub fn own_message(&self) -> &str {
        &self.message
    }

    /// The newest non-empty message along the chain.
    pub fn message(&self) -> &str {
        self.iter()
            .map(|node| node.message.as_str())
            .find(|message| !message.is_empty())
            .unwrap_or_default()
    }

    pub fn technical_message(&self) -> Option<&str> {
        self.technical_message.as_deref()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn previous(&self) -> Option<&ApiError> {
        self.previous.as_deref()
    }

    /// Iterates the chain from this node to the oldest.
    pub fn iter(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// First node, newest to oldest, carrying `kind`.
    pub fn find(&self, kind: ErrorKind) -> Option<&ApiError> {
        self.iter().find(|node| node.kind == Some(kind))
    }

    /// Every trace in the chain, newest first.
    pub fn traces(&self) -> Vec<&Trace> {
        self.iter().map(|node| &node.trace).collect()
    }

    /// The first foreign error attached along the chain.
    pub fn origin_of(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.iter().find_map(|node| node.source.as_deref())
    }

    /// The node that decides the response status, if any node has a kind.
    pub fn classifying_node(&self) -> Option<&ApiError> {
        self.iter().find(|node| node.kind.is_some())
    }

    /// Kind used for the response; chains without a kind are internal errors.
    pub fn status_kind(&self) -> ErrorKind {
        self.classifying_node()
            .and_then(|node| node.kind)
            .unwrap_or(ErrorKind::InternalServerError)
    }

    pub fn status(&self) -> StatusCode {
        self.status_kind().status()
    }

    /// The client-facing view of this chain.
    pub fn body(&self) -> ErrorBody<'_> {
        let node = self.classifying_node().unwrap_or(self);
        ErrorBody {
            status: self.status().as_u16(),
            code: node.code(),
            message: self.message(),
            fields: node.fields(),
            uuid: self.iter().find_map(|n| n.uuid),
        }
    }
}

macro_rules! kind_operations {
    ($($kind:ident => $ctor:ident, $is:ident, $find:ident;)+) => {
        impl ApiError {
            $(
                #[doc = concat!("Creates a `", stringify!($kind), "` error traced at the caller's file and line.")]
                #[track_caller]
                pub fn $ctor(message: impl Into<String>) -> Self {
                    Self::new(ErrorKind::$kind, message)
                }

                #[doc = concat!("True if any node of the chain is `", stringify!($kind), "`.")]
                pub fn $is(&self) -> bool {
                    self.find(ErrorKind::$kind).is_some()
                }

                #[doc = concat!("The newest `", stringify!($kind), "` node of the chain.")]
                pub fn $find(&self) -> Option<&ApiError> {
                    self.find(ErrorKind::$kind)
                }
            )+
        }
    };
}

kind_operations! {
    BadRequest => bad_request, is_bad_request, find_bad_request;
    Unauthorized => unauthorized, is_unauthorized, find_unauthorized;
    Forbidden => forbidden, is_forbidden, find_forbidden;
    NotFound => not_found, is_not_found, find_not_found;
    MethodNotAllowed => method_not_allowed, is_method_not_allowed, find_method_not_allowed;
    PayloadTooLarge => payload_too_large, is_payload_too_large, find_payload_too_large;
    UriTooLong => uri_too_long, is_uri_too_long, find_uri_too_long;
    UnsupportedMediaType => unsupported_media_type, is_unsupported_media_type, find_unsupported_media_type;
    InternalServerError => internal_server_error, is_internal_server_error, find_internal_server_error;
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(previous) = &self.previous {
            return Some(&**previous as &(dyn StdError + 'static));
        }
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}

/// Iterator over an error chain, newest to oldest.
pub struct Chain<'a> {
    next: Option<&'a ApiError>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a ApiError;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous();
        Some(current)
    }
}

fn no_fields(fields: &&[String]) -> bool {
    fields.is_empty()
}

/// JSON body written for an error response. Traces stay server-side.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    pub message: &'a str,
    #[serde(skip_serializing_if = "no_fields")]
    pub fields: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<Uuid>,
}
