//! Per-pattern CORS aggregates.
//!
//! Every endpoint registered under one canonical pattern contributes its
//! method and its declared headers to a single aggregate. Header names are
//! compared trimmed and case-insensitively; the first spelling is kept.

use std::collections::BTreeMap;

use axum::http::Method;

use super::policy::CorsPolicy;
use super::{
    ALLOW_CREDENTIALS, ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN, EXPOSE_HEADERS, MAX_AGE,
};

/// CORS header name → value, as attached to a request or written on a preflight.
pub type CorsHeaders = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsAggregate {
    methods: Vec<Method>,
    required_headers: Vec<String>,
    exposed_headers: Vec<String>,
}

impl CorsAggregate {
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn required_headers(&self) -> &[String] {
        &self.required_headers
    }

    pub fn exposed_headers(&self) -> &[String] {
        &self.exposed_headers
    }

    pub fn add_method(&mut self, method: Method) {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
    }

    pub fn require_headers<I, S>(&mut self, headers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        merge_headers(&mut self.required_headers, headers);
    }

    pub fn expose_headers<I, S>(&mut self, headers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        merge_headers(&mut self.exposed_headers, headers);
    }

    /// `Allow-Methods` value.
    pub fn methods_header(&self) -> String {
        self.methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The six CORS values for this pattern under `policy`.
    pub fn headers(&self, policy: &CorsPolicy) -> CorsHeaders {
        BTreeMap::from([
            (ALLOW_ORIGIN, policy.origin_header()),
            (ALLOW_CREDENTIALS, policy.allow_credentials.to_string()),
            (MAX_AGE, policy.max_age_secs.to_string()),
            (ALLOW_METHODS, self.methods_header()),
            (ALLOW_HEADERS, self.required_headers.join(", ")),
            (EXPOSE_HEADERS, self.exposed_headers.join(", ")),
        ])
    }
}

fn merge_headers<I, S>(target: &mut Vec<String>, headers: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for header in headers {
        let header = header.as_ref().trim();
        if header.is_empty() {
            continue;
        }
        if !target.iter().any(|existing| existing.eq_ignore_ascii_case(header)) {
            target.push(header.to_string());
        }
    }
}
