//! Contextual validation pass.
//!
//! Decoding is lenient: a message can be well-shaped JSON and still violate
//! the protocol's contextual rules (reserved method prefix, boolean id,
//! float-tagged error code). This module runs the fixed predicate list for a
//! message type and reports every violation at once instead of failing on
//! the first.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::{Request, Response};

/// A single failed predicate: the member path and what was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found on a message, in predicate order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    fn push(&mut self, path: &str, message: &str) {
        self.0.push(Violation {
            path: path.to_string(),
            message: message.to_string(),
        });
    }

    fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separate = false;

        for violation in &self.0 {
            if separate {
                f.write_str("; ")?;
            }

            write!(f, "{}", violation)?;
            separate = true;
        }

        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Violations {}

pub fn validate_request(request: &Request) -> Result<(), Violations> {
    let mut violations = Violations::default();

    if !request.is_version_contextually_valid() {
        violations.push("jsonrpc", "must be exactly \"2.0\"");
    }

    if !request.is_method_contextually_valid() {
        if request.is_method_reserved_for_internal_use() {
            violations.push("method", "names prefixed with \"rpc.\" are reserved");
        } else {
            violations.push("method", "must be a non-empty string");
        }
    }

    if !request.params.is_contextually_valid() {
        violations.push("params", "must be an array, an object, or null");
    }

    if !request.id.is_contextually_valid() {
        violations.push("id", "must be a string, an integer, or null");
    }

    violations.into_result()
}

pub fn validate_response(response: &Response) -> Result<(), Violations> {
    let mut violations = Violations::default();

    if !response.is_version_contextually_valid() {
        violations.push("jsonrpc", "must be exactly \"2.0\"");
    }

    if !response.id.is_contextually_valid() {
        violations.push("id", "must be a string, an integer, or null");
    }

    match (response.has_result(), response.has_error()) {
        (true, true) => violations.push("result", "result and error are mutually exclusive"),
        (false, false) => violations.push("result", "either a result or an error is required"),
        _ => (),
    }

    if response.has_error() {
        match response.error_as_default() {
            Ok(Some(error)) => {
                if !error.is_code_contextually_valid() {
                    violations.push("error.code", "must be an exact integer");
                }
            }
            Ok(None) => (),
            Err(e) => violations.push("error", &e.to_string()),
        }
    }

    violations.into_result()
}
