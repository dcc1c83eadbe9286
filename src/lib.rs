//! Data-binding model for JSON-RPC 2.0 messages.
//!
//! A raw [`Value`] decodes into a typed [`Request`] or [`Response`], typed
//! params/result/error access happens through the container types, and the
//! message encodes back into a [`Value`] with unrecognized members preserved.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error_object;
mod id;
mod params;
mod request;
mod response;

pub mod validate;

#[cfg(feature = "codec")]
pub mod codec;

use alloc::string::String;

use thiserror::Error;

pub use error_object::{codes, ErrorObject};
pub use id::MessageId;
pub use params::Params;
pub use request::Request;
pub use response::{Outcome, Response};

pub use serde_json::{json, Map, Value};

/// Protocol version marker carried by every message.
pub const VERSION: &str = "2.0";

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("malformed JSON text: {0}")]
    Parse(String),
    #[error("expected a JSON object for the {0}")]
    ExpectedObject(&'static str),
    #[error("params must be an array, an object, or null")]
    ExpectedStructuredParams,
    #[error("method must be a JSON string")]
    ExpectedTextMethod,
    #[error("error message must be a JSON string")]
    ExpectedTextErrorMessage,
    #[error("error code is not an exact integer")]
    ExpectedIntegerCode,
    #[error("id must be a JSON string, number, or null")]
    UnsupportedIdShape,
    #[error("value does not fit in {0}")]
    NumberOutOfRange(&'static str),
    #[error("cannot bind {target}: {cause}")]
    Bind {
        target: &'static str,
        cause: String,
    },
}
