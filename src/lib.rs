// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This crate provides a pull-based view of a push-based XML
//! tokenizer. The tokenizer drives all of its callbacks synchronously
//! inside one blocking call; this library runs that call on a worker
//! thread and hands every callback over a channel, so a consumer can
//! await events one at a time, at its own pace.
//!
//! What this library provides:
//!
//!   * A typed [`Event`] sequence (element starts, coalesced text,
//!     comments, raw CDATA blocks) in exact document order
//!   * Coalescing of split character runs into a single `Text` event
//!     and suppression of whitespace-only runs
//!   * A [`TokenSink`] interface, so the bridge can be driven by any
//!     push tokenizer
//!
//! What isn't in scope for this library:
//!
//!   * Attribute and namespace exposure - elements surface their name
//!     only
//!   * Building a DOM - the sequence itself encodes document order
//!   * Well-formedness or validity checks beyond what the tokenizer
//!     reports

#![deny(missing_docs)]

pub use tendril::{ByteTendril, StrTendril};

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Event stream - pulls translated events at the consumer's pace.
pub mod stream;
/// XML tokenizer binding - drives a `TokenSink` over a whole document.
pub mod tokenizer;

pub use crate::stream::{Event, EventStream};
pub use crate::tokenizer::{Token, TokenSink, XmlTokenizer, XmlTokenizerOpts};

/// Terminal failure reported by the tokenizer.
///
/// Either kind ends the event stream. Nothing in this library retries
/// a failed parse, and no event follows the error.
#[derive(Debug)]
pub enum Error {
    /// Malformed markup detected while tokenizing.
    Parse(quick_xml::Error),
    /// The document failed a validation check enabled on the tokenizer.
    Validation(Cow<'static, str>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "XML parse error: {err}"),
            Error::Validation(msg) => write!(f, "XML validation error: {msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Validation(_) => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Error {
        Error::Parse(err)
    }
}
