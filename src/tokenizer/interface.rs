// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::{ByteTendril, Error, StrTendril};

pub use self::TagKind::{EmptyTag, EndTag, StartTag};

/// Tag kind denotes which kind of tag did we encounter.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum TagKind {
    /// Beginning of a tag (e.g. `<a>`).
    StartTag,
    /// End of a tag (e.g. `</a>`).
    EndTag,
    /// Empty tag (e.g. `<a/>`).
    EmptyTag,
}

/// A name/value pair from a start or empty tag.
///
/// Attributes travel through the tokenizer interface so that a sink
/// can observe them; the event stream discards them.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Attribute {
    /// Attribute name as written, prefix included.
    pub name: StrTendril,
    /// Attribute value, with entities decoded.
    pub value: StrTendril,
}

/// XML tag token.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Tag {
    /// Token kind denotes which type of tag was encountered.
    /// E.g. if the tokenizer read `</a>` the tag kind would be `EndTag`.
    pub kind: TagKind,
    /// Name of the tag.
    pub name: StrTendril,
    /// List of attributes attached to this tag.
    /// Only valid in start and empty tags.
    pub attrs: Vec<Attribute>,
}

/// Describes tokens encountered during tokenization of input.
#[derive(Debug)]
pub enum Token {
    /// Tag token. This token applies to all
    /// possible kinds of tags (start, end, empty).
    Tag(Tag),
    /// A run of character data. One logical text run may arrive split
    /// over several of these.
    Characters(StrTendril),
    /// Comment token.
    Comment(StrTendril),
    /// Raw contents of a CDATA section, not decoded as text.
    CData(ByteTendril),
    /// End of the document was reached.
    EndOfFile,
    /// The tokenizer failed. No token follows this one.
    Error(Error),
}

/// Types which can receive tokens from the tokenizer.
pub trait TokenSink {
    /// Process a token.
    fn process_token(&mut self, token: Token);

    /// Signal to the sink that tokenization has ended.
    fn end(&mut self) {}
}
