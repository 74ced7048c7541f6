// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod interface;

pub use self::interface::{Attribute, Tag, TagKind, Token, TokenSink};
pub use self::interface::{EmptyTag, EndTag, StartTag};

use log::debug;
use quick_xml::events::{BytesStart, Event as RawEvent};
use quick_xml::Reader;

use crate::{ByteTendril, Error, StrTendril};

/// Copy of tokenizer options, with an impl for `Default`.
#[derive(Copy, Clone)]
pub struct XmlTokenizerOpts {
    /// Check that every end tag matches the name of the start tag it
    /// closes, reporting a parse error otherwise?  Default: true
    pub check_end_names: bool,

    /// Reject `--` sequences inside comments?  Default: false
    pub check_comments: bool,
}

impl Default for XmlTokenizerOpts {
    fn default() -> XmlTokenizerOpts {
        XmlTokenizerOpts {
            check_end_names: true,
            check_comments: false,
        }
    }
}

/// The XML tokenizer.
///
/// A push driver over the pull reader from `quick-xml`: [`run`] walks
/// a whole in-memory document and feeds every structural unit to the
/// sink, in document order, within one blocking call.
///
/// [`run`]: XmlTokenizer::run
pub struct XmlTokenizer<Sink> {
    /// Options controlling the behavior of the tokenizer.
    opts: XmlTokenizerOpts,

    /// Destination for tokens we emit.
    pub sink: Sink,
}

impl<Sink: TokenSink> XmlTokenizer<Sink> {
    /// Create a new tokenizer which feeds tokens to a particular `TokenSink`.
    pub fn new(sink: Sink, opts: XmlTokenizerOpts) -> XmlTokenizer<Sink> {
        XmlTokenizer { opts, sink }
    }

    /// Tokenize the whole document.
    ///
    /// Blocks until the document is exhausted or the reader reports an
    /// error. An error is delivered to the sink as its final token and
    /// stops tokenization; `TokenSink::end` is called exactly once
    /// either way.
    pub fn run(&mut self, doc: &str) {
        let mut reader = Reader::from_str(doc);
        let config = reader.config_mut();
        config.check_end_names = self.opts.check_end_names;
        config.check_comments = self.opts.check_comments;

        loop {
            match reader.read_event() {
                Ok(RawEvent::Start(tag)) => self.emit_tag(StartTag, &tag),
                Ok(RawEvent::Empty(tag)) => self.emit_tag(EmptyTag, &tag),
                Ok(RawEvent::End(tag)) => {
                    self.sink.process_token(Token::Tag(Tag {
                        kind: EndTag,
                        name: utf8_tendril(tag.name().as_ref()),
                        attrs: Vec::new(),
                    }));
                },
                Ok(RawEvent::Text(text)) => match text.unescape() {
                    Ok(chunk) => {
                        self.sink
                            .process_token(Token::Characters(StrTendril::from_slice(&chunk)));
                    },
                    Err(err) => {
                        self.fail(err);
                        break;
                    },
                },
                Ok(RawEvent::CData(block)) => {
                    let bytes = ByteTendril::from_slice(&block.into_inner());
                    self.sink.process_token(Token::CData(bytes));
                },
                Ok(RawEvent::Comment(text)) => {
                    self.sink.process_token(Token::Comment(utf8_tendril(&text)));
                },
                // The declaration, processing instructions and the
                // doctype have no token in the sink alphabet.
                Ok(RawEvent::Decl(_)) | Ok(RawEvent::PI(_)) | Ok(RawEvent::DocType(_)) => {},
                Ok(RawEvent::Eof) => {
                    self.sink.process_token(Token::EndOfFile);
                    break;
                },
                Err(err) => {
                    self.fail(err);
                    break;
                },
            }
        }

        self.sink.end();
    }

    fn emit_tag(&mut self, kind: TagKind, tag: &BytesStart) {
        let mut attrs = Vec::new();
        for attr in tag.attributes() {
            // Attributes are never surfaced downstream, so a bad one
            // is not worth failing the document over.
            match attr {
                Ok(attr) => match attr.unescape_value() {
                    Ok(value) => attrs.push(Attribute {
                        name: utf8_tendril(attr.key.as_ref()),
                        value: StrTendril::from_slice(&value),
                    }),
                    Err(err) => debug!("dropping malformed attribute: {err}"),
                },
                Err(err) => debug!("dropping malformed attribute: {err}"),
            }
        }
        self.sink.process_token(Token::Tag(Tag {
            kind,
            name: utf8_tendril(tag.name().as_ref()),
            attrs,
        }));
    }

    fn fail(&mut self, err: quick_xml::Error) {
        debug!("tokenizer error: {err}");
        self.sink.process_token(Token::Error(Error::Parse(err)));
    }
}

// The document comes in as `&str`, so any byte slice the reader hands
// back is valid UTF-8 and the lossy path never triggers.
fn utf8_tendril(bytes: &[u8]) -> StrTendril {
    StrTendril::from_slice(&String::from_utf8_lossy(bytes))
}
