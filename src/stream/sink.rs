// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::mem::replace;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;

use super::Event;
use crate::tokenizer::{EmptyTag, EndTag, StartTag, Token, TokenSink};
use crate::{Error, StrTendril};

/// Translates tokenizer callbacks into consumer events.
///
/// Owns the character accumulation buffer: consecutive character
/// chunks coalesce here and are flushed as at most one `Text` event
/// right before the next structural event, or dropped entirely when
/// the run is pure whitespace.
pub(crate) struct StreamSink {
    /// Producer half of the hand-off channel. Unbounded: the sink runs
    /// inside the tokenizer's callback loop and must never wait for
    /// the consumer.
    events: UnboundedSender<Result<Event, Error>>,

    /// Character data seen since the last flush point.
    text: StrTendril,

    /// Set once the terminal signal went out. Anything arriving after
    /// that is ignored.
    finished: bool,
}

impl StreamSink {
    pub(crate) fn new(events: UnboundedSender<Result<Event, Error>>) -> StreamSink {
        StreamSink {
            events,
            text: StrTendril::new(),
            finished: false,
        }
    }

    fn emit(&mut self, event: Event) {
        if self.events.send(Ok(event)).is_err() {
            // The consumer dropped the stream. The tokenizer has no
            // abort contract, so keep translating; everything from
            // here on is discarded.
            debug!("event stream receiver is gone; discarding event");
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = replace(&mut self.text, StrTendril::new());
        if any_not_whitespace(&text) {
            self.emit(Event::Text(String::from(&*text)));
        }
    }
}

impl TokenSink for StreamSink {
    fn process_token(&mut self, token: Token) {
        if self.finished {
            // A conforming tokenizer stops after its terminal token;
            // drop whatever arrives regardless.
            return;
        }
        match token {
            Token::Tag(tag) => match tag.kind {
                StartTag | EmptyTag => {
                    self.flush_text();
                    self.emit(Event::ElementStart(String::from(&*tag.name)));
                },
                // An element end only terminates the pending text run;
                // it is not itself surfaced.
                EndTag => self.flush_text(),
            },
            Token::Characters(chunk) => self.text.push_tendril(&chunk),
            Token::Comment(comment) => {
                self.flush_text();
                self.emit(Event::Comment(String::from(&*comment)));
            },
            Token::CData(block) => {
                self.flush_text();
                self.emit(Event::CData(block.to_vec()));
            },
            Token::EndOfFile => {
                self.flush_text();
                self.finished = true;
            },
            Token::Error(err) => {
                self.finished = true;
                let _ = self.events.send(Err(err));
            },
        }
    }

    fn end(&mut self) {
        // Drivers that never deliver `EndOfFile` still terminate the
        // stream cleanly.
        if !self.finished {
            self.flush_text();
            self.finished = true;
        }
    }
}

fn any_not_whitespace(x: &StrTendril) -> bool {
    !x.bytes()
        .all(|b| matches!(b, b'\t' | b'\r' | b'\n' | b'\x0C' | b' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{Attribute, Tag, TagKind};
    use crate::ByteTendril;
    use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

    fn sink() -> (StreamSink, UnboundedReceiver<Result<Event, Error>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (StreamSink::new(tx), rx)
    }

    fn tag(kind: TagKind, name: &str) -> Token {
        Token::Tag(Tag {
            kind,
            name: StrTendril::from_slice(name),
            attrs: Vec::new(),
        })
    }

    fn chars(s: &str) -> Token {
        Token::Characters(StrTendril::from_slice(s))
    }

    fn next_event(rx: &mut UnboundedReceiver<Result<Event, Error>>) -> Event {
        rx.try_recv()
            .expect("no event buffered")
            .expect("unexpected error event")
    }

    #[test]
    fn character_chunks_coalesce_into_one_text_event() {
        let (mut sink, mut rx) = sink();
        sink.process_token(tag(StartTag, "a"));
        sink.process_token(chars("He"));
        sink.process_token(chars("ll"));
        sink.process_token(chars("o"));
        sink.process_token(tag(EndTag, "a"));
        sink.process_token(Token::EndOfFile);

        assert_eq!(next_event(&mut rx), Event::ElementStart("a".into()));
        assert_eq!(next_event(&mut rx), Event::Text("Hello".into()));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn whitespace_only_run_is_suppressed() {
        let (mut sink, mut rx) = sink();
        sink.process_token(tag(StartTag, "a"));
        sink.process_token(chars("\n  "));
        sink.process_token(chars("\t"));
        sink.process_token(tag(EndTag, "a"));
        sink.process_token(Token::EndOfFile);

        assert_eq!(next_event(&mut rx), Event::ElementStart("a".into()));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn text_flushes_before_the_next_structural_event() {
        let (mut sink, mut rx) = sink();
        sink.process_token(tag(StartTag, "a"));
        sink.process_token(chars("one"));
        sink.process_token(tag(StartTag, "b"));
        sink.process_token(chars("two"));
        sink.process_token(Token::Comment(StrTendril::from_slice("note")));
        sink.process_token(chars("three"));
        sink.process_token(Token::CData(ByteTendril::from_slice(b"blob")));
        sink.process_token(Token::EndOfFile);

        assert_eq!(next_event(&mut rx), Event::ElementStart("a".into()));
        assert_eq!(next_event(&mut rx), Event::Text("one".into()));
        assert_eq!(next_event(&mut rx), Event::ElementStart("b".into()));
        assert_eq!(next_event(&mut rx), Event::Text("two".into()));
        assert_eq!(next_event(&mut rx), Event::Comment("note".into()));
        assert_eq!(next_event(&mut rx), Event::Text("three".into()));
        assert_eq!(next_event(&mut rx), Event::CData(b"blob".to_vec()));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn trailing_text_flushes_at_end_of_file() {
        let (mut sink, mut rx) = sink();
        sink.process_token(chars("loose"));
        sink.process_token(Token::EndOfFile);

        assert_eq!(next_event(&mut rx), Event::Text("loose".into()));
    }

    #[test]
    fn empty_tag_surfaces_one_element_start() {
        let (mut sink, mut rx) = sink();
        sink.process_token(tag(EmptyTag, "a"));
        sink.process_token(Token::EndOfFile);

        assert_eq!(next_event(&mut rx), Event::ElementStart("a".into()));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn attributes_are_discarded() {
        let (mut sink, mut rx) = sink();
        sink.process_token(Token::Tag(Tag {
            kind: StartTag,
            name: StrTendril::from_slice("a"),
            attrs: vec![Attribute {
                name: StrTendril::from_slice("id"),
                value: StrTendril::from_slice("1"),
            }],
        }));
        sink.process_token(Token::EndOfFile);

        assert_eq!(next_event(&mut rx), Event::ElementStart("a".into()));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn tokens_after_the_terminal_error_are_ignored() {
        let (mut sink, mut rx) = sink();
        sink.process_token(tag(StartTag, "a"));
        sink.process_token(Token::Error(Error::Validation("not valid here".into())));
        sink.process_token(tag(StartTag, "b"));
        sink.process_token(chars("late"));
        sink.process_token(Token::EndOfFile);
        sink.end();

        assert_eq!(next_event(&mut rx), Event::ElementStart("a".into()));
        assert!(matches!(rx.try_recv(), Ok(Err(Error::Validation(_)))));
        drop(sink);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }

    #[test]
    fn end_without_end_of_file_still_flushes() {
        let (mut sink, mut rx) = sink();
        sink.process_token(tag(StartTag, "a"));
        sink.process_token(chars("text"));
        sink.end();

        assert_eq!(next_event(&mut rx), Event::ElementStart("a".into()));
        assert_eq!(next_event(&mut rx), Event::Text("text".into()));
    }

    #[test]
    fn emitting_into_a_dropped_receiver_is_not_an_error() {
        let (mut sink, rx) = sink();
        drop(rx);
        sink.process_token(tag(StartTag, "a"));
        sink.process_token(chars("text"));
        sink.process_token(Token::EndOfFile);
        sink.end();
    }
}
