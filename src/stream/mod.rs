// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod sink;

use std::pin::Pin;
use std::task::{Context, Poll};
use std::thread;

use futures::Stream;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use self::sink::StreamSink;
use crate::tokenizer::{XmlTokenizer, XmlTokenizerOpts};
use crate::Error;

/// One structural unit of the document, surfaced to the consumer.
///
/// Events are immutable values with no identity beyond equality; the
/// sequence they arrive in encodes document order, and no tree is ever
/// materialized.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Event {
    /// Opening of an element. Only the name is surfaced; attributes
    /// and namespaces are not part of the observable output.
    ElementStart(String),
    /// A coalesced run of character data. Never empty, never
    /// whitespace-only, and never split across sibling structural
    /// events.
    Text(String),
    /// Comment contents.
    Comment(String),
    /// Raw contents of a CDATA section, not decoded as text.
    CData(Vec<u8>),
}

/// An asynchronous, pull-based sequence of [`Event`]s.
///
/// The tokenizer runs on a dedicated worker thread, since its one
/// [`run`] call blocks until the document is exhausted. Events cross
/// over to the consumer through an unbounded channel, so the tokenizer
/// never waits on a slow consumer.
///
/// The sequence yields every event in document order, then `None` on
/// normal completion, or `Some(Err(_))` exactly once if the tokenizer
/// failed. After either terminal outcome every later pull returns
/// `None`; the sequence does not resume or repeat.
///
/// [`run`]: crate::tokenizer::XmlTokenizer::run
pub struct EventStream {
    events: UnboundedReceiver<Result<Event, Error>>,
    terminated: bool,
}

impl EventStream {
    /// Start tokenizing `doc` on a worker thread and return the stream
    /// of its events.
    pub fn parse<D: Into<String>>(doc: D) -> EventStream {
        EventStream::parse_with_opts(doc, XmlTokenizerOpts::default())
    }

    /// Like [`parse`], with explicit tokenizer options.
    ///
    /// [`parse`]: EventStream::parse
    pub fn parse_with_opts<D: Into<String>>(doc: D, opts: XmlTokenizerOpts) -> EventStream {
        let doc = doc.into();
        let (tx, rx) = mpsc::unbounded_channel();
        // The tokenizer blocks its thread for the whole parse, so it
        // gets a plain thread rather than a task on the consumer's
        // executor. The thread owns the tokenizer and its sink; if the
        // consumer goes away early the remaining sends fail and the
        // thread still runs the document to completion.
        thread::spawn(move || {
            let mut tokenizer = XmlTokenizer::new(StreamSink::new(tx), opts);
            tokenizer.run(&doc);
        });
        EventStream {
            events: rx,
            terminated: false,
        }
    }

    /// Pull the next event, suspending while none is buffered yet.
    ///
    /// Returns `None` once the document is exhausted. A tokenizer
    /// failure is returned exactly once as `Some(Err(_))`; every call
    /// after that returns `None`.
    pub async fn next(&mut self) -> Option<Result<Event, Error>> {
        std::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }
}

impl Stream for EventStream {
    type Item = Result<Event, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.terminated {
            return Poll::Ready(None);
        }
        match self.events.poll_recv(cx) {
            Poll::Ready(Some(Ok(event))) => Poll::Ready(Some(Ok(event))),
            Poll::Ready(Some(Err(err))) => {
                // Errors are terminal; latch so that later pulls keep
                // reporting end-of-sequence.
                self.terminated = true;
                Poll::Ready(Some(Err(err)))
            },
            Poll::Ready(None) => {
                self.terminated = true;
                Poll::Ready(None)
            },
            Poll::Pending => Poll::Pending,
        }
    }
}
