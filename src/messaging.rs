// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Messaging Abstractions
//!
//! Broker-agnostic traits the demo is wired through. The RabbitMQ
//! implementations live in [`crate::publisher`] and [`crate::dispatcher`];
//! the runner and receiver only see these traits.

use crate::errors::MessagingError;
use async_trait::async_trait;
use opentelemetry::Context;
use std::{borrow::Cow, collections::HashMap, sync::Arc};

/// Content type used for UTF-8 text payloads.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Value of a user supplied message header.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValues {
    ShortString(String),
    LongString(String),
    Bool(bool),
    Int(i16),
    LongInt(i32),
    LongLongInt(i64),
    Uint(u16),
    LongUint(u32),
}

/// A message ready to be sent to an exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishMessage {
    /// Exchange name.
    pub to: String,
    /// Routing key.
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
    pub headers: Option<HashMap<String, HeaderValues>>,
}

impl PublishMessage {
    /// Builds a UTF-8 text message for `exchange` with the given routing key.
    pub fn text(exchange: &str, routing_key: &str, payload: &str) -> PublishMessage {
        PublishMessage {
            to: exchange.to_owned(),
            key: routing_key.to_owned(),
            data: payload.as_bytes().to_vec(),
            content_type: TEXT_CONTENT_TYPE.to_owned(),
            headers: None,
        }
    }

    pub fn header(mut self, key: &str, value: HeaderValues) -> Self {
        self.headers
            .get_or_insert_with(HashMap::default)
            .insert(key.to_owned(), value);
        self
    }
}

/// Publishes messages to a broker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, ctx: &Context, infos: &PublishMessage) -> Result<(), MessagingError>;
}

/// A message delivered from a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerMessage {
    /// Queue the message was consumed from.
    pub from: String,
    pub data: Vec<u8>,
}

impl ConsumerMessage {
    pub fn new(from: &str, data: &[u8]) -> ConsumerMessage {
        ConsumerMessage {
            from: from.to_owned(),
            data: data.to_vec(),
        }
    }

    /// The payload as text. Invalid UTF-8 sequences are replaced.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// Handles messages consumed from a queue.
#[async_trait]
pub trait ConsumerHandler: Send + Sync {
    async fn exec(&self, ctx: &Context, msg: &ConsumerMessage) -> Result<(), MessagingError>;
}

/// Routes messages from queues to their handlers.
#[async_trait]
pub trait Dispatcher {
    /// Registers `handler` for the messages consumed from `queue`.
    fn register(self, queue: &str, handler: Arc<dyn ConsumerHandler>) -> Self;

    /// Consumes until the underlying channel closes.
    async fn consume_blocking(&self) -> Result<(), MessagingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_carries_payload_and_route() {
        let msg = PublishMessage::text("spring-boot-exchange", "foo.bar.baz", "Hello from RabbitMQ!");

        assert_eq!(msg.to, "spring-boot-exchange");
        assert_eq!(msg.key, "foo.bar.baz");
        assert_eq!(msg.data, b"Hello from RabbitMQ!".to_vec());
        assert_eq!(msg.content_type, TEXT_CONTENT_TYPE);
        assert!(msg.headers.is_none());
    }

    #[test]
    fn headers_accumulate() {
        let msg = PublishMessage::text("ex", "key", "")
            .header("a", HeaderValues::Bool(true))
            .header("b", HeaderValues::LongInt(7));

        let headers = msg.headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("b"), Some(&HeaderValues::LongInt(7)));
    }

    #[test]
    fn consumer_message_decodes_lossy() {
        let msg = ConsumerMessage::new("spring-boot", &[0x68, 0x69, 0xff]);

        assert_eq!(msg.as_text(), "hi\u{fffd}");
    }
}
