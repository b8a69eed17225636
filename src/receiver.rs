// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Receiver
//!
//! The listener registered on the demo queue. It logs every payload it gets
//! and releases a one-count latch so the runner knows the message arrived.

use crate::{
    errors::MessagingError,
    latch::CountDownLatch,
    messaging::{ConsumerHandler, ConsumerMessage},
};
use async_trait::async_trait;
use opentelemetry::Context;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug)]
pub struct Receiver {
    latch: CountDownLatch,
    received: Mutex<Vec<String>>,
}

impl Default for Receiver {
    fn default() -> Self {
        Receiver::new()
    }
}

impl Receiver {
    pub fn new() -> Receiver {
        Receiver {
            latch: CountDownLatch::new(1),
            received: Mutex::new(vec![]),
        }
    }

    /// Logs `message` as is and counts the latch down.
    pub fn receive_message(&self, message: &str) {
        info!("Received <{}>", message);

        if let Ok(mut received) = self.received.lock() {
            received.push(message.to_owned());
        }

        self.latch.count_down();
    }

    pub fn latch(&self) -> &CountDownLatch {
        &self.latch
    }

    /// Messages received so far, oldest first.
    pub fn received(&self) -> Vec<String> {
        match self.received.lock() {
            Ok(received) => received.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl ConsumerHandler for Receiver {
    async fn exec(&self, _ctx: &Context, msg: &ConsumerMessage) -> Result<(), MessagingError> {
        self.receive_message(&msg.as_text());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn records_message_unchanged_and_counts_down() {
        let receiver = Receiver::new();
        assert_eq!(receiver.latch().count(), 1);

        receiver.receive_message("  Hello from RabbitMQ!\n");

        assert_eq!(receiver.received(), vec!["  Hello from RabbitMQ!\n".to_owned()]);
        assert_eq!(receiver.latch().count(), 0);
    }

    #[test]
    fn accepts_empty_message() {
        let receiver = Receiver::new();

        receiver.receive_message("");

        assert_eq!(receiver.received(), vec![String::new()]);
        assert_eq!(receiver.latch().count(), 0);
    }

    #[tokio::test]
    async fn handler_decodes_payload_and_releases_waiters() {
        let receiver = Receiver::new();
        let msg = ConsumerMessage::new("spring-boot", "Hello from RabbitMQ!".as_bytes());

        receiver.exec(&Context::new(), &msg).await.unwrap();

        assert!(receiver.latch().wait_timeout(Duration::from_millis(10)).await);
        assert_eq!(receiver.received(), vec!["Hello from RabbitMQ!".to_owned()]);
    }
}
