// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # One-shot Runner
//!
//! Publishes the demo message once and waits, bounded, for the receiver to
//! get it.

use crate::{
    demo,
    errors::MessagingError,
    messaging::{PublishMessage, Publisher},
    receiver::Receiver,
};
use opentelemetry::Context;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

/// Sends one message and waits for the [`Receiver`] to see it.
pub struct Runner {
    publisher: Arc<dyn Publisher>,
    receiver: Arc<Receiver>,
    exchange: String,
    routing_key: String,
    payload: String,
    timeout: Duration,
}

impl Runner {
    /// Creates a runner that sends `Hello from RabbitMQ!` to
    /// `spring-boot-exchange` with routing key `foo.bar.baz` and waits up to
    /// ten seconds for it.
    pub fn new(publisher: Arc<dyn Publisher>, receiver: Arc<Receiver>) -> Runner {
        Runner {
            publisher,
            receiver,
            exchange: demo::TOPIC_EXCHANGE_NAME.to_owned(),
            routing_key: demo::ROUTING_KEY.to_owned(),
            payload: demo::MESSAGE.to_owned(),
            timeout: demo::RECEIVE_TIMEOUT,
        }
    }

    /// Publishes to `exchange` instead of `spring-boot-exchange`.
    pub fn exchange(mut self, exchange: &str) -> Self {
        self.exchange = exchange.to_owned();
        self
    }

    /// Publishes with `key` instead of `foo.bar.baz`.
    pub fn routing_key(mut self, key: &str) -> Self {
        self.routing_key = key.to_owned();
        self
    }

    pub fn payload(mut self, payload: &str) -> Self {
        self.payload = payload.to_owned();
        self
    }

    /// Bounds the wait on the receiver's latch.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Publishes the message, then waits on the receiver's latch.
    ///
    /// Returns once the latch is released or the timeout elapses, whichever
    /// comes first. An expired wait is not an error. Only a publish failure
    /// is.
    pub async fn run(&self) -> Result<(), MessagingError> {
        info!("Sending message...");

        let msg = PublishMessage::text(&self.exchange, &self.routing_key, &self.payload);
        self.publisher.publish(&Context::current(), &msg).await?;

        if !self.receiver.latch().wait_timeout(self.timeout).await {
            warn!(
                timeout = ?self.timeout,
                "no message received before the timeout"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MockPublisher;

    /// A publisher that routes through the demo binding the way the broker
    /// would and delivers matches straight to the receiver.
    fn routing_publisher(receiver: Arc<Receiver>) -> MockPublisher {
        let binding = demo::binding();
        let mut publisher = MockPublisher::new();
        publisher.expect_publish().times(1).returning(move |_, msg| {
            if binding.matches(&msg.to, &msg.key) {
                receiver.receive_message(&String::from_utf8_lossy(&msg.data));
            }
            Ok(())
        });
        publisher
    }

    #[tokio::test]
    async fn publishes_the_demo_message() {
        let receiver = Arc::new(Receiver::new());
        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish()
            .withf(|_, msg| {
                msg.to == "spring-boot-exchange"
                    && msg.key == "foo.bar.baz"
                    && msg.data == b"Hello from RabbitMQ!".to_vec()
            })
            .times(1)
            .returning({
                let receiver = receiver.clone();
                move |_, _| {
                    receiver.receive_message("Hello from RabbitMQ!");
                    Ok(())
                }
            });

        let runner = Runner::new(Arc::new(publisher), receiver.clone());
        runner.run().await.unwrap();

        assert_eq!(receiver.received(), vec!["Hello from RabbitMQ!".to_owned()]);
    }

    #[tokio::test]
    async fn matching_key_is_delivered_once() {
        let receiver = Arc::new(Receiver::new());
        let publisher = routing_publisher(receiver.clone());

        let runner = Runner::new(Arc::new(publisher), receiver.clone());
        runner.run().await.unwrap();

        assert_eq!(receiver.received().len(), 1);
        assert_eq!(receiver.latch().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn non_matching_key_is_not_delivered_and_wait_is_bounded() {
        let receiver = Arc::new(Receiver::new());
        let publisher = routing_publisher(receiver.clone());
        let started = tokio::time::Instant::now();

        let runner = Runner::new(Arc::new(publisher), receiver.clone()).routing_key("baz.qux");
        runner.run().await.unwrap();

        assert!(receiver.received().is_empty());
        assert!(started.elapsed() >= Duration::from_secs(10));
        assert!(started.elapsed() < Duration::from_secs(11));
    }

    #[tokio::test]
    async fn publish_failure_propagates() {
        let receiver = Arc::new(Receiver::new());
        let mut publisher = MockPublisher::new();
        publisher
            .expect_publish()
            .times(1)
            .returning(|_, _| Err(MessagingError::PublisherError));

        let runner = Runner::new(Arc::new(publisher), receiver.clone());

        assert_eq!(runner.run().await, Err(MessagingError::PublisherError));
        assert_eq!(receiver.latch().count(), 1);
    }
}
