// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! The topology and message the demo works with.

use crate::{
    exchange::ExchangeDefinition,
    queue::{QueueBinding, QueueDefinition},
};
use std::time::Duration;

pub const TOPIC_EXCHANGE_NAME: &str = "spring-boot-exchange";
pub const QUEUE_NAME: &str = "spring-boot";
/// Routes every key starting with `foo.bar.` (and `foo.bar` itself).
pub const BINDING_PATTERN: &str = "foo.bar.#";
pub const ROUTING_KEY: &str = "foo.bar.baz";
pub const MESSAGE: &str = "Hello from RabbitMQ!";
/// Upper bound the runner waits for the message to come back.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Durable topic exchange, matching what other clients declaring
/// `spring-boot-exchange` with default settings expect. A redeclare with a
/// different `durable` flag is refused by the broker.
pub fn exchange() -> ExchangeDefinition<'static> {
    ExchangeDefinition::new(TOPIC_EXCHANGE_NAME).topic().durable()
}

/// Non-durable queue.
pub fn queue() -> QueueDefinition {
    QueueDefinition::new(QUEUE_NAME)
}

pub fn binding() -> QueueBinding<'static> {
    QueueBinding::new(QUEUE_NAME)
        .exchange(TOPIC_EXCHANGE_NAME)
        .routing_key(BINDING_PATTERN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeKind;

    #[test]
    fn declarations() {
        assert_eq!(exchange().name(), "spring-boot-exchange");
        assert_eq!(exchange().exchange_kind(), &ExchangeKind::Topic);
        assert!(exchange().durable);
        assert!(!exchange().delete);
        assert_eq!(queue().name(), "spring-boot");
        assert!(!queue().is_durable());
        assert_eq!(binding().exchange_name(), TOPIC_EXCHANGE_NAME);
        assert_eq!(binding().queue_name(), QUEUE_NAME);
    }

    #[test]
    fn demo_routing_key_reaches_the_queue() {
        assert!(binding().matches(TOPIC_EXCHANGE_NAME, ROUTING_KEY));
        assert!(!binding().matches(TOPIC_EXCHANGE_NAME, "baz.qux"));
    }
}
