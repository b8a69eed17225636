// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Management for RabbitMQ
//!
//! Queue definitions and queue-to-exchange bindings.

use crate::exchange::topic_matches;

/// Definition of a RabbitMQ queue with its configuration parameters.
///
/// Queues are non-durable, non-exclusive and not auto-deleted unless the
/// builder says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueDefinition {
    pub(crate) name: String,
    pub(crate) durable: bool,
    pub(crate) delete: bool,
    pub(crate) exclusive: bool,
    pub(crate) passive: bool,
    pub(crate) no_wait: bool,
}

impl QueueDefinition {
    /// Creates a new queue definition with the given name.
    pub fn new(name: &str) -> QueueDefinition {
        QueueDefinition {
            name: name.to_owned(),
            durable: false,
            delete: false,
            exclusive: false,
            passive: false,
            no_wait: false,
        }
    }

    /// Name the queue is declared with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the queue survives a broker restart.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Makes the queue durable, persisting across broker restarts.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn durable(mut self) -> Self {
        self.durable = true;
        self
    }

    /// Sets the queue to auto-delete when no longer used.
    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// Makes the queue exclusive to the connection.
    ///
    /// Exclusive queues are deleted when the connection closes.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// Only checks the queue exists, never creates it.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// Sets no_wait flag, so the declare doesn't wait for the broker reply.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn no_wait(mut self) -> Self {
        self.no_wait = true;
        self
    }
}

/// Configuration for binding a queue to an exchange.
///
/// For topic exchanges the routing key is a pattern, see
/// [`topic_matches`](crate::exchange::topic_matches).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueBinding<'qeb> {
    pub(crate) queue_name: &'qeb str,
    pub(crate) exchange_name: &'qeb str,
    pub(crate) routing_key: &'qeb str,
}

impl<'qeb> QueueBinding<'qeb> {
    /// Creates a new queue binding for the given queue.
    ///
    /// The exchange name and routing key start empty and are set with
    /// [`exchange`](Self::exchange) and [`routing_key`](Self::routing_key).
    pub fn new(queue: &'qeb str) -> QueueBinding<'qeb> {
        QueueBinding {
            queue_name: queue,
            exchange_name: "",
            routing_key: "",
        }
    }

    /// Sets the exchange to bind the queue to.
    ///
    /// # Parameters
    /// * `exchange` - The name of the exchange
    ///
    /// # Returns
    /// Self for method chaining
    pub fn exchange(mut self, exchange: &'qeb str) -> Self {
        self.exchange_name = exchange;
        self
    }

    /// Sets the routing key for the binding.
    ///
    /// # Parameters
    /// * `key` - The routing key, a pattern for topic exchanges
    ///
    /// # Returns
    /// Self for method chaining
    pub fn routing_key(mut self, key: &'qeb str) -> Self {
        self.routing_key = key;
        self
    }

    /// Queue receiving the routed messages.
    pub fn queue_name(&self) -> &str {
        self.queue_name
    }

    /// Exchange the queue is bound to.
    pub fn exchange_name(&self) -> &str {
        self.exchange_name
    }

    /// Routing key or pattern of the binding.
    pub fn pattern(&self) -> &str {
        self.routing_key
    }

    /// Reports whether a message published to `exchange` with `routing_key`
    /// would reach this binding's queue, assuming a topic exchange.
    pub fn matches(&self, exchange: &str, routing_key: &str) -> bool {
        self.exchange_name == exchange && topic_matches(self.routing_key, routing_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_not_durable_by_default() {
        let def = QueueDefinition::new("spring-boot");

        assert_eq!(def.name(), "spring-boot");
        assert!(!def.is_durable());
        assert!(!def.exclusive);
        assert!(!def.delete);
        assert!(def.clone().durable().is_durable());
    }

    #[test]
    fn binding_matches_on_exchange_and_pattern() {
        let binding = QueueBinding::new("spring-boot")
            .exchange("spring-boot-exchange")
            .routing_key("foo.bar.#");

        assert_eq!(binding.queue_name(), "spring-boot");
        assert_eq!(binding.pattern(), "foo.bar.#");
        assert!(binding.matches("spring-boot-exchange", "foo.bar.baz"));
        assert!(!binding.matches("spring-boot-exchange", "baz.qux"));
        assert!(!binding.matches("other-exchange", "foo.bar.baz"));
    }
}
