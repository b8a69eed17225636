// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Exchange Management for RabbitMQ
//!
//! This module provides types for defining RabbitMQ exchanges. Exchanges are
//! the routing mechanism in RabbitMQ that determine how messages are
//! distributed to queues. It also exposes [`topic_matches`], the topic
//! exchange matching rule, so bindings can be checked locally.

use crate::errors::AmqpError;
use lapin::types::{AMQPValue, ShortString};
use std::collections::BTreeMap;

/// Word separator used in routing keys and binding patterns.
pub const TOPIC_WORD_SEPARATOR: char = '.';
/// Matches exactly one word in a binding pattern.
pub const TOPIC_SINGLE_WORD_WILDCARD: &str = "*";
/// Matches zero or more words in a binding pattern.
pub const TOPIC_MULTI_WORD_WILDCARD: &str = "#";

/// Represents the types of exchanges available in RabbitMQ.
///
/// Each exchange type has specific routing behavior:
/// - Direct: Routes messages to queues based on an exact match of routing keys
/// - Fanout: Broadcasts messages to all bound queues regardless of routing keys
/// - Topic: Routes messages based on wildcard pattern matching of routing keys
/// - Headers: Routes based on message header values instead of routing keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExchangeKind {
    #[default]
    Direct,
    Fanout,
    Topic,
    Headers,
}

impl TryInto<lapin::ExchangeKind> for ExchangeKind {
    type Error = AmqpError;

    fn try_into(self) -> Result<lapin::ExchangeKind, AmqpError> {
        match self {
            ExchangeKind::Direct => Ok(lapin::ExchangeKind::Direct),
            ExchangeKind::Fanout => Ok(lapin::ExchangeKind::Fanout),
            ExchangeKind::Headers => Ok(lapin::ExchangeKind::Headers),
            ExchangeKind::Topic => Ok(lapin::ExchangeKind::Topic),
        }
    }
}

/// Definition of a RabbitMQ exchange with its configuration parameters.
///
/// Built with chained calls, e.g.
/// `ExchangeDefinition::new("spring-boot-exchange").topic()`.
#[derive(Debug, Clone)]
pub struct ExchangeDefinition<'ex> {
    pub(crate) name: &'ex str,
    pub(crate) kind: &'ex ExchangeKind,
    pub(crate) delete: bool,
    pub(crate) durable: bool,
    pub(crate) passive: bool,
    pub(crate) internal: bool,
    pub(crate) no_wait: bool,
    pub(crate) params: BTreeMap<ShortString, AMQPValue>,
}

impl<'ex> ExchangeDefinition<'ex> {
    /// Creates a new Direct exchange definition with the given name.
    pub fn new(name: &'ex str) -> ExchangeDefinition<'ex> {
        ExchangeDefinition {
            name,
            kind: &ExchangeKind::Direct,
            delete: false,
            durable: false,
            passive: false,
            internal: false,
            no_wait: false,
            params: BTreeMap::default(),
        }
    }

    /// Name the exchange is declared with.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Routing behaviour the exchange is declared with.
    pub fn exchange_kind(&self) -> &ExchangeKind {
        self.kind
    }

    /// Sets the exchange type.
    ///
    /// # Parameters
    /// * `kind` - The exchange type
    ///
    /// # Returns
    /// Self for method chaining
    pub fn kind(mut self, kind: &'ex ExchangeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the exchange type to Direct, routing on exact key equality.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn direct(mut self) -> Self {
        self.kind = &ExchangeKind::Direct;
        self
    }

    /// Sets the exchange type to Fanout, ignoring routing keys.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn fanout(mut self) -> Self {
        self.kind = &ExchangeKind::Fanout;
        self
    }

    /// Sets the exchange type to Topic, routing by wildcard patterns.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn topic(mut self) -> Self {
        self.kind = &ExchangeKind::Topic;
        self
    }

    /// Sets the exchange type to Headers, routing on header values.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn headers(mut self) -> Self {
        self.kind = &ExchangeKind::Headers;
        self
    }

    /// Replaces the exchange arguments.
    pub fn params(mut self, params: BTreeMap<ShortString, AMQPValue>) -> Self {
        self.params = params;
        self
    }

    /// Adds a single argument to the exchange.
    ///
    /// # Parameters
    /// * `key` - The argument name
    /// * `value` - The argument value
    pub fn param(mut self, key: ShortString, value: AMQPValue) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Sets the exchange to auto-delete when no longer used.
    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// Makes the exchange durable, persisting across broker restarts.
    pub fn durable(mut self) -> Self {
        self.durable = true;
        self
    }

    /// Makes the exchange passive, checking for existence without creating it.
    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    /// Makes the exchange internal, preventing direct publishing.
    pub fn internal(mut self) -> Self {
        self.internal = true;
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

/// Reports whether `routing_key` would be routed by a topic exchange binding
/// declared with `pattern`.
///
/// Both are split into `.`-separated words. `*` matches exactly one word and
/// `#` matches zero or more words, so `foo.bar.#` matches `foo.bar`,
/// `foo.bar.baz` and `foo.bar.baz.qux` but not `baz.qux`.
pub fn topic_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(TOPIC_WORD_SEPARATOR).collect();
    let key: Vec<&str> = routing_key.split(TOPIC_WORD_SEPARATOR).collect();

    match_words(&pattern, &key)
}

fn match_words(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&TOPIC_MULTI_WORD_WILDCARD, rest)) => {
            // collapse consecutive `#`, they match the same thing as one
            if rest.first() == Some(&TOPIC_MULTI_WORD_WILDCARD) {
                return match_words(rest, key);
            }
            (0..=key.len()).any(|skip| match_words(rest, &key[skip..]))
        }
        Some((&word, rest)) => match key.split_first() {
            Some((&key_word, key_rest)) => {
                (word == TOPIC_SINGLE_WORD_WILDCARD || word == key_word)
                    && match_words(rest, key_rest)
            }
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_topic_kind() {
        let def = ExchangeDefinition::new("spring-boot-exchange").topic();

        assert_eq!(def.name(), "spring-boot-exchange");
        assert_eq!(def.exchange_kind(), &ExchangeKind::Topic);
        assert!(!def.durable);
        assert!(!def.delete);
    }

    #[test]
    fn converts_to_lapin_kind() {
        let kind: lapin::ExchangeKind = ExchangeKind::Topic.try_into().unwrap();

        assert!(matches!(kind, lapin::ExchangeKind::Topic));
    }

    #[test]
    fn hash_matches_trailing_words() {
        assert!(topic_matches("foo.bar.#", "foo.bar.baz"));
        assert!(topic_matches("foo.bar.#", "foo.bar.baz.qux"));
        assert!(topic_matches("foo.bar.#", "foo.bar"));
    }

    #[test]
    fn hash_rejects_other_prefixes() {
        assert!(!topic_matches("foo.bar.#", "baz.qux"));
        assert!(!topic_matches("foo.bar.#", "foo.baz.bar"));
        assert!(!topic_matches("foo.bar.#", "foo"));
    }

    #[test]
    fn star_matches_exactly_one_word() {
        assert!(topic_matches("foo.*.baz", "foo.bar.baz"));
        assert!(!topic_matches("foo.*.baz", "foo.baz"));
        assert!(!topic_matches("foo.*", "foo.bar.baz"));
    }

    #[test]
    fn hash_in_the_middle() {
        assert!(topic_matches("foo.#.baz", "foo.baz"));
        assert!(topic_matches("foo.#.baz", "foo.a.b.c.baz"));
        assert!(!topic_matches("foo.#.baz", "foo.a.b.c"));
        assert!(topic_matches("#.#", "anything.at.all"));
    }

    #[test]
    fn lone_hash_matches_everything() {
        assert!(topic_matches("#", "foo.bar.baz"));
        assert!(topic_matches("#", ""));
    }

    #[test]
    fn literal_pattern_needs_exact_key() {
        assert!(topic_matches("foo.bar", "foo.bar"));
        assert!(!topic_matches("foo.bar", "foo.bar.baz"));
    }
}
