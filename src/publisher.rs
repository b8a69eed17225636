// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # RabbitMQ Message Publisher
//!
//! Implements [`Publisher`] over a lapin channel, propagating the
//! OpenTelemetry context in the message headers.

use crate::{
    errors::MessagingError,
    messaging::{HeaderValues, PublishMessage, Publisher},
    otel::RabbitMQTracePropagator,
};
use async_trait::async_trait;
use lapin::{
    options::BasicPublishOptions,
    types::{
        AMQPValue, Boolean, FieldTable, LongInt, LongLongInt, LongString, LongUInt, ShortInt,
        ShortString, ShortUInt,
    },
    BasicProperties, Channel,
};
use opentelemetry::{global, Context};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tracing::{debug, error};
use uuid::Uuid;

/// RabbitMQ implementation of the Publisher trait.
pub struct RabbitMQPublisher {
    channel: Arc<Channel>,
}

impl RabbitMQPublisher {
    /// Creates a new RabbitMQ publisher.
    ///
    /// # Parameters
    /// * `channel` - A channel to the RabbitMQ server
    ///
    /// # Returns
    /// An Arc-wrapped RabbitMQPublisher instance for thread-safe sharing
    pub fn new(channel: Arc<Channel>) -> Arc<RabbitMQPublisher> {
        Arc::new(RabbitMQPublisher { channel })
    }
}

#[async_trait]
impl Publisher for RabbitMQPublisher {
    /// Publishes `infos.data` to the `infos.to` exchange with routing key
    /// `infos.key`.
    ///
    /// Every message gets a fresh UUID v4 message id. The trace context in
    /// `ctx` is injected before the user headers, so a user header with the
    /// same name wins.
    async fn publish(&self, ctx: &Context, infos: &PublishMessage) -> Result<(), MessagingError> {
        let mut btree = BTreeMap::<ShortString, AMQPValue>::default();

        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(ctx, &mut RabbitMQTracePropagator::new(&mut btree))
        });

        if let Some(headers) = &infos.headers {
            btree_map(headers, &mut btree);
        }

        let message_id = Uuid::new_v4().to_string();
        debug!(
            exchange = infos.to,
            routing_key = infos.key,
            message_id,
            "publishing message"
        );

        match self
            .channel
            .basic_publish(
                &infos.to,
                &infos.key,
                BasicPublishOptions {
                    immediate: false,
                    mandatory: false,
                },
                &infos.data,
                BasicProperties::default()
                    .with_content_type(ShortString::from(infos.content_type.clone()))
                    .with_message_id(ShortString::from(message_id))
                    .with_headers(FieldTable::from(btree)),
            )
            .await
        {
            Err(err) => {
                error!(error = err.to_string(), "error publishing message");
                Err(MessagingError::PublisherError)
            }
            _ => Ok(()),
        }
    }
}

/// Converts user header values to their AMQP field representation.
pub(crate) fn btree_map(
    hash_map: &HashMap<String, HeaderValues>,
    btree: &mut BTreeMap<ShortString, AMQPValue>,
) {
    for (key, value) in hash_map {
        let amqp_value = match value.clone() {
            HeaderValues::ShortString(v) => AMQPValue::ShortString(ShortString::from(v)),
            HeaderValues::LongString(v) => AMQPValue::LongString(LongString::from(v)),
            HeaderValues::Bool(v) => AMQPValue::Boolean(Boolean::from(v)),
            HeaderValues::Int(v) => AMQPValue::ShortInt(ShortInt::from(v)),
            HeaderValues::LongInt(v) => AMQPValue::LongInt(LongInt::from(v)),
            HeaderValues::LongLongInt(v) => AMQPValue::LongLongInt(LongLongInt::from(v)),
            HeaderValues::Uint(v) => AMQPValue::ShortUInt(ShortUInt::from(v)),
            HeaderValues::LongUint(v) => AMQPValue::LongUInt(LongUInt::from(v)),
        };

        btree.insert(ShortString::from(key.clone()), amqp_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_header_values() {
        let mut headers = HashMap::new();
        headers.insert("origin".to_owned(), HeaderValues::LongString("demo".to_owned()));
        headers.insert("attempt".to_owned(), HeaderValues::LongInt(1));
        headers.insert("replay".to_owned(), HeaderValues::Bool(false));

        let mut btree = BTreeMap::new();
        btree_map(&headers, &mut btree);

        assert_eq!(btree.len(), 3);
        assert_eq!(
            btree.get(&ShortString::from("origin")),
            Some(&AMQPValue::LongString(LongString::from("demo")))
        );
        assert_eq!(
            btree.get(&ShortString::from("attempt")),
            Some(&AMQPValue::LongInt(1))
        );
        assert_eq!(
            btree.get(&ShortString::from("replay")),
            Some(&AMQPValue::Boolean(false))
        );
    }
}
