// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # RabbitMQ Message Consumer
//!
//! Handles a single delivery: opens a consumer span under the propagated
//! trace context, runs the handler, then acks or nacks.

use crate::{
    errors::AmqpError,
    messaging::{ConsumerHandler, ConsumerMessage},
    otel,
};
use lapin::{
    message::Delivery,
    options::{BasicAckOptions, BasicNackOptions},
};
use opentelemetry::{
    global::BoxedTracer,
    trace::{Span, Status},
};
use std::borrow::Cow;
use tracing::{debug, error, warn};

/// Hands `delivery` to `handler` and settles it with the broker.
///
/// The message is acked when the handler succeeds. On handler failure it
/// is nacked without requeue so a poison message can't loop forever.
pub(crate) async fn consume(
    tracer: &BoxedTracer,
    queue: &str,
    delivery: &Delivery,
    handler: &dyn ConsumerHandler,
) -> Result<(), AmqpError> {
    let (ctx, mut span) = otel::new_span(&delivery.properties, tracer, queue);

    debug!(
        queue,
        exchange = delivery.exchange.as_str(),
        routing_key = delivery.routing_key.as_str(),
        "message received"
    );

    let msg = ConsumerMessage::new(queue, &delivery.data);

    if let Err(err) = handler.exec(&ctx, &msg).await {
        warn!(error = err.to_string(), queue, "handler failure, discarding message");
        span.record_error(&err);

        return match delivery
            .nack(BasicNackOptions {
                multiple: false,
                requeue: false,
            })
            .await
        {
            Ok(_) => {
                span.set_status(Status::Error {
                    description: Cow::from("handler failure"),
                });
                Ok(())
            }
            Err(e) => {
                error!(error = e.to_string(), "error whiling nack msg");
                span.record_error(&e);
                span.set_status(Status::Error {
                    description: Cow::from("error to nack msg"),
                });
                Err(AmqpError::NackMessageError)
            }
        };
    }

    debug!("message successfully processed");
    match delivery.ack(BasicAckOptions { multiple: false }).await {
        Err(e) => {
            error!(error = e.to_string(), "error whiling ack msg");
            span.record_error(&e);
            span.set_status(Status::Error {
                description: Cow::from("error to ack msg"),
            });
            Err(AmqpError::AckMessageError)
        }
        _ => {
            span.set_status(Status::Ok);
            Ok(())
        }
    }
}
