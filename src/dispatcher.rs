// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # RabbitMQ Message Dispatcher
//!
//! Implements [`Dispatcher`] by starting one lapin consumer per registered
//! queue. Each consumer is driven on its own tokio task and hands every
//! delivery to [`consume`].

use crate::{
    consumer::consume,
    errors::MessagingError,
    messaging::{ConsumerHandler, Dispatcher},
};
use async_trait::async_trait;
use futures_util::{future::join_all, StreamExt};
use lapin::{
    options::{BasicCancelOptions, BasicConsumeOptions},
    types::FieldTable,
    Channel,
};
use opentelemetry::global;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Name of the tracer used for consumer spans.
pub const CONSUMER_TRACER_NAME: &str = "amqp consumer";

/// A queue and the handler for what is consumed from it.
#[derive(Clone)]
pub struct RabbitMQDispatcherDefinition {
    pub(crate) queue: String,
    pub(crate) handler: Arc<dyn ConsumerHandler>,
}

/// RabbitMQ implementation of the Dispatcher trait.
pub struct RabbitMQDispatcher {
    channel: Arc<Channel>,
    pub(crate) dispatchers_def: Vec<RabbitMQDispatcherDefinition>,
}

impl RabbitMQDispatcher {
    /// Creates a dispatcher consuming on `channel`, with no handler yet.
    ///
    /// # Parameters
    /// * `channel` - A channel to the RabbitMQ server
    pub fn new(channel: Arc<Channel>) -> Self {
        RabbitMQDispatcher {
            channel,
            dispatchers_def: vec![],
        }
    }
}

#[async_trait]
impl Dispatcher for RabbitMQDispatcher {
    /// Registers `handler` for `queue`. Registering the same queue again
    /// replaces the previous handler.
    fn register(mut self, queue: &str, handler: Arc<dyn ConsumerHandler>) -> Self {
        self.dispatchers_def.retain(|def| def.queue != queue);
        self.dispatchers_def.push(RabbitMQDispatcherDefinition {
            queue: queue.to_owned(),
            handler,
        });

        self
    }

    /// Starts the consumers and waits until every one of them has stopped,
    /// which happens when the channel closes or the consumers are cancelled.
    async fn consume_blocking(&self) -> Result<(), MessagingError> {
        self.spawn().await?.wait().await
    }
}

impl RabbitMQDispatcher {
    /// Starts the consumers and returns without waiting for messages.
    ///
    /// The consumers are registered with the broker before this returns, so
    /// anything published afterwards reaches a live consumer.
    ///
    /// # Returns
    /// The running consumers, to be stopped with [`RunningConsumers::shutdown`]
    /// before the connection is closed.
    pub async fn spawn(&self) -> Result<RunningConsumers, MessagingError> {
        if self.dispatchers_def.is_empty() {
            error!("no handler registered");
            return Err(MessagingError::NoHandlerRegistered);
        }

        let mut spawns = vec![];
        let mut tags = vec![];

        for def in &self.dispatchers_def {
            let mut consumer = match self
                .channel
                .basic_consume(
                    &def.queue,
                    "",
                    BasicConsumeOptions {
                        no_local: false,
                        no_ack: false,
                        exclusive: false,
                        nowait: false,
                    },
                    FieldTable::default(),
                )
                .await
            {
                Err(err) => {
                    error!(
                        error = err.to_string(),
                        queue = def.queue,
                        "failure to create the consumer"
                    );
                    Err(MessagingError::CreatingConsumerError)
                }
                Ok(c) => Ok(c),
            }?;
            debug!(queue = def.queue, tag = consumer.tag().as_str(), "consumer created");
            tags.push(consumer.tag().to_string());

            let def = def.clone();

            spawns.push(tokio::spawn(async move {
                let tracer = global::tracer(CONSUMER_TRACER_NAME);

                // each delivery is settled before the next one is polled, so
                // the stream only ends once nothing is left unacked
                while let Some(result) = consumer.next().await {
                    match result {
                        Ok(delivery) => {
                            if let Err(err) =
                                consume(&tracer, &def.queue, &delivery, def.handler.as_ref()).await
                            {
                                error!(error = err.to_string(), "error consume msg");
                            }
                        }
                        Err(err) => error!(error = err.to_string(), "errors consume msg"),
                    }
                }

                debug!(queue = def.queue, "consumer stream ended");
            }));
        }

        Ok(RunningConsumers {
            channel: self.channel.clone(),
            tags,
            handle: tokio::spawn(async move {
                for res in join_all(spawns).await {
                    if let Err(err) = res {
                        error!(error = err.to_string(), "consumer task failure");
                    }
                }
            }),
        })
    }
}

/// Consumers started by [`RabbitMQDispatcher::spawn`].
pub struct RunningConsumers {
    channel: Arc<Channel>,
    tags: Vec<String>,
    handle: JoinHandle<()>,
}

impl RunningConsumers {
    /// Broker assigned consumer tags, one per registered queue.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Waits until every consumer stream has ended.
    pub async fn wait(self) -> Result<(), MessagingError> {
        match self.handle.await {
            Ok(_) => Ok(()),
            Err(err) => {
                error!(error = err.to_string(), "tokio process error");
                Err(MessagingError::InternalError)
            }
        }
    }

    /// Cancels every consumer and waits for the in-flight deliveries to be
    /// settled.
    ///
    /// Call this before closing the connection: a delivery still unacked
    /// when the connection goes away is requeued by the broker.
    pub async fn shutdown(self) -> Result<(), MessagingError> {
        for tag in &self.tags {
            debug!(tag, "cancelling consumer");
            if let Err(err) = self
                .channel
                .basic_cancel(tag, BasicCancelOptions { nowait: false })
                .await
            {
                error!(error = err.to_string(), tag, "failure to cancel the consumer");
                self.handle.abort();
                return Err(MessagingError::ConsumerError(tag.clone()));
            }
        }

        self.wait().await
    }
}
