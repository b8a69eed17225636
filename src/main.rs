// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Declares the demo topology, starts the receiver on the queue, publishes
//! one message and waits for it to come back.

use anyhow::Result;
use rabbitmq_topic_demo::{
    channel::{close_amqp_connection, new_amqp_channel},
    configs::Configs,
    demo,
    dispatcher::RabbitMQDispatcher,
    messaging::Dispatcher,
    publisher::RabbitMQPublisher,
    receiver::Receiver,
    runner::Runner,
    topology::{AmqpTopology, Topology},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Configs::from_env()?;
    let (conn, channel) = new_amqp_channel(&cfg).await?;

    let exchange = demo::exchange();
    let queue = demo::queue();
    let binding = demo::binding();

    AmqpTopology::new(channel.clone())
        .exchange(&exchange)
        .queue(&queue)
        .queue_binding(&binding)
        .install()
        .await?;

    let receiver = Arc::new(Receiver::new());
    let consumers = RabbitMQDispatcher::new(channel.clone())
        .register(demo::QUEUE_NAME, receiver.clone())
        .spawn()
        .await?;

    Runner::new(RabbitMQPublisher::new(channel.clone()), receiver)
        .run()
        .await?;

    // settle the delivery before the connection goes away
    consumers.shutdown().await?;
    close_amqp_connection(&conn).await?;

    info!("done");
    Ok(())
}
