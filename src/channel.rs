// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # AMQP Channel Management
//!
//! Opens the connection to RabbitMQ and the single channel the demo uses
//! for declaring, publishing and consuming.

use crate::{configs::Configs, errors::AmqpError};
use lapin::{types::LongString, Channel, Connection, ConnectionProperties};
use std::sync::Arc;
use tracing::{debug, error};

/// Creates a new AMQP channel for communication with RabbitMQ.
///
/// The connection is named after `cfg.app.name` so it can be told apart in
/// the management UI. Both the connection and channel are wrapped in Arc
/// so they can be shared with the consumer tasks.
///
/// # Example
/// ```no_run
/// # async fn run() -> Result<(), rabbitmq_topic_demo::errors::AmqpError> {
/// use rabbitmq_topic_demo::{channel::new_amqp_channel, configs::Configs};
///
/// let cfg = Configs::from_env()?;
/// let (conn, channel) = new_amqp_channel(&cfg).await?;
/// # Ok(())
/// # }
/// ```
pub async fn new_amqp_channel(cfg: &Configs) -> Result<(Arc<Connection>, Arc<Channel>), AmqpError> {
    debug!("creating amqp connection...");
    let options = ConnectionProperties::default()
        .with_connection_name(LongString::from(cfg.app.name.clone()));

    let conn = match Connection::connect(&cfg.rabbitmq.uri(), options).await {
        Ok(c) => Ok(c),
        Err(err) => {
            error!(
                error = err.to_string(),
                host = cfg.rabbitmq.host,
                port = cfg.rabbitmq.port,
                "failure to connect"
            );
            Err(AmqpError::ConnectionError)
        }
    }?;
    debug!("amqp connected");

    debug!("creating amqp channel...");
    match conn.create_channel().await {
        Ok(c) => {
            debug!("channel created");
            Ok((Arc::new(conn), Arc::new(c)))
        }
        Err(err) => {
            error!(error = err.to_string(), "error to create the channel");
            Err(AmqpError::ChannelError)
        }
    }
}

/// Closes the connection with a normal shutdown reply code.
pub async fn close_amqp_connection(conn: &Connection) -> Result<(), AmqpError> {
    debug!("closing amqp connection...");
    match conn.close(200, "bye").await {
        Ok(_) => {
            debug!("amqp connection closed");
            Ok(())
        }
        Err(err) => {
            error!(error = err.to_string(), "error to close the connection");
            Err(AmqpError::CloseConnectionError)
        }
    }
}
