// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

mod consumer;
mod otel;

pub mod channel;
pub mod configs;
pub mod demo;
pub mod dispatcher;
pub mod errors;
pub mod exchange;
pub mod latch;
pub mod messaging;
pub mod publisher;
pub mod queue;
pub mod receiver;
pub mod runner;
pub mod topology;
