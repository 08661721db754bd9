//! # Shop payment server
//! This module hosts the HTTP surface of the shop payment gateway. It is responsible for:
//! Listening for incoming webhook notifications from the Cashfree payment gateway.
//! Verifying their signatures and applying them to the order store via the payment engine.
//! Creating gateway orders on behalf of the storefront checkout.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook/cashfree`: The webhook route for receiving payment-status notifications from Cashfree.
//! * `/api/checkout`: Creates a local order and the matching gateway order, returning the payment session.
//! * `/api/order-status/{id}`: Returns the current payment status of an order.

pub mod cashfree_routes;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
