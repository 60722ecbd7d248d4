//! Client and dispatch framework for the Telegram Bot API.
//!
//! [`client::Bot`] executes typed calls against the API; [`dispatching`]
//! ingests updates by long-polling ([`dispatching::Poller`]) or webhook
//! ([`dispatching::webhook`], behind the `webhook` feature) and routes them
//! through a [`dispatching::Router`] of filters and handlers.

pub mod client;
pub mod dispatching;
pub mod error;
pub mod middleware;
pub mod net;
pub mod prelude;
pub mod requests;
pub mod types;

pub use client::{Bot, ClientBuilder};
pub use error::{ApiError, Error, Result};
