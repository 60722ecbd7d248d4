//! Update ingress (long-polling and webhook) and the router that
//! dispatches ingested updates to handlers (§4.4–§4.7).

pub mod filters;
pub mod poller;
pub mod router;

#[cfg(feature = "webhook")]
pub mod webhook;

pub use filters::Filter;
pub use poller::{Poller, PollerConfig};
pub use router::{Router, RouterBuilder, UpdateKey};

#[cfg(feature = "webhook")]
pub use webhook::{reply_in_response, SecretTokenConfig, WebhookConfig};
