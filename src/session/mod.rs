//! Per-customer order drafts.
//!
//! Each visitor gets a [`SessionId`] (carried in the `taco_session` cookie)
//! and one [`OrderSession`] held by a [`ResourceActor`]. The draft collects
//! designed tacos and the delivery/payment fields until the order is placed,
//! at which point the session is completed and discarded. Sessions left idle
//! past the configured TTL are dropped.

pub mod client;
pub mod entity;
pub mod error;

pub use client::SessionClient;
pub use entity::{OrderSession, SessionAction, SessionId};
pub use error::SessionError;

use std::time::Duration;

use crate::framework::ResourceActor;

/// Creates the session actor and its client. Spawn `actor.run(())` to serve it.
///
/// With `idle_ttl`, sessions untouched for that long are dropped.
pub fn new(
    buffer_size: usize,
    idle_ttl: Option<Duration>,
) -> (ResourceActor<OrderSession>, SessionClient) {
    let (mut actor, generic_client) = ResourceActor::new(buffer_size, SessionId::random);
    if let Some(ttl) = idle_ttl {
        actor = actor.with_idle_ttl(ttl);
    }
    (actor, SessionClient::new(generic_client))
}
