//! # Resource Actor Framework
//!
//! A small generic actor used to own mutable per-key state without locks.
//! Taco Cloud runs one instance of it: the session store, where each entity is
//! one customer's order draft (see [`crate::session`]).
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - what is stored and how it reacts to requests
//! 2. **Runtime Layer** ([`ResourceActor`]) - the message loop that owns the store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed, cloneable handles
//!
//! ## Concurrency Model
//!
//! - The actor runs in its own Tokio task and processes requests **sequentially**.
//! - Handlers talk to it through cloned clients. Each request runs to completion
//!   before the next starts, but a sequence of requests from one handler can
//!   interleave with another handler's. Multi-step work claims the entity with an
//!   action first (see `SessionAction::Checkout`).
//! - With [`ResourceActor::with_idle_ttl`], entities no request has touched for
//!   the TTL are swept out.
//! - When every client is dropped the loop drains and exits.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a queue of expectations, so typed
//! clients can be tested without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
