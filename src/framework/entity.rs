//! # ActorEntity Trait
//!
//! The contract a stored type implements so a [`ResourceActor`](crate::framework::ResourceActor)
//! can own it. Associated types pin down the id, the payload of every request
//! kind, the runtime context and the error type; lifecycle hooks let the
//! entity validate or react to each request.
//!
//! # Provided Methods (Hooks)
//! [`ActorEntity::on_create`] and [`ActorEntity::on_delete`] default to
//! `Ok(())`. Implement them only when creation or removal needs checks.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any entity must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so they may call other services. `Context` is handed to
/// `run()` and then passed to every hook, which lets dependencies be wired
/// after the actor is constructed. Use `()` when there are none.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique key for this entity. Ids are produced by the generator
    /// passed to [`ResourceActor::new`](crate::framework::ResourceActor::new).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Payload for creating a new instance.
    type Create: Send + Sync + Debug + 'static;

    /// Payload for updating an existing instance.
    type Update: Send + Sync + Debug + 'static;

    /// Entity-specific operations beyond create/read/update/delete.
    type Action: Send + Sync + Debug + 'static;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug + 'static;

    /// Dependencies injected into the actor at `run()`.
    type Context: Send + Sync + 'static;

    /// One error enum per entity; every hook reports through it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the entity from its freshly generated id and the create payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update in place.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed. An error keeps it stored.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handles a custom action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
