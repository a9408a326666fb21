//! # Generic Actor Server
//!
//! [`ResourceActor`] owns a map of entities and the receiving end of the
//! request channel. Requests are processed one at a time, so the map needs no
//! lock. Ordering holds per request only: a caller that needs several
//! requests to act as one must claim the entity through an action.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new(buffer, next_id)` returns the actor and a client.
/// 2. **Configure**: optionally `.with_idle_ttl(ttl)` to expire untouched entities.
/// 3. **Run**: spawn `actor.run(context)` on the runtime.
/// 4. **Use**: clone the client into whatever needs it.
///
/// # Operations
///
/// * **Create**: draws an id from `next_id`, builds the entity with
///   `from_create_params`, runs `on_create`, stores it, returns the id.
/// * **Get**: returns a clone of the stored entity, or `None`.
/// * **Update**: runs `on_update` on the stored entity and returns the new state.
/// * **Delete**: runs `on_delete`, removes the entity and returns it.
/// * **Action**: runs `handle_action` on the stored entity and returns its result.
///
/// Update, Delete and Action on an unknown id answer
/// [`FrameworkError::NotFound`].
///
/// # Idle Expiry
///
/// Every request that names an entity marks it as touched. With an idle TTL
/// set, a sweep runs every half TTL and drops entities untouched for longer
/// than the TTL. Hooks are not called for expired entities.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, Slot<T>>,
    next_id: Box<dyn Fn() -> T::Id + Send + Sync>,
    idle_ttl: Option<Duration>,
}

struct Slot<T> {
    entity: T,
    touched: Instant,
}

impl<T> Slot<T> {
    fn new(entity: T) -> Self {
        Self {
            entity,
            touched: Instant::now(),
        }
    }

    fn touch(&mut self) -> &mut T {
        self.touched = Instant::now();
        &mut self.entity
    }
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Capacity of the request channel. When full, client
    ///   calls wait for space.
    /// * `next_id` - Id generator, called once per Create. Must not repeat
    ///   an id that is still stored.
    pub fn new(
        buffer_size: usize,
        next_id: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: Box::new(next_id),
            idle_ttl: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Expires entities that no request has touched for longer than `ttl`.
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        // Short type name, e.g. "OrderSession".
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, ttl = ?self.idle_ttl, "Actor started");

        let mut sweep = self.idle_ttl.map(|ttl| {
            let period = (ttl / 2).max(Duration::from_millis(1));
            let mut sweep = time::interval_at(Instant::now() + period, period);
            sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
            sweep
        });

        loop {
            tokio::select! {
                biased;
                _ = next_sweep(&mut sweep) => self.evict_idle(entity_type),
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg, &context, entity_type).await,
                    None => break,
                },
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn evict_idle(&mut self, entity_type: &str) {
        let Some(ttl) = self.idle_ttl else {
            return;
        };
        let before = self.store.len();
        self.store.retain(|_, slot| slot.touched.elapsed() <= ttl);
        let expired = before - self.store.len();
        if expired > 0 {
            info!(entity_type, expired, size = self.store.len(), "Expired idle");
        }
    }

    async fn handle(&mut self, msg: ResourceRequest<T>, context: &T::Context, entity_type: &str) {
        match msg {
            ResourceRequest::Create { params, respond_to } => {
                debug!(entity_type, ?params, "Create");
                let id = (self.next_id)();

                let mut item = match T::from_create_params(id.clone(), params) {
                    Ok(item) => item,
                    Err(e) => {
                        warn!(entity_type, error = %e, "Create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        return;
                    }
                };
                if let Err(e) = item.on_create(context).await {
                    warn!(entity_type, error = %e, "on_create failed");
                    let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                    return;
                }
                self.store.insert(id.clone(), Slot::new(item));
                info!(entity_type, %id, size = self.store.len(), "Created");
                let _ = respond_to.send(Ok(id));
            }
            ResourceRequest::Get { id, respond_to } => {
                let item = self.store.get_mut(&id).map(|slot| slot.touch().clone());
                debug!(entity_type, %id, found = item.is_some(), "Get");
                let _ = respond_to.send(Ok(item));
            }
            ResourceRequest::Update {
                id,
                update,
                respond_to,
            } => {
                debug!(entity_type, %id, ?update, "Update");
                let Some(slot) = self.store.get_mut(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    return;
                };
                let item = slot.touch();
                if let Err(e) = item.on_update(update, context).await {
                    warn!(entity_type, %id, error = %e, "Update failed");
                    let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                    return;
                }
                debug!(entity_type, %id, "Updated");
                let _ = respond_to.send(Ok(item.clone()));
            }
            ResourceRequest::Delete { id, respond_to } => {
                debug!(entity_type, %id, "Delete");
                let Some(slot) = self.store.get(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    return;
                };
                if let Err(e) = slot.entity.on_delete(context).await {
                    warn!(entity_type, %id, error = %e, "on_delete failed");
                    let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                    return;
                }
                let removed = self.store.remove(&id).map(|slot| slot.entity);
                info!(entity_type, %id, size = self.store.len(), "Deleted");
                let _ = respond_to.send(
                    removed.ok_or_else(|| FrameworkError::NotFound(id.to_string())),
                );
            }
            ResourceRequest::Action {
                id,
                action,
                respond_to,
            } => {
                debug!(entity_type, %id, ?action, "Action");
                let Some(slot) = self.store.get_mut(&id) else {
                    warn!(entity_type, %id, "Not found");
                    let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    return;
                };
                let result = slot
                    .touch()
                    .handle_action(action, context)
                    .await
                    .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                match &result {
                    Ok(_) => debug!(entity_type, %id, "Action ok"),
                    Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                }
                let _ = respond_to.send(result);
            }
        }
    }
}

/// Resolves on the next sweep tick; never resolves without a TTL.
async fn next_sweep(sweep: &mut Option<Interval>) {
    match sweep {
        Some(sweep) => {
            sweep.tick().await;
        }
        None => std::future::pending().await,
    }
}
