//! # Generic Messages
//!
//! The request enum carried from [`ResourceClient`](crate::framework::ResourceClient)
//! to [`ResourceActor`](crate::framework::ResourceActor).

use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants follow the lifecycle of a stored entity (create, read,
/// update, delete) plus `Action` for entity-specific operations. For the
/// session store that maps to: open a session, read the draft, bind order
/// fields, complete the session, and add a taco / hold a design.
///
/// Payload types come from the entity's associated types, so a request built
/// for one entity type cannot reach another entity's actor.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
