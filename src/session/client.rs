use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::framework::{ActorClient, FrameworkError, ResourceClient};
use crate::model::{OrderForm, Taco, TacoDesign};
use crate::session::{OrderSession, SessionAction, SessionError, SessionId};

/// Client for the session actor. Cheap to clone; one lives in the app state.
#[derive(Clone)]
pub struct SessionClient {
    inner: ResourceClient<OrderSession>,
}

impl SessionClient {
    pub fn new(inner: ResourceClient<OrderSession>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<OrderSession> for SessionClient {
    type Error = SessionError;

    fn inner(&self) -> &ResourceClient<OrderSession> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => SessionError::NotFound(id),
            FrameworkError::EntityError(inner) => match inner.downcast::<SessionError>() {
                Ok(session_error) => *session_error,
                Err(other) => SessionError::Unavailable(other.to_string()),
            },
            other => SessionError::Unavailable(other.to_string()),
        }
    }
}

impl SessionClient {
    /// Starts a session with an empty draft.
    #[instrument(skip(self))]
    pub async fn open(&self) -> Result<OrderSession, SessionError> {
        debug!("Sending request");
        let id = self.inner.create(()).await.map_err(Self::map_error)?;
        Ok(OrderSession::new(id))
    }

    /// The session for `id`, or a fresh one when `id` is missing or stale.
    #[instrument(skip(self))]
    pub async fn resume(&self, id: Option<SessionId>) -> Result<OrderSession, SessionError> {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await? {
                return Ok(session);
            }
            debug!(%id, "Stale session id");
        }
        self.open().await
    }

    #[instrument(skip(self, taco), fields(taco = %taco.name))]
    pub async fn add_taco(&self, id: SessionId, taco: Taco) -> Result<OrderSession, SessionError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, SessionAction::AddTaco(taco))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, design))]
    pub async fn hold_design(
        &self,
        id: SessionId,
        design: TacoDesign,
    ) -> Result<OrderSession, SessionError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, SessionAction::HoldDesign(design))
            .await
            .map_err(Self::map_error)
    }

    /// Copies the submitted delivery and payment fields onto the draft.
    #[instrument(skip(self, form))]
    pub async fn bind_order(
        &self,
        id: SessionId,
        form: OrderForm,
    ) -> Result<OrderSession, SessionError> {
        debug!("Sending request");
        self.inner.update(id, form).await.map_err(Self::map_error)
    }

    /// Binds the submitted fields and claims the draft for saving. Until
    /// [`complete`](Self::complete) or [`release_checkout`](Self::release_checkout),
    /// edits and further checkouts of this session are refused.
    #[instrument(skip(self, form))]
    pub async fn checkout(
        &self,
        id: SessionId,
        form: OrderForm,
    ) -> Result<OrderSession, SessionError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, SessionAction::Checkout(form))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn release_checkout(&self, id: SessionId) -> Result<OrderSession, SessionError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, SessionAction::ReleaseCheckout)
            .await
            .map_err(Self::map_error)
    }

    /// Ends the session, returning its final state.
    #[instrument(skip(self))]
    pub async fn complete(&self, id: SessionId) -> Result<OrderSession, SessionError> {
        self.delete(id).await
    }
}
