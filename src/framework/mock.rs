//! # Mock Client
//!
//! [`MockClient`] hands out a real [`ResourceClient`] whose requests are
//! answered from a queue of scripted expectations instead of a running actor.
//! Use it to test code that sits on top of a client (for example the
//! session wrapper, or handlers that must cope with a closed store) without
//! building entity state first.
//!
//! ```ignore
//! let mut mock = MockClient::<OrderSession>::new();
//! mock.expect_create().return_ok(session_id);
//! mock.expect_get(session_id).return_err(FrameworkError::ActorClosed);
//!
//! let client = SessionClient::new(mock.client());
//! // ... exercise the client ...
//! mock.verify();
//! ```
//!
//! Expectations are consumed in order. A request that does not match the
//! next expectation (wrong kind or wrong id) gets no reply, so the caller
//! sees [`FrameworkError::ActorDropped`], and [`MockClient::verify`] fails.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::warn;

enum Expectation<T: ActorEntity> {
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Update {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Delete {
        id: T::Id,
        response: Result<T, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Get { .. } => "get",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Action { .. } => "action",
        }
    }
}

struct Script<T: ActorEntity> {
    pending: VecDeque<Expectation<T>>,
    mismatches: Vec<String>,
}

type Shared<T> = Arc<Mutex<Script<T>>>;

fn lock<T: ActorEntity>(script: &Shared<T>) -> MutexGuard<'_, Script<T>> {
    script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A scripted stand-in for a `ResourceActor`.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    script: Shared<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let script: Shared<T> = Arc::new(Mutex::new(Script {
            pending: VecDeque::new(),
            mismatches: Vec::new(),
        }));
        let responder = script.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = lock(&responder).pending.pop_front();
                answer(request, next, &responder);
            }
        });

        Self {
            client: ResourceClient::new(sender),
            script,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    fn builder<R: 'static>(
        &mut self,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            script: self.script.clone(),
            make: Box::new(make),
        }
    }

    /// Panics if any expectation is unused or any request went unmatched.
    pub fn verify(&self) {
        let script = lock(&self.script);
        if !script.mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", script.mismatches);
        }
        if !script.pending.is_empty() {
            let left: Vec<_> = script.pending.iter().map(Expectation::kind).collect();
            panic!("Not all expectations were met. Remaining: {left:?}");
        }
    }
}

// A mismatch is recorded before the request (and its reply channel) drops.
fn answer<T: ActorEntity>(
    request: ResourceRequest<T>,
    next: Option<Expectation<T>>,
    script: &Shared<T>,
) {
    match (request, next) {
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create { response })) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get { id: want, response }))
            if id == want =>
        {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Some(Expectation::Update { id: want, response }),
        ) if id == want => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Delete { id, respond_to },
            Some(Expectation::Delete { id: want, response }),
        ) if id == want => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Action { id, respond_to, .. },
            Some(Expectation::Action { id: want, response }),
        ) if id == want => {
            let _ = respond_to.send(response);
        }
        (request, next) => {
            let mismatch = format!(
                "{} while expecting {}",
                describe(&request),
                next.as_ref().map_or("nothing", Expectation::kind)
            );
            warn!(%mismatch, "Unexpected request");
            lock(script).mismatches.push(mismatch);
        }
    }
}

fn describe<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { .. } => "create".to_string(),
        ResourceRequest::Get { id, .. } => format!("get({id})"),
        ResourceRequest::Update { id, .. } => format!("update({id})"),
        ResourceRequest::Delete { id, .. } => format!("delete({id})"),
        ResourceRequest::Action { id, .. } => format!("action({id})"),
    }
}

/// Finishes one expectation with the value the mock should answer.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    script: Shared<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.make)(response);
        lock(&self.script).pending.push_back(expectation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("note error")]
    struct NoteError;

    #[async_trait]
    impl ActorEntity for Note {
        type Id = u32;
        type Create = String;
        type Update = String;
        type Action = ();
        type ActionResult = usize;
        type Context = ();
        type Error = NoteError;

        fn from_create_params(id: u32, text: String) -> Result<Self, Self::Error> {
            Ok(Self { id, text })
        }
        async fn on_update(&mut self, text: String, _: &()) -> Result<(), Self::Error> {
            self.text = text;
            Ok(())
        }
        async fn handle_action(&mut self, _: (), _: &()) -> Result<usize, Self::Error> {
            Ok(self.text.len())
        }
    }

    fn note(id: u32, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_expectations_answer_in_order() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_create().return_ok(7);
        mock.expect_get(7).return_ok(Some(note(7, "hola")));
        mock.expect_update(7).return_ok(note(7, "adios"));
        mock.expect_action(7).return_ok(5);
        mock.expect_delete(7).return_ok(note(7, "adios"));

        let client = mock.client();
        assert_eq!(client.create("hola".into()).await.unwrap(), 7);
        assert_eq!(client.get(7).await.unwrap(), Some(note(7, "hola")));
        assert_eq!(client.update(7, "adios".into()).await.unwrap().text, "adios");
        assert_eq!(client.perform_action(7, ()).await.unwrap(), 5);
        assert_eq!(client.delete(7).await.unwrap().id, 7);

        mock.verify();
    }

    #[tokio::test]
    async fn test_scripted_error_is_returned() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(1).return_err(FrameworkError::ActorClosed);

        let result = mock.client().get(1).await;
        assert!(matches!(result, Err(FrameworkError::ActorClosed)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_wrong_id_gets_no_reply() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected requests")]
    async fn test_verify_reports_mismatch() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_create().return_ok(1);

        let _ = mock.client().get(1).await;
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unused_expectation() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_delete(3).return_ok(note(3, "x"));
        mock.verify();
    }
}
