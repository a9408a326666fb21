//! [`ActorEntity`] implementation for the session draft.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::framework::ActorEntity;
use crate::model::{OrderForm, Taco, TacoDesign, TacoOrder};
use crate::session::SessionError;

/// Opaque session key. Random, so cookies cannot be guessed from each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One customer's in-progress order plus the taco they are designing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSession {
    pub id: SessionId,
    pub order: TacoOrder,
    /// The design shown in the picker, kept across a failed submission.
    pub design: TacoDesign,
    /// Set while a checkout owns the draft; edits and a second checkout are refused.
    #[serde(skip)]
    pub checking_out: bool,
}

impl OrderSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            order: TacoOrder::new(),
            design: TacoDesign::default(),
            checking_out: false,
        }
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        if self.checking_out {
            return Err(SessionError::CheckoutInProgress(self.id.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum SessionAction {
    /// Appends a validated taco to the draft and clears the held design.
    AddTaco(Taco),
    /// Replaces the held design.
    HoldDesign(TacoDesign),
    /// Binds the submitted fields, validates the order and claims the draft
    /// for saving. The bound fields stay on the draft when validation fails.
    Checkout(OrderForm),
    /// Hands the draft back after a checkout whose save failed.
    ReleaseCheckout,
}

#[async_trait]
impl ActorEntity for OrderSession {
    type Id = SessionId;
    type Create = ();
    type Update = OrderForm;
    type Action = SessionAction;
    type ActionResult = OrderSession;
    type Context = ();
    type Error = SessionError;

    fn from_create_params(id: SessionId, _params: ()) -> Result<Self, Self::Error> {
        Ok(Self::new(id))
    }

    async fn on_update(&mut self, form: OrderForm, _ctx: &()) -> Result<(), Self::Error> {
        self.ensure_editable()?;
        self.order.bind(form);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: SessionAction,
        _ctx: &(),
    ) -> Result<OrderSession, Self::Error> {
        match action {
            SessionAction::AddTaco(taco) => {
                self.ensure_editable()?;
                taco.validate().map_err(SessionError::InvalidTaco)?;
                self.order.add_taco(taco);
                self.design = TacoDesign::default();
            }
            SessionAction::HoldDesign(design) => self.design = design,
            SessionAction::Checkout(form) => {
                self.ensure_editable()?;
                self.order.bind(form);
                self.order.validate().map_err(SessionError::InvalidOrder)?;
                self.checking_out = true;
            }
            SessionAction::ReleaseCheckout => self.checking_out = false,
        }
        Ok(self.clone())
    }
}
