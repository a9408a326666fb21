//! Order form, submission, and read-back of placed orders.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::framework::ActorClient;
use crate::model::{OrderForm, TacoOrder};
use crate::session::SessionError;
use crate::validation::ValidationErrors;
use crate::web::cookie::{clear_session, set_session};
use crate::web::{AppError, AppState, SessionCookie};

#[derive(Debug, Serialize)]
pub struct OrderView {
    pub taco_order: TacoOrder,
    pub errors: ValidationErrors,
}

#[instrument(skip_all)]
pub async fn order_form(
    State(state): State<AppState>,
    SessionCookie(session_id): SessionCookie,
) -> Result<Response, AppError> {
    let session = state.sessions.resume(session_id).await?;
    let view = OrderView {
        taco_order: session.order,
        errors: ValidationErrors::new(),
    };
    Ok((set_session(session.id), Json(view)).into_response())
}

/// Binds the submitted fields onto the session order, then either places the
/// order (and ends the session) or re-renders the form with errors.
///
/// The draft is claimed by a checkout before the save, so a second submission
/// for the same session is refused with 409 instead of storing a duplicate.
#[instrument(skip_all)]
pub async fn process_order(
    State(state): State<AppState>,
    SessionCookie(session_id): SessionCookie,
    Json(form): Json<OrderForm>,
) -> Result<Response, AppError> {
    let id = state.sessions.resume(session_id).await?.id;
    let mut order = match state.sessions.checkout(id, form).await {
        Ok(session) => session.order,
        Err(SessionError::InvalidOrder(errors)) => {
            info!(session = %id, ?errors, "Order rejected");
            let taco_order = state
                .sessions
                .get(id)
                .await?
                .map(|session| session.order)
                .unwrap_or_default();
            let view = OrderView { taco_order, errors };
            return Ok(
                (StatusCode::UNPROCESSABLE_ENTITY, set_session(id), Json(view)).into_response(),
            );
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = state.orders.save(&mut order).await {
        if let Err(release) = state.sessions.release_checkout(id).await {
            warn!(session = %id, error = %release, "Checkout not released");
        }
        return Err(e.into());
    }
    state.sessions.complete(id).await?;
    info!(order_id = ?order.id, tacos = order.tacos.len(), "Order submitted");

    Ok((clear_session(), Redirect::to("/")).into_response())
}

#[instrument(skip(state))]
pub async fn placed_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TacoOrder>, AppError> {
    state
        .orders
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::OrderNotFound(id))
}
