//! The taco designer: ingredient picker and taco submission.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::model::{IngredientGroups, Taco, TacoDesign, TacoOrder};
use crate::session::OrderSession;
use crate::validation::ValidationErrors;
use crate::web::cookie::set_session;
use crate::web::{AppError, AppState, SessionCookie};

/// What the design page renders.
#[derive(Debug, Serialize)]
pub struct DesignView {
    pub ingredients: IngredientGroups,
    pub taco: TacoDesign,
    pub taco_order: TacoOrder,
    pub errors: ValidationErrors,
}

async fn design_view(
    state: &AppState,
    session: OrderSession,
    errors: ValidationErrors,
) -> Result<DesignView, AppError> {
    let ingredients = IngredientGroups::group(state.ingredients.find_all().await?);
    Ok(DesignView {
        ingredients,
        taco: session.design,
        taco_order: session.order,
        errors,
    })
}

#[instrument(skip_all)]
pub async fn show_design_form(
    State(state): State<AppState>,
    SessionCookie(session_id): SessionCookie,
) -> Result<Response, AppError> {
    let session = state.sessions.resume(session_id).await?;
    let id = session.id;
    let view = design_view(&state, session, ValidationErrors::new()).await?;
    Ok((set_session(id), Json(view)).into_response())
}

/// Adds the submitted taco to the session order, or re-renders the picker
/// with errors. Unknown ingredient ids are ignored.
#[instrument(skip_all)]
pub async fn process_taco(
    State(state): State<AppState>,
    SessionCookie(session_id): SessionCookie,
    Json(design): Json<TacoDesign>,
) -> Result<Response, AppError> {
    let session = state.sessions.resume(session_id).await?;
    let id = session.id;

    let mut taco = Taco::new(design.name.as_str());
    for ingredient in state.resolver.resolve_all(&design.ingredients) {
        taco.add_ingredient(&ingredient);
    }

    if let Err(errors) = taco.validate() {
        info!(session = %id, taco = %design.name, ?errors, "Taco rejected");
        let session = state.sessions.hold_design(id, design).await?;
        let view = design_view(&state, session, errors).await?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, set_session(id), Json(view)).into_response());
    }

    let session = state.sessions.add_taco(id, taco).await?;
    info!(session = %id, taco = %design.name, tacos = session.order.tacos.len(), "Taco added");
    Ok((set_session(id), Redirect::to("/orders/current")).into_response())
}
