use crate::errors::AppError;
use crate::identity::resolve_client_id;
use crate::models::{LikeAction, LikeRequest, LikeStats, VisitStats};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{debug, info, warn};

pub async fn get_visits(State(state): State<AppState>) -> Result<Json<VisitStats>, AppError> {
    let count = state.store.visit_count().await?;
    debug!(count, "visit count read");
    Ok(Json(VisitStats { count }))
}

pub async fn record_visit(State(state): State<AppState>) -> Result<Json<VisitStats>, AppError> {
    let count = state.store.increment_visit().await?;
    info!(count, "visit recorded");
    Ok(Json(VisitStats { count }))
}

pub async fn get_likes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LikeStats>, AppError> {
    let client_id = resolve_client_id(&headers);
    let stats = state.store.like_stats(&client_id).await?;
    debug!(%client_id, count = stats.count, is_liked = stats.is_liked, "like stats read");
    Ok(Json(stats))
}

pub async fn update_like(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LikeStats>, AppError> {
    // Content-Type is not checked; beacon-style callers send text/plain.
    let payload: LikeRequest = serde_json::from_slice(&body).map_err(|err| {
        warn!("unreadable like body: {err}");
        AppError::internal(err)
    })?;
    let client_id = resolve_client_id(&headers);

    let stats = match LikeAction::parse(payload.action.as_deref()) {
        Some(action) => {
            let stats = state.store.set_like(&client_id, action.liked()).await?;
            info!(%client_id, action = action.as_str(), count = stats.count, "like updated");
            stats
        }
        None => {
            debug!(%client_id, action = ?payload.action, "ignoring unknown like action");
            state.store.like_stats(&client_id).await?
        }
    };
    Ok(Json(stats))
}

pub async fn preflight() -> impl IntoResponse {
    (StatusCode::OK, [(CONTENT_TYPE, "application/json")])
}

pub async fn method_not_allowed(method: Method) -> AppError {
    warn!(%method, "method not allowed");
    AppError::method_not_allowed()
}
