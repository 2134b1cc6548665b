use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

pub const VISIT_PATH: &str = "/stats/visit";
pub const LIKE_PATH: &str = "/stats/like";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            VISIT_PATH,
            get(handlers::get_visits)
                .post(handlers::record_visit)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            LIKE_PATH,
            get(handlers::get_likes)
                .post(handlers::update_like)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .layer(cors_layer())
        // Outside the CORS layer so preflight replies carry it too.
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
