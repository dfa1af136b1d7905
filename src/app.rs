use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tracing::warn;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", get(handlers::login_redirect))
        .route("/user", get(handlers::get_user))
        .route("/data/github", get(handlers::get_data_github))
        .route("/data/atcoderproblems", get(handlers::get_data_atcoder))
        .route("/api/window", get(handlers::get_window))
        .route("/api/grass", get(handlers::get_grass))
        .route(
            "/api/merge",
            post(handlers::post_merge).options(handlers::preflight),
        )
        .layer(middleware::from_fn_with_state(state.clone(), allow_credentials))
        .with_state(state)
}

// The browser client lives on another origin and sends the session cookie.
async fn allow_credentials(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    match HeaderValue::from_str(&state.config.allowed_origin) {
        Ok(origin) => {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        Err(err) => warn!("invalid allowed origin: {err}"),
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    response
}
