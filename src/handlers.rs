use crate::atcoder::{aggregate, counts_for_window};
use crate::errors::AppError;
use crate::fetch::FetchError;
use crate::merge::{merge_sources, MergeError, MergedSeries};
use crate::models::{AtCoderQuery, GrassResponse, MergeRequest, UserResponse, WindowResponse};
use crate::session::Session;
use crate::sources::{ContributionWeek, DailyCounts};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Redirect,
    Json,
};
use tracing::{error, info, warn};

pub const TOKEN_COOKIE: &str = "token";

struct Identity {
    token: String,
    login: String,
}

pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, AppError> {
    let identity = identify(&state, &headers)
        .await
        .ok_or_else(AppError::unauthorized)?;
    Ok(Json(UserResponse {
        user_id: identity.login,
    }))
}

pub async fn get_data_github(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ContributionWeek>>, AppError> {
    let token = session_token(&headers).ok_or_else(AppError::unauthorized)?;
    let weeks = state.source.contributions(&token).await.map_err(|err| {
        error!("failed to fetch GitHub contributions: {err}");
        AppError::from(err)
    })?;
    Ok(Json(weeks))
}

pub async fn get_data_atcoder(
    State(state): State<AppState>,
    Query(query): Query<AtCoderQuery>,
) -> Result<Json<Vec<u64>>, AppError> {
    let uid = query.uid.trim();
    if uid.is_empty() {
        return Err(FetchError::EmptyUser.into());
    }
    let submissions = state.source.submissions(uid).await.map_err(|err| {
        error!(uid, "failed to fetch AtCoder submissions: {err}");
        AppError::from(err)
    })?;

    let window = state.window();
    Ok(Json(counts_for_window(
        &submissions,
        query.show_mode,
        &window,
        state.config.utc_offset,
    )))
}

pub async fn get_window(State(state): State<AppState>) -> Json<WindowResponse> {
    Json(WindowResponse::from(&state.window()))
}

pub async fn login_redirect(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let url = state
        .config
        .authorize_url()
        .ok_or_else(|| AppError::not_found("GitHub login is not configured"))?;
    Ok(Redirect::temporary(&url))
}

pub async fn get_grass(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<GrassResponse>, AppError> {
    let identity = identify(&state, &headers)
        .await
        .ok_or_else(AppError::unauthorized)?;
    let window = state.window();
    let sessions = state.sessions.lock().await;
    let response = match sessions.get(&identity.login) {
        Some(session) => GrassResponse::new(&window, session),
        None => GrassResponse::new(&window, &Session::new(window.len())),
    };
    Ok(Json(response))
}

pub async fn post_merge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MergeRequest>,
) -> Result<Json<GrassResponse>, AppError> {
    let Some(identity) = identify(&state, &headers).await else {
        return Err(MergeError::NotAuthenticated.into());
    };
    let uid = payload.uid.trim().to_string();
    if uid.is_empty() {
        return Err(FetchError::EmptyUser.into());
    }
    let mode = payload.show_mode;
    let window = state.window();

    let generation = state
        .sessions
        .lock()
        .await
        .entry(identity.login.clone())
        .or_insert_with(|| Session::new(window.len()))
        .begin_request();

    let (github, submissions) = tokio::join!(
        state.source.contributions(&identity.token),
        state.source.submissions(&uid)
    );
    let github = github
        .map(|weeks| DailyCounts::from_contribution_weeks(&weeks))
        .map_err(|err| warn!(login = %identity.login, "GitHub data unavailable: {err}"))
        .ok();
    let atcoder = submissions
        .map(|subs| aggregate(&subs, mode, state.config.utc_offset))
        .map_err(|err| warn!(uid = %uid, "AtCoder data unavailable: {err}"))
        .ok();

    let merged = merge_sources(&window, github.as_ref(), atcoder.as_ref())?;

    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .entry(identity.login.clone())
        .or_insert_with(|| Session::new(window.len()));
    if session.publish(generation, MergedSeries::from(merged), uid.clone(), mode) {
        info!(login = %identity.login, uid = %uid, %mode, generation, "published merged grass");
    } else {
        info!(login = %identity.login, generation, "dropped stale merge result");
    }
    Ok(Json(GrassResponse::new(&window, session)))
}

pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn identify(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let token = session_token(headers)?;
    match state.source.login(&token).await {
        Ok(login) if !login.is_empty() => Some(Identity { token, login }),
        Ok(_) => None,
        Err(err) => {
            warn!("login lookup failed: {err}");
            None
        }
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
