use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::verify_bearer,
    error::FamilyDataError,
    filters::FilterSettings,
    models::{OpenSessionRequest, ReplaceFamilyRequest, SearchParams, SessionRecord},
    session::Session,
    AppState,
};

pub(crate) fn error_response(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "code": code,
                "message": message.into()
            }
        })),
    )
        .into_response()
}

fn invalid_family_data(err: &FamilyDataError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": {
                "code": "INVALID_FAMILY_DATA",
                "reason": err.code(),
                "message": err.to_string()
            }
        })),
    )
        .into_response()
}

fn session_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Session not found.")
}

/// Runs a read-only `f` against an authorized session and marks it as
/// accessed. Holds the shared lock, so queries on different sessions run
/// concurrently.
async fn with_session<T>(
    state: &AppState,
    headers: &HeaderMap,
    session_id: &str,
    f: impl FnOnce(&SessionRecord) -> T,
) -> Result<T, Response> {
    let sessions = state.sessions.read().await;
    let Some(record) = sessions.get(session_id) else {
        return Err(session_not_found());
    };
    verify_bearer(headers, record.session.auth_token()).map_err(IntoResponse::into_response)?;
    record.touch(Utc::now());
    Ok(f(record))
}

/// Like [`with_session`], but for requests that change the session.
async fn with_session_mut<T>(
    state: &AppState,
    headers: &HeaderMap,
    session_id: &str,
    f: impl FnOnce(&mut SessionRecord) -> T,
) -> Result<T, Response> {
    let mut sessions = state.sessions.write().await;
    let Some(record) = sessions.get_mut(session_id) else {
        return Err(session_not_found());
    };
    verify_bearer(headers, record.session.auth_token()).map_err(IntoResponse::into_response)?;
    record.touch(Utc::now());
    Ok(f(record))
}

pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true, "timestamp": Utc::now() }))
}

pub async fn open_session(
    State(state): State<AppState>,
    Json(payload): Json<OpenSessionRequest>,
) -> impl IntoResponse {
    if payload.auth_token.trim().is_empty() || payload.person_id.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "INVALID_SESSION_REQUEST",
            "Request must include an auth token and the user's person id.",
        );
    }

    let filters = payload.filters.unwrap_or(state.config.default_filters);
    let session = match Session::open(
        payload.auth_token.trim(),
        payload.person_id,
        &payload.persons,
        &payload.events,
        filters,
    ) {
        Ok(session) => session,
        Err(err) => return invalid_family_data(&err),
    };

    let record = SessionRecord::new(Uuid::new_v4().to_string(), session, Utc::now());
    let summary = record.to_summary();

    {
        let mut sessions = state.sessions.write().await;
        if sessions.len() >= state.config.session_capacity {
            warn!(
                capacity = state.config.session_capacity,
                "Rejecting session: capacity reached"
            );
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_CAPACITY",
                "Too many open sessions.",
            );
        }
        sessions.insert(record.session_id.clone(), record);
    }

    info!(
        session_id = %summary.session_id,
        persons = summary.person_count,
        events = summary.event_count,
        "Session opened"
    );
    (StatusCode::CREATED, Json(summary)).into_response()
}

pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| record.to_summary()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(response) => response,
    }
}

pub async fn close_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let record = {
        let mut sessions = state.sessions.write().await;
        let Some(record) = sessions.get(&session_id) else {
            return session_not_found();
        };
        if let Err(err) = verify_bearer(&headers, record.session.auth_token()) {
            return err.into_response();
        }
        sessions.remove(&session_id)
    };

    if let Some(record) = record {
        info!(session_id = %session_id, "Session closed");
        record.session.clear();
    }
    StatusCode::NO_CONTENT.into_response()
}

pub async fn replace_family(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
    Json(payload): Json<ReplaceFamilyRequest>,
) -> impl IntoResponse {
    let outcome = with_session_mut(&state, &headers, &session_id, |record| {
        record
            .session
            .reload(&payload.persons, &payload.events)
            .map(|()| record.to_summary())
    })
    .await;

    match outcome {
        Ok(Ok(summary)) => (StatusCode::OK, Json(summary)).into_response(),
        Ok(Err(err)) => invalid_family_data(&err),
        Err(response) => response,
    }
}

pub async fn get_filters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| record.session.filters()).await {
        Ok(filters) => (StatusCode::OK, Json(filters)).into_response(),
        Err(response) => response,
    }
}

pub async fn put_filters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
    Json(filters): Json<FilterSettings>,
) -> impl IntoResponse {
    match with_session_mut(&state, &headers, &session_id, |record| {
        record.session.set_filters(filters);
        record.session.filters()
    })
    .await
    {
        Ok(filters) => (StatusCode::OK, Json(filters)).into_response(),
        Err(response) => response,
    }
}

pub async fn list_people(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| record.session.people()).await {
        Ok(people) => (StatusCode::OK, Json(json!({ "people": people }))).into_response(),
        Err(response) => response,
    }
}

pub async fn get_person(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((session_id, person_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| {
        record.session.person_detail(&person_id)
    })
    .await
    {
        Ok(Some(detail)) => (StatusCode::OK, Json(detail)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "PERSON_NOT_FOUND",
            format!("Person not found: {person_id}"),
        ),
        Err(response) => response,
    }
}

pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| record.session.events()).await {
        Ok(events) => (StatusCode::OK, Json(json!({ "events": events }))).into_response(),
        Err(response) => response,
    }
}

pub async fn event_lines(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((session_id, event_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| {
        record.session.lines_for_event(&event_id)
    })
    .await
    {
        Ok(Some(lines)) => (
            StatusCode::OK,
            Json(json!({ "eventID": event_id, "lines": lines })),
        )
            .into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "EVENT_NOT_FOUND",
            format!("Event not found: {event_id}"),
        ),
        Err(response) => response,
    }
}

pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| {
        record.session.search(&params.q)
    })
    .await
    {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(response) => response,
    }
}

pub async fn event_types(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match with_session(&state, &headers, &session_id, |record| {
        record.session.event_types()
    })
    .await
    {
        Ok(types) => (StatusCode::OK, Json(json!({ "eventTypes": types }))).into_response(),
        Err(response) => response,
    }
}
