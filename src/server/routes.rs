//! Request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::agent_loop::AgentState;
use crate::error::AlfredError;
use crate::session::SessionData;
use crate::types::ModelMessage;
use crate::uploads::UploadKind;

type AppStateArc = Arc<AppState>;

pub const SESSION_COOKIE: &str = "session_id";

const FALLBACK_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Alfred</title></head>
<body>
<h1>Alfred</h1>
<form id="ask" enctype="multipart/form-data">
  <input name="query" placeholder="Ask Alfred" size="60" required>
  <input name="file" type="file" accept=".png,.jpg,.jpeg,.csv">
  <button>Send</button>
</form>
<button id="clear-csv">Clear CSV</button>
<button id="clear-session">Clear session</button>
<pre id="out"></pre>
<script>
const out = document.getElementById("out");
document.getElementById("ask").onsubmit = async (e) => {
  e.preventDefault();
  const res = await fetch("/query", { method: "POST", body: new FormData(e.target) });
  const body = await res.json();
  out.textContent = res.ok ? body.response + (body.loaded_csv ? "\n\nCSV: " + body.loaded_csv : "") : body.detail;
};
for (const [id, path] of [["clear-csv", "/clear_csv"], ["clear-session", "/clear_session"]]) {
  document.getElementById(id).onclick = async () => {
    out.textContent = (await (await fetch(path, { method: "POST" })).json()).message;
  };
}
</script>
</body>
</html>
"#;

/// Body of a successful `/query`.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
    pub loaded_csv: Option<String>,
}

/// Value of the `session_id` cookie, if the client sent one.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn schedule_sweep(state: &AppStateArc) {
    let state = state.clone();
    tokio::spawn(async move {
        let removed = state.uploads.sweep(state.upload_max_age).await;
        if removed > 0 {
            info!(removed, "swept expired uploads");
        }
    });
}

pub async fn index(State(state): State<AppStateArc>, headers: HeaderMap) -> Response {
    let session_id = session_cookie(&headers).unwrap_or_else(|| Uuid::new_v4().to_string());
    let page = match tokio::fs::read_to_string(&state.index_html).await {
        Ok(page) => page,
        Err(e) => {
            warn!(path = %state.index_html.display(), error = %e, "serving built-in page");
            FALLBACK_PAGE.to_string()
        }
    };

    let mut response = Html(page).into_response();
    if let Ok(cookie) = HeaderValue::from_str(&format!("{SESSION_COOKIE}={session_id}; Path=/")) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

struct QueryForm {
    query: String,
    file: Option<(String, Vec<u8>)>,
}

async fn read_form(mut multipart: Multipart) -> Result<QueryForm, ApiError> {
    let mut query = None;
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("query") => query = Some(field.text().await?),
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an unnamed empty part when no file was chosen.
                if !name.is_empty() {
                    file = Some((name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }
    let query = query.ok_or_else(|| ApiError::BadRequest("Missing form field: query".into()))?;
    Ok(QueryForm { query, file })
}

pub async fn query(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<QueryResponse>, ApiError> {
    let form = read_form(multipart).await?;
    info!(query = %form.query, "Received query");

    let cookie = session_cookie(&headers);
    let persist = cookie.is_some();
    let session_id = cookie.unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut session = state.sessions.load(&session_id).await;

    let mut input_file: Option<PathBuf> = None;
    if let Some((name, bytes)) = &form.file {
        let upload = state.uploads.save(name, bytes).await?;
        match upload.kind {
            UploadKind::Image => {
                info!(path = %upload.path.display(), "Image uploaded");
                input_file = Some(upload.path);
            }
            UploadKind::Csv => {
                info!(path = %upload.path.display(), "CSV uploaded");
                session.input_csv = Some(upload.path);
                if persist {
                    state.sessions.save(&session_id, session.clone()).await;
                }
            }
        }
    }

    let mut messages = session.messages;
    messages.push(ModelMessage::user(form.query));
    let agent_state = AgentState {
        messages,
        input_file,
        input_csv: session.input_csv,
    };

    let outcome = state.agent.run(agent_state).await;
    let response = outcome.response().ok_or(AlfredError::EmptyResponse)?;
    info!(session_id = %session_id, iterations = outcome.iterations, "Extracted response");

    let input_csv = outcome.state.input_csv;
    let loaded_csv = input_csv.as_ref().map(|p| p.display().to_string());
    if persist {
        state
            .sessions
            .save(
                &session_id,
                SessionData {
                    input_csv,
                    messages: outcome.state.messages,
                },
            )
            .await;
    }

    schedule_sweep(&state);
    Ok(Json(QueryResponse {
        response,
        loaded_csv,
    }))
}

pub async fn clear_csv(State(state): State<AppStateArc>, headers: HeaderMap) -> Json<Value> {
    if let Some(id) = session_cookie(&headers) {
        state.sessions.clear_csv(&id).await;
    }
    schedule_sweep(&state);
    Json(json!({ "message": "CSV cleared" }))
}

pub async fn clear_session(State(state): State<AppStateArc>, headers: HeaderMap) -> Json<Value> {
    if let Some(id) = session_cookie(&headers) {
        state.sessions.clear(&id).await;
    }
    schedule_sweep(&state);
    Json(json!({ "message": "Session cleared" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
