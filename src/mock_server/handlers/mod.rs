//! Request handling for the mock server.
//!
//! FogBugz serves every command from a single endpoint, so one axum handler
//! records the request and dispatches on the `cmd` parameter.

mod auth;
mod cases;
mod projects;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use quick_xml::escape::escape;
use tokio::sync::RwLock;

use crate::mock_server::state::{MockState, RecordedRequest};

/// FogBugz error code for an unknown command.
const UNKNOWN_COMMAND: u32 = 0;
/// FogBugz error code for a missing or expired token.
const NOT_LOGGED_ON: u32 = 3;

/// Any method, any path except `/health`.
///
/// `Form` reads the query string for GET and the urlencoded body for POST.
pub async fn dispatch(
    State(state): State<Arc<RwLock<MockState>>>,
    method: Method,
    uri: Uri,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let mut state = state.write().await;
    state.record(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        params: params.clone(),
    });

    if let Some((status, body)) = state.failure.clone() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, body).into_response();
    }

    let cmd = params.get("cmd").map(String::as_str).unwrap_or_default();
    if cmd == "logon" {
        return xml(auth::logon(&mut state, &params));
    }

    let authorized = params
        .get("token")
        .is_some_and(|token| state.is_valid_token(token));
    if !authorized {
        return xml(error(NOT_LOGGED_ON, "Not logged on"));
    }

    let body = match cmd {
        "logoff" => auth::logoff(&mut state, &params),
        "search" => cases::search(&state, &params),
        "listProjects" => projects::list_projects(&state),
        other => error(UNKNOWN_COMMAND, &format!("Unknown command: {other}")),
    };
    xml(body)
}

/// Wrap `inner` in the `<response>` envelope.
fn xml(inner: String) -> Response {
    let body = format!(r#"<?xml version="1.0" encoding="UTF-8"?><response>{inner}</response>"#);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        body,
    )
        .into_response()
}

fn error(code: u32, message: &str) -> String {
    format!(r#"<error code="{code}">{}</error>"#, escape(message))
}

/// Text wrapped in CDATA the way FogBugz emits string fields.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}
