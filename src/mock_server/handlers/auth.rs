//! `logon` and `logoff`.

use std::collections::HashMap;

use crate::mock_server::state::MockState;

use super::{cdata, error};

/// FogBugz error code for rejected credentials.
const BAD_CREDENTIALS: u32 = 1;

pub fn logon(state: &mut MockState, params: &HashMap<String, String>) -> String {
    let email = params.get("email").map(String::as_str).unwrap_or_default();
    let password = params.get("password").map(String::as_str).unwrap_or_default();

    match state.logon(email, password) {
        Some(token) => format!("<token>{}</token>", cdata(&token)),
        None => error(BAD_CREDENTIALS, "Incorrect password or username"),
    }
}

pub fn logoff(state: &mut MockState, params: &HashMap<String, String>) -> String {
    if let Some(token) = params.get("token") {
        state.logoff(token);
    }
    String::new()
}
