//! `search`.

use std::collections::HashMap;

use crate::mock_server::state::MockState;

use super::cdata;

pub fn search(state: &MockState, params: &HashMap<String, String>) -> String {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    let cases = state.search(query);

    let mut body = format!(r#"<cases count="{}">"#, cases.len());
    for case in cases {
        body.push_str(&format!(
            r#"<case ixBug="{ix}" operations="edit,assign,resolve"><sTitle>{title}</sTitle><sProject>{project}</sProject></case>"#,
            ix = case.ix_bug,
            title = cdata(&case.title),
            project = cdata(&case.project),
        ));
    }
    body.push_str("</cases>");
    body
}
