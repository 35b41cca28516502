//! `listProjects`.

use crate::mock_server::state::MockState;

use super::cdata;

pub fn list_projects(state: &MockState) -> String {
    let mut body = String::from("<projects>");
    for project in &state.projects {
        body.push_str(&format!(
            "<project><ixProject>{}</ixProject><sProject>{}</sProject></project>",
            project.ix_project,
            cdata(&project.name),
        ));
    }
    body.push_str("</projects>");
    body
}
