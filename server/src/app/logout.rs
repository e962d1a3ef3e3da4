use std::sync::Arc;

use kite_core::{HttpRequest, HttpResponse, SESSION_COOKIE};
use tracing::info;

use super::SessionManager;
use crate::controller::Controller;
use crate::error::ServerResult;

const LOGIN_PATH: &str = "/login";

/// `/logout`: close the caller's session and send them back to the login form
pub struct LogoutController {
    sessions: Arc<SessionManager>,
}

impl LogoutController {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

impl Controller for LogoutController {
    fn matched_path(&self) -> &str {
        "/logout"
    }

    fn do_get(&self, request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        if let Some(id) = request.session_id() {
            if self.sessions.remove(id)? {
                info!("Session {} closed", id);
            }
        }
        response.redirect(LOGIN_PATH).set_cookie(SESSION_COOKIE, "");
        Ok(())
    }
}
