use std::sync::Arc;

use kite_core::{HttpRequest, HttpResponse, SESSION_COOKIE};
use tracing::info;

use super::{serve_page, SessionManager, UserRepository, HOME_PAGE, UNAUTHORIZED_PAGE};
use crate::controller::Controller;
use crate::error::ServerResult;
use crate::static_files::StaticResourceStore;

const LOGIN_PAGE: &str = "/login.html";

/// `/login`: login form and credential check
pub struct LoginController {
    store: Arc<dyn StaticResourceStore>,
    users: Arc<UserRepository>,
    sessions: Arc<SessionManager>,
}

impl LoginController {
    pub fn new(
        store: Arc<dyn StaticResourceStore>,
        users: Arc<UserRepository>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            store,
            users,
            sessions,
        }
    }

    fn has_session(&self, request: &HttpRequest) -> ServerResult<bool> {
        match request.session_id() {
            Some(id) => Ok(self.sessions.find(id)?.is_some()),
            None => Ok(false),
        }
    }
}

impl Controller for LoginController {
    fn matched_path(&self) -> &str {
        "/login"
    }

    fn do_get(&self, request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        if self.has_session(request)? {
            response.redirect(HOME_PAGE);
            return Ok(());
        }
        serve_page(self.store.as_ref(), LOGIN_PAGE, response)
    }

    fn do_post(&self, request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        let form = request.form_body();
        let (Some(account), Some(password)) = (form.get("account"), form.get("password")) else {
            response.redirect(UNAUTHORIZED_PAGE);
            return Ok(());
        };

        match self.users.find_by_account(account)? {
            Some(user) if user.check_password(password) => {
                let session_id = self.sessions.create(user.account())?;
                info!("Login succeeded for {}", user.account());
                response
                    .redirect(HOME_PAGE)
                    .set_cookie(SESSION_COOKIE, session_id);
            }
            _ => {
                info!("Login failed for {}", account);
                response.redirect(UNAUTHORIZED_PAGE);
            }
        }
        Ok(())
    }
}
