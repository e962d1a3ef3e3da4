use std::sync::Arc;

use kite_core::{HttpRequest, HttpResponse, StatusCode};

use super::{serve_page, User, UserRepository, HOME_PAGE};
use crate::controller::Controller;
use crate::error::ServerResult;
use crate::static_files::StaticResourceStore;

const REGISTER_PAGE: &str = "/register.html";

/// `/register`: sign-up form and account creation
pub struct RegisterController {
    store: Arc<dyn StaticResourceStore>,
    users: Arc<UserRepository>,
}

impl RegisterController {
    pub fn new(store: Arc<dyn StaticResourceStore>, users: Arc<UserRepository>) -> Self {
        Self { store, users }
    }
}

impl Controller for RegisterController {
    fn matched_path(&self) -> &str {
        "/register"
    }

    fn do_get(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        serve_page(self.store.as_ref(), REGISTER_PAGE, response)
    }

    fn do_post(&self, request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        let mut form = request.form_body();
        let fields = (form.remove("account"), form.remove("password"), form.remove("email"));
        let (Some(account), Some(password), Some(email)) = fields else {
            response.reset(StatusCode::BAD_REQUEST);
            return Ok(());
        };
        if account.is_empty() || password.is_empty() {
            response.reset(StatusCode::BAD_REQUEST);
            return Ok(());
        }

        if !self.users.save(User::new(account, password, email))? {
            response.reset(StatusCode::BAD_REQUEST);
            return Ok(());
        }

        response.redirect(HOME_PAGE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_files::FsResourceStore;
    use kite_core::HttpParser;

    fn controller() -> (RegisterController, Arc<UserRepository>, tempfile::TempDir) {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("register.html"), "<form>register</form>").unwrap();
        let users = Arc::new(UserRepository::seeded());
        let controller =
            RegisterController::new(Arc::new(FsResourceStore::new(root.path())), users.clone());
        (controller, users, root)
    }

    fn post(controller: &RegisterController, body: &str) -> HttpResponse {
        let raw = format!(
            "POST /register HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let request = HttpParser::new().parse_request(raw.as_bytes()).unwrap();
        let mut response = HttpResponse::new();
        controller.service(&request, &mut response).unwrap();
        response
    }

    #[test]
    fn test_get_serves_form() {
        let (controller, _, _root) = controller();
        let request = HttpParser::new()
            .parse_request(b"GET /register HTTP/1.1\r\n\r\n")
            .unwrap();
        let mut response = HttpResponse::new();
        controller.service(&request, &mut response).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), b"<form>register</form>");
    }

    #[test]
    fn test_register_stores_user() {
        let (controller, users, _root) = controller();
        let response = post(&controller, "account=kite&password=secret&email=kite@example.com");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.header("Location"), Some(HOME_PAGE));

        let user = users.find_by_account("kite").unwrap().unwrap();
        assert!(user.check_password("secret"));
        assert_eq!(user.email(), "kite@example.com");
    }

    #[test]
    fn test_missing_fields_are_bad_request() {
        let (controller, users, _root) = controller();

        for body in [
            "account=kite&password=secret",
            "password=secret&email=a@b.c",
            "account=&password=x&email=e",
        ] {
            let response = post(&controller, body);
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        }
        assert!(users.find_by_account("kite").unwrap().is_none());
    }

    #[test]
    fn test_taken_account_is_bad_request() {
        let (controller, users, _root) = controller();
        let response = post(&controller, "account=gugu&password=other&email=x@example.com");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(users.find_by_account("gugu").unwrap().unwrap().check_password("password"));
    }
}
