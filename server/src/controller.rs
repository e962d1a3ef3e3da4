//! Controller trait and the built-in not-found controller
//!
//! A controller is bound to one path and answers every method through
//! [`Controller::service`]. The per-method hooks default to
//! `405 Method Not Allowed`, so implementors override only what they support.

use std::sync::Arc;

use kite_core::{HttpRequest, HttpResponse, Method, StatusCode};

use crate::error::ServerResult;
use crate::static_files::StaticResourceStore;

/// Page served with 404 responses when the static root provides one
pub const NOT_FOUND_PAGE: &str = "/404.html";

/// Request handler bound to one path
pub trait Controller: Send + Sync {
    /// Path this controller is registered under
    fn matched_path(&self) -> &str;

    /// Dispatch on the request method
    fn service(&self, request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        match request.method() {
            Method::GET => self.do_get(request, response),
            Method::POST => self.do_post(request, response),
            Method::PUT => self.do_put(request, response),
            Method::PATCH => self.do_patch(request, response),
            Method::DELETE => self.do_delete(request, response),
            Method::HEAD => self.do_head(request, response),
            Method::OPTIONS => self.do_options(request, response),
            Method::CONNECT => self.do_connect(request, response),
            Method::TRACE => self.do_trace(request, response),
        }
    }

    fn do_get(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_post(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_put(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_patch(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_delete(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_head(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_options(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_connect(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }

    fn do_trace(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        method_not_allowed(response)
    }
}

/// Bare 405 with an empty body
fn method_not_allowed(response: &mut HttpResponse) -> ServerResult<()> {
    response.reset(StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

/// Fallback for paths that are neither static nor registered
///
/// Answers every method with 404, using `/404.html` from the static root as
/// the body when it exists.
pub struct NotFoundController {
    store: Arc<dyn StaticResourceStore>,
}

impl NotFoundController {
    pub fn new(store: Arc<dyn StaticResourceStore>) -> Self {
        Self { store }
    }
}

impl Controller for NotFoundController {
    fn matched_path(&self) -> &str {
        "<not found>"
    }

    fn service(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        response.reset(StatusCode::NOT_FOUND);
        if self.store.exists(NOT_FOUND_PAGE) {
            let page = self.store.read(NOT_FOUND_PAGE)?;
            response
                .set_content_type(self.store.content_type_for(NOT_FOUND_PAGE))
                .set_body(page);
        }
        Ok(())
    }
}
