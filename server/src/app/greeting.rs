use kite_core::{HttpRequest, HttpResponse};

use crate::controller::Controller;
use crate::error::ServerResult;

/// `GET /` greeting
pub struct GreetingController;

impl Controller for GreetingController {
    fn matched_path(&self) -> &str {
        "/"
    }

    fn do_get(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
        response.set_body("Hello world!");
        Ok(())
    }
}
