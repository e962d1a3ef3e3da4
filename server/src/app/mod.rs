//! Demo application served by the `kite` binary
//!
//! A greeting page plus session-cookie login/logout and a registration flow
//! over an in-memory user store.

mod greeting;
mod login;
mod logout;
mod register;
mod session;
mod user;

use std::sync::Arc;

use kite_core::HttpResponse;

use crate::error::ServerResult;
use crate::mapping::RequestMapping;
use crate::static_files::StaticResourceStore;

pub use greeting::GreetingController;
pub use login::LoginController;
pub use logout::LogoutController;
pub use register::RegisterController;
pub use session::SessionManager;
pub use user::{User, UserRepository};

/// Page a successful login or registration lands on
pub const HOME_PAGE: &str = "/index.html";
/// Page shown after a failed login
pub const UNAUTHORIZED_PAGE: &str = "/401.html";

/// Build the registry with every demo controller
pub fn routes(
    store: Arc<dyn StaticResourceStore>,
    users: Arc<UserRepository>,
    sessions: Arc<SessionManager>,
) -> RequestMapping {
    let mut mapping = RequestMapping::new();
    mapping
        .register(GreetingController)
        .register(LoginController::new(
            store.clone(),
            users.clone(),
            sessions.clone(),
        ))
        .register(LogoutController::new(sessions))
        .register(RegisterController::new(store, users));
    mapping
}

/// Answer with a page from the static store
fn serve_page(
    store: &dyn StaticResourceStore,
    page: &str,
    response: &mut HttpResponse,
) -> ServerResult<()> {
    let contents = store.read(page)?;
    response
        .set_content_type(store.content_type_for(page))
        .set_body(contents);
    Ok(())
}
