//! # KiteServer
//!
//! A small HTTP/1.1 server: each connection carries one request, routed by
//! exact path to a [`Controller`], with static files under a configured root
//! taking precedence over registered controllers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kite_server::{Controller, HttpRequest, HttpResponse, KiteConfig, RequestMapping, Server, ServerResult};
//!
//! struct Hello;
//!
//! impl Controller for Hello {
//!     fn matched_path(&self) -> &str {
//!         "/"
//!     }
//!
//!     fn do_get(&self, _request: &HttpRequest, response: &mut HttpResponse) -> ServerResult<()> {
//!         response.set_body("Hello, World!");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut mapping = RequestMapping::new();
//!     mapping.register(Hello);
//!
//!     let server = Server::new(KiteConfig::default(), mapping)?;
//!     Ok(server.listen().await?)
//! }
//! ```

pub mod app;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod mapping;
pub mod processor;
pub mod server;
pub mod static_files;

// Re-export main types for convenient use
pub use config::KiteConfig;
pub use controller::{Controller, NotFoundController};
pub use dispatcher::Dispatcher;
pub use error::{ServerError, ServerResult};
pub use mapping::RequestMapping;
pub use processor::Http11Processor;
pub use server::Server;
pub use static_files::{
    ContentTypes, FsResourceStore, StaticResourceController, StaticResourceStore,
};

// Re-export important types from core crate for convenience
pub use kite_core::{HttpRequest, HttpResponse, Method, StatusCode};
