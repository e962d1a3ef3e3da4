//! Request path resolution
//!
//! Resolution order: a static resource under the static root, then a
//! registered controller, then the not-found controller. Resolution never
//! fails, and 405 is left to the resolved controller.

use std::sync::Arc;

use kite_core::Method;
use tracing::{debug, warn};

use crate::controller::{Controller, NotFoundController};
use crate::mapping::RequestMapping;
use crate::static_files::{StaticResourceController, StaticResourceStore};

/// Immutable routing table shared by every connection
pub struct Dispatcher {
    mapping: RequestMapping,
    store: Arc<dyn StaticResourceStore>,
    static_controller: StaticResourceController,
    not_found: NotFoundController,
}

impl Dispatcher {
    pub fn new(mapping: RequestMapping, store: Arc<dyn StaticResourceStore>) -> Self {
        Self {
            mapping,
            static_controller: StaticResourceController::new(store.clone()),
            not_found: NotFoundController::new(store.clone()),
            store,
        }
    }

    /// Pick the controller for a request
    pub fn resolve(&self, path: &str, method: Method) -> &dyn Controller {
        if self.store.exists(path) {
            debug!("{} {} -> static resource", method, path);
            return &self.static_controller;
        }

        match self.mapping.get(path) {
            Some(controller) => controller,
            None => {
                warn!("Handler not found for {} {}", method, path);
                &self.not_found
            }
        }
    }

    pub fn mapping(&self) -> &RequestMapping {
        &self.mapping
    }
}
