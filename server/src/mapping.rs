//! Path -> controller registry

use std::sync::Arc;

use ahash::AHashMap;
use tracing::warn;

use crate::controller::Controller;

/// Controllers keyed by the exact path they serve
#[derive(Default)]
pub struct RequestMapping {
    controllers: AHashMap<String, Arc<dyn Controller>>,
}

impl RequestMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller under its matched path
    ///
    /// A second controller for the same path replaces the first.
    pub fn register<C: Controller + 'static>(&mut self, controller: C) -> &mut Self {
        self.register_shared(Arc::new(controller))
    }

    /// Register a controller that is shared with other owners
    pub fn register_shared(&mut self, controller: Arc<dyn Controller>) -> &mut Self {
        let path = controller.matched_path().to_string();
        if self.controllers.insert(path.clone(), controller).is_some() {
            warn!("Controller for {} registered twice; keeping the latest", path);
        }
        self
    }

    /// Exact-match lookup
    #[inline]
    pub fn get(&self, path: &str) -> Option<&dyn Controller> {
        self.controllers.get(path).map(|controller| controller.as_ref())
    }

    /// Number of registered controllers
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Registered paths, in no particular order
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.controllers.keys().map(String::as_str)
    }
}
