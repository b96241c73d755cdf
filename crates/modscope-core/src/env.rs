//! The environment of already-resolved modules
//!
//! Modules are committed in dependency order and a committed entry is never
//! replaced. Cloning an [`Env`] is cheap enough to hand every worker in a
//! dependency layer its own read-only snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ResolveError;
use crate::exports::Exports;
use crate::names::ModuleName;

#[derive(Debug, Clone, Default)]
pub struct Env {
    modules: HashMap<ModuleName, Arc<Exports>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the final exports of `module`
    ///
    /// Each slot is written exactly once; a second commit means the driver
    /// resolved a module twice.
    pub fn commit(&mut self, module: ModuleName, exports: Exports) -> Result<Arc<Exports>, ResolveError> {
        if self.modules.contains_key(&module) {
            return Err(ResolveError::Internal(format!(
                "module {} committed to the environment twice",
                module
            )));
        }
        let exports = Arc::new(exports);
        tracing::debug!("Env: committed {} ({} names)", module, exports.total_len());
        self.modules.insert(module, Arc::clone(&exports));
        Ok(exports)
    }

    pub fn get(&self, module: &ModuleName) -> Option<&Arc<Exports>> {
        self.modules.get(module)
    }

    /// Look up a module that import validation already proved exists
    pub fn expect_module(&self, module: &ModuleName) -> Result<&Exports, ResolveError> {
        self.modules
            .get(module)
            .map(Arc::as_ref)
            .ok_or_else(|| ResolveError::Internal(format!("module {} is missing from the environment", module)))
    }

    pub fn contains(&self, module: &ModuleName) -> bool {
        self.modules.contains_key(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_names(&self) -> impl Iterator<Item = &ModuleName> {
        self.modules.keys()
    }
}
