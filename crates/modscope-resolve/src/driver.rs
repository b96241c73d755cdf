//! Resolving a whole program in dependency order
//!
//! Modules are grouped into dependency layers. Every module of a layer reads
//! the same environment snapshot, which only holds modules from earlier layers,
//! so a layer can be resolved in parallel and committed afterwards. A module
//! that fails blocks everything depending on it; unrelated modules still
//! commit. Internal errors abort the whole run.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use modscope_core::{
    Declaration, DeclarationRef, Env, Exports, Imports, ModuleGraph, ModuleName, ResolveConfig,
    ResolveError,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::diagnostics::{ResolveFailure, Resolved, Warning};
use crate::{resolve_module_exports, ModuleInput};

/// A module ready for export resolution
#[derive(Debug, Clone)]
pub struct ModuleUnit {
    pub name: ModuleName,
    pub declarations: Vec<Declaration>,
    /// `None` when the module has no export list
    pub exports: Option<Vec<DeclarationRef>>,
    pub imports: Imports,
    pub dependencies: Vec<ModuleName>,
}

impl ModuleUnit {
    pub fn new(name: impl Into<ModuleName>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
            exports: None,
            imports: Imports::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn input(&self) -> ModuleInput<'_> {
        ModuleInput {
            name: &self.name,
            declarations: &self.declarations,
            imports: &self.imports,
            exports: self.exports.as_deref(),
        }
    }
}

/// Outcome of resolving a set of modules
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Base environment plus every module that resolved
    pub env: Env,
    pub warnings: BTreeMap<ModuleName, Vec<Warning>>,
    pub failures: BTreeMap<ModuleName, ResolveError>,
    /// Modules skipped because something they depend on failed
    pub blocked: BTreeSet<ModuleName>,
}

impl BuildReport {
    fn new(env: Env) -> Self {
        Self {
            env,
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.blocked.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(Vec::len).sum()
    }

    fn record(
        &mut self,
        graph: &ModuleGraph,
        name: ModuleName,
        outcome: Result<Resolved<Exports>, ResolveFailure>,
    ) -> Result<(), ResolveError> {
        match outcome {
            Ok(resolved) => {
                if !resolved.warnings.is_empty() {
                    self.warnings.insert(name.clone(), resolved.warnings);
                }
                self.env.commit(name, resolved.value)?;
            }
            Err(failure) => {
                if failure.error.is_internal() {
                    tracing::error!("driver: aborting, {}", failure.error);
                    return Err(failure.error);
                }
                if !failure.warnings.is_empty() {
                    self.warnings.insert(name.clone(), failure.warnings);
                }
                let dependents = graph.transitive_dependents(&name);
                if !dependents.is_empty() {
                    tracing::warn!(
                        "driver: {} failed, blocking {} dependent modules",
                        name,
                        dependents.len()
                    );
                }
                self.blocked.extend(dependents);
                self.failures.insert(name, failure.error);
            }
        }
        Ok(())
    }
}

struct Plan {
    graph: ModuleGraph,
    layers: Vec<Vec<ModuleName>>,
    units: HashMap<ModuleName, Arc<ModuleUnit>>,
}

impl Plan {
    fn new(units: Vec<ModuleUnit>, base_env: &Env) -> Result<Self, ResolveError> {
        let mut graph = ModuleGraph::new();
        let mut by_name = HashMap::new();
        for unit in units {
            if base_env.contains(&unit.name) || by_name.contains_key(&unit.name) {
                return Err(ResolveError::Internal(format!(
                    "module {} scheduled for resolution twice",
                    unit.name
                )));
            }
            graph.add_module(unit.name.clone());
            by_name.insert(unit.name.clone(), Arc::new(unit));
        }

        for unit in by_name.values() {
            for dep in &unit.dependencies {
                if !by_name.contains_key(dep) && !base_env.contains(dep) {
                    return Err(ResolveError::Internal(format!(
                        "dependency {} of {} is neither scheduled nor resolved",
                        dep, unit.name
                    )));
                }
                graph.add_dependency(&unit.name, dep);
            }
        }

        let layers = graph.layers()?;
        Ok(Self {
            graph,
            layers,
            units: by_name,
        })
    }

    fn unit(&self, name: &ModuleName) -> Result<Arc<ModuleUnit>, ResolveError> {
        self.units
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::Internal(format!("module {} missing from build plan", name)))
    }
}

/// Resolve `units` one after another in dependency order
pub fn resolve_program(
    units: Vec<ModuleUnit>,
    config: &ResolveConfig,
    base_env: Env,
) -> Result<BuildReport, ResolveError> {
    let plan = Plan::new(units, &base_env)?;
    let mut report = BuildReport::new(base_env);

    for layer in &plan.layers {
        for name in layer {
            if report.blocked.contains(name) {
                continue;
            }
            let unit = plan.unit(name)?;
            let outcome = resolve_module_exports(&report.env, unit.input(), config);
            report.record(&plan.graph, name.clone(), outcome)?;
        }
    }

    tracing::info!(
        "driver: resolved {} modules, {} failed, {} blocked",
        report.env.len(),
        report.failures.len(),
        report.blocked.len()
    );
    Ok(report)
}

/// Resolve `units` layer by layer, running the modules of each layer on the
/// blocking thread pool
///
/// At most `config.max_parallel_modules` modules run at once. Results of a
/// layer are committed in name order, so the report does not depend on
/// scheduling.
pub async fn resolve_program_concurrent(
    units: Vec<ModuleUnit>,
    config: &ResolveConfig,
    base_env: Env,
) -> Result<BuildReport, ResolveError> {
    let plan = Plan::new(units, &base_env)?;
    let mut report = BuildReport::new(base_env);
    let config = Arc::new(config.clone());
    let permits = Arc::new(Semaphore::new(config.max_parallel_modules.max(1)));

    for (depth, layer) in plan.layers.iter().enumerate() {
        let snapshot = Arc::new(report.env.clone());
        let mut tasks = JoinSet::new();

        for name in layer {
            if report.blocked.contains(name) {
                continue;
            }
            let unit = plan.unit(name)?;
            let env = Arc::clone(&snapshot);
            let config = Arc::clone(&config);
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| ResolveError::Internal(format!("resolver permits closed: {}", e)))?;
            tasks.spawn_blocking(move || {
                let _permit = permit;
                let outcome = resolve_module_exports(&env, unit.input(), &config);
                (unit.name.clone(), outcome)
            });
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let result = joined.map_err(|e| ResolveError::Internal(format!("resolver task failed: {}", e)))?;
            results.push(result);
        }
        results.sort_by(|a, b| a.0.cmp(&b.0));

        tracing::debug!("driver: layer {} resolved {} modules", depth, results.len());
        for (name, outcome) in results {
            report.record(&plan.graph, name, outcome)?;
        }
    }

    tracing::info!(
        "driver: resolved {} modules, {} failed, {} blocked",
        report.env.len(),
        report.failures.len(),
        report.blocked.len()
    );
    Ok(report)
}
