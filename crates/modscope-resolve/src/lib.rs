//! Export resolution for a single module
//!
//! Given a module's declarations, its import tables and the environment of
//! modules it depends on, compute the symbol table the module publishes:
//!
//! ```text
//! declarations -> candidate set -> export list filter -> module re-exports -> Exports
//!                                                             |
//!                                                   duplicate ref warnings
//! ```

pub mod conflict;
pub mod diagnostics;
pub mod driver;
pub mod exportable;
pub mod filter;
pub mod namespace;
pub mod reexport;

use modscope_core::{Declaration, DeclarationRef, Env, Exports, Imports, ModuleName, ResolveConfig, ResolveError};

pub use diagnostics::{Diagnostics, ResolveFailure, Resolved, Warning};
pub use driver::{resolve_program, resolve_program_concurrent, BuildReport, ModuleUnit};
pub use exportable::build_exportable;
pub use filter::filter_exports;
pub use reexport::{elaborate_exports, ReexportContext};

/// Everything the pass needs to know about the module being resolved
#[derive(Debug, Clone, Copy)]
pub struct ModuleInput<'a> {
    pub name: &'a ModuleName,
    pub declarations: &'a [Declaration],
    pub imports: &'a Imports,
    /// `None` when the module has no export list
    pub exports: Option<&'a [DeclarationRef]>,
}

/// Compute the published exports of one module
///
/// Without an export list every declared name is exported. With one, the
/// candidate set is narrowed to the listed names, module re-exports are added
/// on top, and repeated entries are reported as warnings. On failure no export
/// table is produced, but warnings gathered so far are still returned.
#[tracing::instrument(level = "debug", skip_all, fields(module = %input.name))]
pub fn resolve_module_exports(
    env: &Env,
    input: ModuleInput<'_>,
    config: &ResolveConfig,
) -> Result<Resolved<Exports>, ResolveFailure> {
    let mut diagnostics = Diagnostics::new();
    match resolve_with(env, input, config, &mut diagnostics) {
        Ok(exports) => Ok(Resolved::new(exports, diagnostics)),
        Err(error) => {
            tracing::debug!("resolve: {} failed: {}", input.name, error);
            Err(ResolveFailure::new(error, diagnostics))
        }
    }
}

fn resolve_with(
    env: &Env,
    input: ModuleInput<'_>,
    config: &ResolveConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Exports, ResolveError> {
    let candidate = build_exportable(input.name, input.declarations);

    let Some(refs) = input.exports else {
        return Ok(candidate);
    };

    let filtered = filter_exports(input.name, &candidate, refs)?;
    let ctx = ReexportContext {
        env,
        module: input.name,
        imports: input.imports,
        config,
    };
    let exports = elaborate_exports(ctx, &candidate, filtered, refs, diagnostics)?;

    if config.report_duplicate_refs {
        diagnostics::warn_duplicate_refs(input.name, refs, diagnostics);
    }
    Ok(exports)
}
