use std::sync::Arc;

use serde_json::json;

use super::{HostContext, HostError, HostFunction, HostResult, HostValue, PluginModule};

/// Name of the host's opener plugin.
pub const OPENER_PLUGIN: &str = "opener";
/// Host command used when the plugin has no usable export.
pub const OPEN_PATH_COMMAND: &str = "open_path_cmd";

/// Export layouts the opener plugin has shipped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenerShape {
    /// `open` exported directly.
    Named,
    /// `open` nested under the default export.
    DefaultNamed,
    /// The default export itself is the function.
    DefaultCallable,
    /// The whole module is the function.
    ModuleCallable,
}

impl OpenerShape {
    /// Probe order.
    pub const PRIORITY: [OpenerShape; 4] = [
        OpenerShape::Named,
        OpenerShape::DefaultNamed,
        OpenerShape::DefaultCallable,
        OpenerShape::ModuleCallable,
    ];

    fn probe(self, module: &PluginModule) -> Option<Arc<dyn HostFunction>> {
        match self {
            OpenerShape::Named => module.function("open"),
            OpenerShape::DefaultNamed => module.function("default.open"),
            OpenerShape::DefaultCallable => module.function("default"),
            OpenerShape::ModuleCallable => module.module_call(),
        }
    }
}

/// Opens paths with the OS default application.
///
/// The plugin export is resolved once at construction. Any failure on the
/// plugin path (not loaded, nothing callable, or the call itself failing)
/// falls back to the `open_path_cmd` host command.
#[derive(Clone)]
pub struct Opener {
    host: HostContext,
    resolved: Option<(OpenerShape, Arc<dyn HostFunction>)>,
}

impl Opener {
    /// Build an opener from an already-loaded plugin module, if any.
    pub fn resolve(host: HostContext, module: Option<&PluginModule>) -> Self {
        let resolved = module.and_then(|m| {
            OpenerShape::PRIORITY
                .iter()
                .find_map(|shape| shape.probe(m).map(|f| (*shape, f)))
        });
        match &resolved {
            Some((shape, _)) => tracing::debug!(?shape, "opener export resolved"),
            None => tracing::debug!("no callable opener export, using {OPEN_PATH_COMMAND}"),
        }
        Self { host, resolved }
    }

    /// Load the opener plugin from the host and resolve against it.
    pub async fn load(host: HostContext) -> Self {
        let module = match host.shell() {
            Some(shell) => match shell.load_plugin(OPENER_PLUGIN).await {
                Ok(module) => Some(module),
                Err(e) => {
                    tracing::warn!(error = %e, "opener plugin failed to load");
                    None
                }
            },
            None => None,
        };
        Self::resolve(host, module.as_ref())
    }

    /// The export layout in use, or `None` when only the command fallback
    /// is available.
    pub fn shape(&self) -> Option<OpenerShape> {
        self.resolved.as_ref().map(|(shape, _)| *shape)
    }

    /// Open `target` with the default application.
    pub async fn open_path(&self, target: &str) -> HostResult<HostValue> {
        if let Some((shape, f)) = &self.resolved {
            match f.call(json!(target)).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(?shape, error = %e, target, "opener export failed, falling back");
                }
            }
        }
        self.fallback(target).await
    }

    async fn fallback(&self, target: &str) -> HostResult<HostValue> {
        let shell = self.host.shell().ok_or_else(|| {
            HostError::CapabilityNotFound(format!("{OPEN_PATH_COMMAND}: no host shell"))
        })?;
        shell
            .invoke(OPEN_PATH_COMMAND, json!({ "path": target }))
            .await
    }
}
