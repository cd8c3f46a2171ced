//! Host shell abstraction.
//!
//! The host shell owns the window, delivers named drag-and-drop
//! notifications, and exposes OS-level capabilities (reading files, opening
//! paths) as plugin modules plus a generic command channel. The rest of the
//! application only talks to it through [`HostContext`], which is decided
//! once at startup and is either attached to a real shell or detached.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod bus;
pub mod opener;
pub mod reader;
pub mod terminal;

/// Result type for host capability calls.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Failures reported by the host shell or its capability wrappers.
#[derive(Debug, Error)]
pub enum HostError {
    /// No usable export was found for a capability.
    #[error("capability not found: {0}")]
    CapabilityNotFound(String),

    /// A plugin module could not be loaded at all.
    #[error("plugin unavailable: {0}")]
    PluginUnavailable(String),

    /// The command channel has no handler registered under this name.
    #[error("unknown host command: {0}")]
    CommandNotFound(String),

    /// A capability was called with arguments it cannot use.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Subscribing or unsubscribing failed.
    #[error("subscription error: {0}")]
    Subscription(String),

    /// Filesystem or process errors from the capability itself.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Any other failure raised while running a capability.
    #[error("{0}")]
    Invocation(String),
}

/// A value returned from a host function.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Unit,
    Text(String),
    Bytes(Vec<u8>),
    #[allow(dead_code)]
    Json(Value),
}

/// A callable exported by a host plugin or registered as a host command.
#[async_trait]
pub trait HostFunction: Send + Sync {
    async fn call(&self, args: Value) -> HostResult<HostValue>;
}

struct FnExport<F>(F);

#[async_trait]
impl<F, Fut> HostFunction for FnExport<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = HostResult<HostValue>> + Send,
{
    async fn call(&self, args: Value) -> HostResult<HostValue> {
        (self.0)(args).await
    }
}

/// Wrap an async closure as a [`HostFunction`].
pub fn host_fn<F, Fut>(f: F) -> Arc<dyn HostFunction>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HostResult<HostValue>> + Send + 'static,
{
    Arc::new(FnExport(f))
}

/// One entry in a plugin module's export table.
#[derive(Clone)]
pub enum Export {
    Function(Arc<dyn HostFunction>),
    #[allow(dead_code)]
    Value(Value),
}

impl Export {
    /// The export as a callable, if it is one.
    pub fn as_function(&self) -> Option<Arc<dyn HostFunction>> {
        match self {
            Export::Function(f) => Some(Arc::clone(f)),
            Export::Value(_) => None,
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Function(_) => f.write_str("Function(..)"),
            Export::Value(v) => f.debug_tuple("Value").field(v).finish(),
        }
    }
}

/// A loaded host plugin: a table of exports keyed by dotted path
/// (`"open"`, `"default.open"`, `"default"`), plus an optional callable
/// for the module itself.
///
/// The shape of this table has varied between host releases, so consumers
/// probe it through an ordered list of candidate paths instead of assuming
/// one layout.
#[derive(Clone, Default)]
pub struct PluginModule {
    name: String,
    exports: BTreeMap<String, Export>,
    call: Option<Arc<dyn HostFunction>>,
}

impl PluginModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_function(mut self, path: &str, f: Arc<dyn HostFunction>) -> Self {
        self.exports.insert(path.to_string(), Export::Function(f));
        self
    }

    #[allow(dead_code)]
    pub fn with_value(mut self, path: &str, value: Value) -> Self {
        self.exports.insert(path.to_string(), Export::Value(value));
        self
    }

    /// Make the module itself callable.
    #[allow(dead_code)]
    pub fn with_call(mut self, f: Arc<dyn HostFunction>) -> Self {
        self.call = Some(f);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn export(&self, path: &str) -> Option<&Export> {
        self.exports.get(path)
    }

    /// The export at `path`, if it exists and is callable.
    pub fn function(&self, path: &str) -> Option<Arc<dyn HostFunction>> {
        self.export(path).and_then(Export::as_function)
    }

    /// The module-level callable, if any.
    pub fn module_call(&self) -> Option<Arc<dyn HostFunction>> {
        self.call.clone()
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginModule")
            .field("name", &self.name)
            .field("exports", &self.exports)
            .field("callable", &self.call.is_some())
            .finish()
    }
}

/// Where a subscription listens: every emit of the name, or only emits
/// targeted at the application window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Window,
}

/// A named event delivered from the host shell.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub name: String,
    /// Scope of the subscription this copy was delivered to.
    pub scope: Scope,
    /// Opaque payload; `Value::Null` when the event carries none.
    pub payload: Value,
}

/// Handle used to release a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Callback invoked for each delivered notification.
pub type NotificationSink = Arc<dyn Fn(Notification) + Send + Sync>;

/// The host shell the panel runs inside.
#[async_trait]
pub trait HostShell: Send + Sync {
    /// Register `sink` for notifications named `name` in `scope`.
    fn subscribe(
        &self,
        scope: Scope,
        name: &str,
        sink: NotificationSink,
    ) -> HostResult<SubscriptionId>;

    /// Release a subscription.
    fn unsubscribe(&self, id: SubscriptionId) -> HostResult<()>;

    /// Load a plugin module by name (`"fs"`, `"opener"`).
    async fn load_plugin(&self, name: &str) -> HostResult<PluginModule>;

    /// Invoke a named command on the generic command channel.
    async fn invoke(&self, command: &str, args: Value) -> HostResult<HostValue>;
}

/// Whether the panel runs inside a host shell.
///
/// Decided once at startup; a detached context turns every host-dependent
/// component into a no-op.
#[derive(Clone, Default)]
pub enum HostContext {
    Attached(Arc<dyn HostShell>),
    #[default]
    Detached,
}

impl HostContext {
    /// Attach to `shell` when `available`, otherwise stay detached.
    pub fn detect(available: bool, shell: impl FnOnce() -> Arc<dyn HostShell>) -> Self {
        if available {
            HostContext::Attached(shell())
        } else {
            HostContext::Detached
        }
    }

    pub fn shell(&self) -> Option<&Arc<dyn HostShell>> {
        match self {
            HostContext::Attached(shell) => Some(shell),
            HostContext::Detached => None,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, HostContext::Attached(_))
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostContext::Attached(_) => f.write_str("HostContext::Attached"),
            HostContext::Detached => f.write_str("HostContext::Detached"),
        }
    }
}
