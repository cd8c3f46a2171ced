use std::sync::Arc;

use serde_json::json;

use super::{HostContext, HostError, HostFunction, HostResult, HostValue, PluginModule};

/// Name of the host's filesystem plugin.
pub const FS_PLUGIN: &str = "fs";

/// Text-read export paths, in priority order.
const TEXT_READ_EXPORTS: &[&str] = &["read_text_file", "read_text", "default.read_text_file"];
/// Byte-read export paths, tried when no text-read export exists.
const BYTE_READ_EXPORTS: &[&str] = &["read_file", "default.read_file"];

#[derive(Clone)]
enum ReadAdapter {
    Text(Arc<dyn HostFunction>),
    Bytes(Arc<dyn HostFunction>),
    Unresolved,
}

/// Reads file text through the host's fs plugin.
///
/// The export to use is picked once, when the reader is built. A plugin
/// without a text-read export but with a byte-read export still works: the
/// bytes are decoded as UTF-8 with invalid sequences replaced.
#[derive(Clone)]
pub struct FileReader {
    adapter: ReadAdapter,
}

impl FileReader {
    /// Pick the first usable read export of `module`.
    pub fn resolve(module: &PluginModule) -> Self {
        let first = |paths: &[&str]| paths.iter().find_map(|p| module.function(p));
        let adapter = if let Some(f) = first(TEXT_READ_EXPORTS) {
            ReadAdapter::Text(f)
        } else if let Some(f) = first(BYTE_READ_EXPORTS) {
            ReadAdapter::Bytes(f)
        } else {
            ReadAdapter::Unresolved
        };
        Self { adapter }
    }

    /// A reader with no backing capability; every read fails.
    pub fn unresolved() -> Self {
        Self {
            adapter: ReadAdapter::Unresolved,
        }
    }

    /// Load the fs plugin from the host and resolve against it.
    pub async fn load(host: &HostContext) -> Self {
        let Some(shell) = host.shell() else {
            return Self::unresolved();
        };
        match shell.load_plugin(FS_PLUGIN).await {
            Ok(module) => {
                let reader = Self::resolve(&module);
                if !reader.is_resolved() {
                    tracing::warn!(plugin = module.name(), "plugin exposes no read function");
                }
                reader
            }
            Err(e) => {
                tracing::warn!(error = %e, "fs plugin failed to load");
                Self::unresolved()
            }
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.adapter, ReadAdapter::Unresolved)
    }

    /// Return the full text of the file at `path`.
    pub async fn read_text(&self, path: &str) -> HostResult<String> {
        match &self.adapter {
            ReadAdapter::Text(f) => match f.call(json!(path)).await? {
                HostValue::Text(text) => Ok(text),
                HostValue::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
                other => Err(unexpected(other)),
            },
            ReadAdapter::Bytes(f) => match f.call(json!(path)).await? {
                HostValue::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
                HostValue::Text(text) => Ok(text),
                other => Err(unexpected(other)),
            },
            ReadAdapter::Unresolved => Err(HostError::CapabilityNotFound(format!(
                "{FS_PLUGIN} plugin read API not found"
            ))),
        }
    }
}

fn unexpected(value: HostValue) -> HostError {
    HostError::Invocation(format!("fs plugin returned unexpected value: {value:?}"))
}
