//! The terminal as host shell.
//!
//! Terminals deliver files dragged onto the window as a bracketed paste of
//! their paths: shell-quoted (`'/a b.txt'`), backslash-escaped
//! (`/a\ b.txt`), or as `file://` URIs, separated by whitespace. The
//! terminal shell turns such a paste into a window-targeted `drag://drop`
//! plus the backend `file-drop` notification, and serves the `fs` and
//! `opener` plugins from the local OS.

use std::collections::HashMap;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use super::bus::{NotificationBus, Target};
use super::opener::{OPENER_PLUGIN, OPEN_PATH_COMMAND};
use super::reader::FS_PLUGIN;
use super::{
    host_fn, HostError, HostFunction, HostResult, HostShell, HostValue, NotificationSink,
    PluginModule, Scope, SubscriptionId,
};
use crate::drop::registry::{BACKEND_DROP, DRAG_DROP};

/// Set to any value to run without a host shell.
pub const DETACHED_ENV: &str = "DROPZONE_DETACHED";

/// Whether the process runs inside an interactive terminal that can act
/// as host shell.
pub fn probe_host_environment() -> bool {
    std::env::var_os(DETACHED_ENV).is_none()
        && std::io::stdin().is_terminal()
        && std::io::stdout().is_terminal()
}

/// Host shell backed by the controlling terminal and the local OS.
pub struct TerminalShell {
    bus: NotificationBus,
    commands: HashMap<&'static str, Arc<dyn HostFunction>>,
}

impl Default for TerminalShell {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalShell {
    pub fn new() -> Self {
        let mut commands: HashMap<&'static str, Arc<dyn HostFunction>> = HashMap::new();
        commands.insert(
            OPEN_PATH_COMMAND,
            host_fn(|args: Value| async move {
                let path = args
                    .get("path")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        HostError::InvalidArguments(format!("{OPEN_PATH_COMMAND} expects {{path}}"))
                    })?
                    .to_string();
                open_with_default_app(&path)
            }),
        );
        Self {
            bus: NotificationBus::new(),
            commands,
        }
    }

    /// Translate a terminal paste into drop notifications.
    ///
    /// Returns `false` (and emits nothing) when the pasted text is not a
    /// list of existing paths. A terminal reports nothing while files hover
    /// over it, so only the drop itself is ever emitted.
    pub fn handle_paste(&self, text: &str) -> bool {
        let Some(paths) = parse_dropped_paths(text) else {
            tracing::debug!(len = text.len(), "paste is not a file drop");
            return false;
        };
        tracing::info!(count = paths.len(), "files dropped");
        let payload = json!(paths);
        self.bus.emit(Target::Window, DRAG_DROP, payload.clone());
        self.bus.emit(Target::Window, BACKEND_DROP, payload);
        true
    }
}

#[async_trait]
impl HostShell for TerminalShell {
    fn subscribe(
        &self,
        scope: Scope,
        name: &str,
        sink: NotificationSink,
    ) -> HostResult<SubscriptionId> {
        Ok(self.bus.subscribe(scope, name, sink))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> HostResult<()> {
        self.bus.unsubscribe(id)
    }

    async fn load_plugin(&self, name: &str) -> HostResult<PluginModule> {
        match name {
            FS_PLUGIN => Ok(fs_plugin()),
            OPENER_PLUGIN => Ok(PluginModule::new(OPENER_PLUGIN).with_function(
                "open",
                host_fn(|args: Value| async move {
                    let path = args
                        .as_str()
                        .ok_or_else(|| HostError::InvalidArguments("open expects a path".into()))?
                        .to_string();
                    open_with_default_app(&path)
                }),
            )),
            other => Err(HostError::PluginUnavailable(other.to_string())),
        }
    }

    async fn invoke(&self, command: &str, args: Value) -> HostResult<HostValue> {
        let handler = self
            .commands
            .get(command)
            .ok_or_else(|| HostError::CommandNotFound(command.to_string()))?;
        handler.call(args).await
    }
}

fn path_arg(args: &Value) -> HostResult<PathBuf> {
    args.as_str()
        .map(PathBuf::from)
        .ok_or_else(|| HostError::InvalidArguments("expected a path string".into()))
}

fn fs_plugin() -> PluginModule {
    PluginModule::new(FS_PLUGIN)
        .with_function(
            "read_text_file",
            host_fn(|args: Value| async move {
                let path = path_arg(&args)?;
                Ok(HostValue::Text(tokio::fs::read_to_string(path).await?))
            }),
        )
        .with_function(
            "read_file",
            host_fn(|args: Value| async move {
                let path = path_arg(&args)?;
                Ok(HostValue::Bytes(tokio::fs::read(path).await?))
            }),
        )
}

/// Launch the OS default handler for `path` without waiting for it.
fn open_with_default_app(path: &str) -> HostResult<HostValue> {
    let mut cmd = open_command();
    cmd.arg(path);
    spawn_detached(cmd)
        .map_err(|e| HostError::Invocation(format!("failed to launch opener: {e}")))?;
    tracing::info!(path, "opened with default application");
    Ok(HostValue::Unit)
}

/// Spawn `cmd` with null stdio; the child is reaped on the blocking pool.
fn spawn_detached(mut cmd: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(tokio::task::spawn_blocking(move || {
        let status = child.wait();
        if let Ok(status) = &status {
            tracing::debug!(%status, "opener exited");
        }
        status
    }))
}

#[cfg(target_os = "macos")]
fn open_command() -> Command {
    Command::new("open")
}

#[cfg(target_os = "windows")]
fn open_command() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command() -> Command {
    Command::new("xdg-open")
}

// ── Paste parsing ────────────────────────────────────────────────────────────

/// Parse pasted text as a list of dropped files.
///
/// Every token must be an absolute path to an existing file or directory;
/// otherwise the paste is ordinary text and `None` is returned.
pub fn parse_dropped_paths(text: &str) -> Option<Vec<String>> {
    let tokens = split_words(text.trim());
    if tokens.is_empty() {
        return None;
    }
    let mut paths = Vec::with_capacity(tokens.len());
    for token in tokens {
        let path = decode_file_uri(&token).unwrap_or(token);
        let p = Path::new(&path);
        if !p.is_absolute() || !p.exists() {
            return None;
        }
        paths.push(path);
    }
    Some(paths)
}

/// Split on unquoted whitespace, honoring single quotes, double quotes,
/// and backslash escapes.
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_word = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(e @ ('"' | '\\' | '$' | '`')) => current.push(e),
                            Some(e) => {
                                current.push('\\');
                                current.push(e);
                            }
                            None => current.push('\\'),
                        },
                        _ => current.push(q),
                    }
                }
            }
            '\\' if cfg!(not(windows)) => {
                in_word = true;
                if let Some(e) = chars.next() {
                    current.push(e);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// `file:///a%20b` → `/a b`. Returns `None` for anything else.
fn decode_file_uri(token: &str) -> Option<String> {
    let rest = token.strip_prefix("file://")?;
    // Skip the authority (usually empty or "localhost").
    let path = &rest[rest.find('/')?..];
    let decoded = urlencoding::decode(path).ok()?.into_owned();
    if cfg!(windows) {
        // file:///C:/dir → C:/dir
        if let Some(stripped) = decoded.strip_prefix('/') {
            if stripped.as_bytes().get(1) == Some(&b':') {
                return Some(stripped.to_string());
            }
        }
    }
    Some(decoded)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::host::Notification;

    #[tokio::test]
    async fn spawned_opener_is_reaped() {
        let handle = spawn_detached(Command::new("true")).expect("spawn");
        let status = handle.await.expect("join").expect("wait");
        assert!(status.success());
    }

    #[test]
    fn missing_opener_binary_is_an_error() {
        let err = spawn_detached(Command::new("/definitely/not/an/opener"));
        assert!(err.is_err());
    }

    #[test]
    fn split_handles_quotes_and_escapes() {
        assert_eq!(
            split_words(r#"'/a b/c.txt' /d\ e.md "/f \"g\".rs""#),
            vec!["/a b/c.txt", "/d e.md", "/f \"g\".rs"]
        );
        assert_eq!(split_words("  /x\n/y  "), vec!["/x", "/y"]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn decodes_file_uris() {
        assert_eq!(
            decode_file_uri("file:///home/u/My%20Doc.txt").as_deref(),
            Some("/home/u/My Doc.txt")
        );
        assert_eq!(
            decode_file_uri("file://localhost/tmp/a").as_deref(),
            Some("/tmp/a")
        );
        assert!(decode_file_uri("/tmp/a").is_none());
    }

    #[test]
    fn parses_existing_paths_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("with space.txt");
        let b = dir.path().join("b.log");
        std::fs::write(&a, "a").expect("write");
        std::fs::write(&b, "b").expect("write");

        let pasted = format!("'{}' {}\n", a.display(), b.display());
        assert_eq!(
            parse_dropped_paths(&pasted),
            Some(vec![a.display().to_string(), b.display().to_string()])
        );

        let uri = format!(
            "file://{}",
            urlencoding::encode(&a.display().to_string()).replace("%2F", "/")
        );
        assert_eq!(parse_dropped_paths(&uri), Some(vec![a.display().to_string()]));

        let missing = format!("{} /definitely/not/here", b.display());
        assert_eq!(parse_dropped_paths(&missing), None);
        assert_eq!(parse_dropped_paths("hello world"), None);
        assert_eq!(parse_dropped_paths("relative/path.txt"), None);
        assert_eq!(parse_dropped_paths(""), None);
    }

    #[test]
    fn paste_emits_drop_notifications() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").expect("write");

        let shell = TerminalShell::new();
        let seen: Arc<Mutex<Vec<Notification>>> = Arc::default();
        let sink_seen = Arc::clone(&seen);
        let sink: NotificationSink = Arc::new(move |n| sink_seen.lock().expect("lock").push(n));
        shell
            .subscribe(Scope::Window, DRAG_DROP, sink.clone())
            .expect("subscribe");
        shell
            .subscribe(Scope::Window, BACKEND_DROP, sink)
            .expect("subscribe");

        assert!(shell.handle_paste(&file.display().to_string()));
        assert!(!shell.handle_paste("just some text"));

        let seen = seen.lock().expect("lock");
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].name, DRAG_DROP);
        assert_eq!(seen[1].name, BACKEND_DROP);
        assert_eq!(seen[1].payload, json!([file.display().to_string()]));
    }

    #[tokio::test]
    async fn fs_plugin_reads_text_and_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("note.txt");
        std::fs::write(&file, "hello").expect("write");
        let arg = json!(file.display().to_string());

        let shell = TerminalShell::new();
        let module = shell.load_plugin(FS_PLUGIN).await.expect("plugin");
        let text = module
            .function("read_text_file")
            .expect("export")
            .call(arg.clone())
            .await
            .expect("read");
        assert_eq!(text, HostValue::Text("hello".into()));
        let bytes = module
            .function("read_file")
            .expect("export")
            .call(arg)
            .await
            .expect("read");
        assert_eq!(bytes, HostValue::Bytes(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn fs_plugin_reports_missing_file() {
        let shell = TerminalShell::new();
        let module = shell.load_plugin(FS_PLUGIN).await.expect("plugin");
        let err = module
            .function("read_text_file")
            .expect("export")
            .call(json!("/definitely/not/here.txt"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, HostError::Io(_)));
    }

    #[tokio::test]
    async fn unknown_plugin_and_command_fail() {
        let shell = TerminalShell::new();
        assert!(matches!(
            shell.load_plugin("clipboard").await,
            Err(HostError::PluginUnavailable(_))
        ));
        assert!(matches!(
            shell.invoke("greet", json!({})).await,
            Err(HostError::CommandNotFound(_))
        ));
    }

    #[tokio::test]
    async fn open_path_command_requires_path_argument() {
        let shell = TerminalShell::new();
        let err = shell
            .invoke(OPEN_PATH_COMMAND, json!({ "target": "/x" }))
            .await
            .expect_err("should fail");
        assert!(matches!(err, HostError::InvalidArguments(_)));
    }
}
