//! Drop-state aggregation: folds host drag-and-drop notifications into
//! `{ hovering, files }`.

pub mod extract;
pub mod registry;

pub use extract::extract_paths;

use crate::host::{HostContext, Notification, NotificationSink, SubscriptionId};
use registry::{rule_for, Rule, REGISTRY};

/// What the panel knows about drag-and-drop right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropState {
    /// A drag is currently over the window.
    pub hovering: bool,
    /// Paths of the most recent drop. Survives the end of the drag.
    pub files: Vec<String>,
}

impl DropState {
    /// Fold one notification's effect into the state.
    pub fn apply(&mut self, rule: Rule, paths: Vec<String>) {
        match rule {
            Rule::HoverBegin => {
                self.hovering = true;
                if !paths.is_empty() {
                    self.files = paths;
                }
            }
            Rule::HoverContinue => self.hovering = true,
            Rule::HoverEnd => self.hovering = false,
            Rule::DropComplete => {
                self.hovering = false;
                self.files = paths;
            }
        }
    }
}

/// Owns the drop state and the host subscriptions feeding it.
///
/// Subscriptions are taken when mounted into an attached host and released
/// on [`DropZone::unmount`] or drop. In a detached host the zone is inert.
pub struct DropZone {
    host: HostContext,
    state: DropState,
    subscriptions: Vec<SubscriptionId>,
}

impl DropZone {
    /// Subscribe `sink` to every registered notification.
    ///
    /// The sink only forwards; folding happens in [`DropZone::handle`] so
    /// that notifications are applied on the caller's event loop, in
    /// delivery order.
    pub fn mount(host: HostContext, sink: NotificationSink) -> Self {
        let mut subscriptions = Vec::new();
        if let Some(shell) = host.shell() {
            for entry in REGISTRY {
                match shell.subscribe(entry.scope, entry.name, sink.clone()) {
                    Ok(id) => subscriptions.push(id),
                    Err(e) => {
                        tracing::warn!(name = entry.name, scope = ?entry.scope, error = %e, "subscribe failed")
                    }
                }
            }
            tracing::debug!(count = subscriptions.len(), "drop zone mounted");
        } else {
            tracing::info!("no host shell, drop zone inactive");
        }
        Self {
            host,
            state: DropState::default(),
            subscriptions,
        }
    }

    /// Apply a delivered notification. Returns whether it was recognized.
    pub fn handle(&mut self, notification: &Notification) -> bool {
        let Some(rule) = rule_for(notification.scope, &notification.name) else {
            tracing::trace!(name = %notification.name, "ignoring unregistered notification");
            return false;
        };
        let paths = match rule {
            Rule::HoverBegin | Rule::DropComplete => extract_paths(&notification.payload),
            Rule::HoverContinue | Rule::HoverEnd => Vec::new(),
        };
        tracing::debug!(name = %notification.name, ?rule, paths = paths.len(), "drop notification");
        self.state.apply(rule, paths);
        true
    }

    pub fn state(&self) -> &DropState {
        &self.state
    }

    pub fn files(&self) -> &[String] {
        &self.state.files
    }

    pub fn is_active(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    #[cfg(test)]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Release every subscription. Release failures are ignored.
    pub fn unmount(&mut self) {
        let Some(shell) = self.host.shell() else {
            return;
        };
        for id in self.subscriptions.drain(..) {
            if let Err(e) = shell.unsubscribe(id) {
                tracing::debug!(id = id.0, error = %e, "unsubscribe failed");
            }
        }
    }
}

impl Drop for DropZone {
    fn drop(&mut self) {
        self.unmount();
    }
}
