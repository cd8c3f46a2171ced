//! The fixed set of notifications the drop zone listens to.
//!
//! Hosts have not been consistent about which channel carries drag-and-drop
//! events, so every alias is registered: the built-in names on both the
//! global and the window scope, plus the names a host backend emits itself.

use crate::host::Scope;

pub const DRAG_ENTER: &str = "drag://enter";
pub const DRAG_OVER: &str = "drag://over";
pub const DRAG_DROP: &str = "drag://drop";
pub const DRAG_LEAVE: &str = "drag://leave";

pub const BACKEND_HOVER: &str = "file-drop-hover";
pub const BACKEND_DROP: &str = "file-drop";
pub const BACKEND_CANCELLED: &str = "file-drop-cancelled";

/// How a notification changes the drop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Drag entered; may carry the paths.
    HoverBegin,
    /// Drag still over the window.
    HoverContinue,
    /// Drag left or was cancelled.
    HoverEnd,
    /// Files released onto the window.
    DropComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub scope: Scope,
    pub name: &'static str,
    pub rule: Rule,
}

const fn entry(scope: Scope, name: &'static str, rule: Rule) -> Entry {
    Entry { scope, name, rule }
}

pub const REGISTRY: &[Entry] = &[
    entry(Scope::Global, DRAG_ENTER, Rule::HoverBegin),
    entry(Scope::Global, DRAG_OVER, Rule::HoverContinue),
    entry(Scope::Global, DRAG_DROP, Rule::DropComplete),
    entry(Scope::Global, DRAG_LEAVE, Rule::HoverEnd),
    entry(Scope::Window, DRAG_ENTER, Rule::HoverBegin),
    entry(Scope::Window, DRAG_OVER, Rule::HoverContinue),
    entry(Scope::Window, DRAG_DROP, Rule::DropComplete),
    entry(Scope::Window, DRAG_LEAVE, Rule::HoverEnd),
    entry(Scope::Window, BACKEND_HOVER, Rule::HoverBegin),
    entry(Scope::Window, BACKEND_DROP, Rule::DropComplete),
    entry(Scope::Window, BACKEND_CANCELLED, Rule::HoverEnd),
];

/// The rule registered for `name` on `scope`.
pub fn rule_for(scope: Scope, name: &str) -> Option<Rule> {
    REGISTRY
        .iter()
        .find(|e| e.scope == scope && e.name == name)
        .map(|e| e.rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_ins_registered_on_both_scopes() {
        for (name, rule) in [
            (DRAG_ENTER, Rule::HoverBegin),
            (DRAG_OVER, Rule::HoverContinue),
            (DRAG_DROP, Rule::DropComplete),
            (DRAG_LEAVE, Rule::HoverEnd),
        ] {
            assert_eq!(rule_for(Scope::Global, name), Some(rule));
            assert_eq!(rule_for(Scope::Window, name), Some(rule));
        }
    }

    #[test]
    fn backend_names_are_window_scoped() {
        assert_eq!(rule_for(Scope::Window, BACKEND_HOVER), Some(Rule::HoverBegin));
        assert_eq!(rule_for(Scope::Window, BACKEND_DROP), Some(Rule::DropComplete));
        assert_eq!(rule_for(Scope::Window, BACKEND_CANCELLED), Some(Rule::HoverEnd));
        assert_eq!(rule_for(Scope::Global, BACKEND_DROP), None);
    }

    #[test]
    fn unknown_names_have_no_rule() {
        assert_eq!(rule_for(Scope::Window, "file-drop-legacy"), None);
    }

    #[test]
    fn registry_has_no_duplicates() {
        for (i, a) in REGISTRY.iter().enumerate() {
            for b in &REGISTRY[i + 1..] {
                assert!(a.scope != b.scope || a.name != b.name, "{a:?} duplicated");
            }
        }
    }
}
