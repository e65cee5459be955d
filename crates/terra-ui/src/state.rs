// File: src/state.rs
// Purpose: Shared application state atoms

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use terra_atom::{Atom, Storage, StoredAtom};

/// Storage key for the recently visited workspaces list
pub const RECENT_WORKSPACES_KEY: &str = "workspaces/recently-viewed";

/// Maximum number of recently visited workspaces kept
pub const MAX_RECENT_WORKSPACES: usize = 10;

/// A workspace, identified by billing namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceRef {
    pub namespace: String,
    pub name: String,
}

impl WorkspaceRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for WorkspaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Uninitialized,
    SignedOut,
    SignedIn {
        email: String,
    },
}

impl AuthStatus {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthStatus::SignedIn { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub title: String,
}

/// Process-wide UI state, constructed once by the bootstrap
pub struct AppState {
    pub auth_status: Atom<AuthStatus>,
    pub notifications: Atom<Vec<Notification>>,
    pub selected_workspace: Atom<Option<WorkspaceRef>>,
    pub recent_workspaces: StoredAtom<Vec<WorkspaceRef>>,
    next_notification: Cell<u64>,
}

impl AppState {
    pub fn new(local_storage: Rc<dyn Storage>) -> Self {
        Self {
            auth_status: Atom::default(),
            notifications: Atom::default(),
            selected_workspace: Atom::default(),
            recent_workspaces: StoredAtom::new(local_storage, RECENT_WORKSPACES_KEY, Vec::new()),
            next_notification: Cell::new(1),
        }
    }

    /// Shows a notification, returning its id
    pub fn notify(&self, level: NotificationLevel, title: impl Into<String>) -> u64 {
        let id = self.next_notification.get();
        self.next_notification.set(id + 1);

        let notification = Notification {
            id,
            level,
            title: title.into(),
        };
        self.notifications.update(|current| {
            let mut next = current.clone();
            next.push(notification);
            next
        });
        id
    }

    /// Dismisses a notification; unknown ids are ignored
    pub fn clear_notification(&self, id: u64) {
        if !self.notifications.with(|n| n.iter().any(|n| n.id == id)) {
            return;
        }
        self.notifications
            .update(|current| current.iter().filter(|n| n.id != id).cloned().collect());
    }

    /// Selects a workspace, recording it as most recently viewed
    ///
    /// Re-selecting the current workspace does not notify subscribers.
    pub fn select_workspace(&self, workspace: Option<WorkspaceRef>) {
        if self.selected_workspace.with(|current| *current == workspace) {
            return;
        }

        if let Some(ws) = &workspace {
            self.recent_workspaces.update(|recent| {
                let mut next: Vec<WorkspaceRef> = Vec::with_capacity(MAX_RECENT_WORKSPACES);
                next.push(ws.clone());
                next.extend(recent.iter().filter(|r| *r != ws).cloned());
                next.truncate(MAX_RECENT_WORKSPACES);
                next
            });
        }

        tracing::debug!(workspace = ?workspace, "workspace selected");
        self.selected_workspace.set(workspace);
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("auth_status", &self.auth_status)
            .field("selected_workspace", &self.selected_workspace)
            .field("recent_workspaces", &self.recent_workspaces)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_atom::MemoryStorage;

    fn state() -> AppState {
        AppState::new(Rc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_notifications() {
        let state = state();
        let first = state.notify(NotificationLevel::Info, "Saved");
        let second = state.notify(NotificationLevel::Error, "Failed");
        assert_ne!(first, second);
        assert_eq!(state.notifications.with(|n| n.len()), 2);

        state.clear_notification(first);
        let remaining = state.notifications.get();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Failed");

        state.clear_notification(999);
        assert_eq!(state.notifications.with(|n| n.len()), 1);
    }

    #[test]
    fn test_recent_workspaces_dedup_and_cap() {
        let state = state();
        for i in 0..12 {
            state.select_workspace(Some(WorkspaceRef::new("ns", format!("ws{i}"))));
        }
        state.select_workspace(Some(WorkspaceRef::new("ns", "ws5")));

        let recent = state.recent_workspaces.get();
        assert_eq!(recent.len(), MAX_RECENT_WORKSPACES);
        assert_eq!(recent[0], WorkspaceRef::new("ns", "ws5"));
        assert_eq!(recent[1], WorkspaceRef::new("ns", "ws11"));
        assert_eq!(recent.iter().filter(|w| w.name == "ws5").count(), 1);
    }

    #[test]
    fn test_select_same_workspace_is_quiet() {
        let state = state();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        state.selected_workspace.subscribe(move |_, _| c.set(c.get() + 1));

        let ws = WorkspaceRef::new("ns", "ws");
        state.select_workspace(Some(ws.clone()));
        state.select_workspace(Some(ws));
        state.select_workspace(None);

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_auth_status_default() {
        let state = state();
        assert_eq!(state.auth_status.get(), AuthStatus::Uninitialized);
        state.auth_status.set(AuthStatus::SignedIn {
            email: "user@example.org".to_string(),
        });
        assert!(state.auth_status.get().is_signed_in());
    }
}
