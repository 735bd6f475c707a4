//! Tray menu actions
//!
//! The menu is a static table; dispatch maps an entry to its effect.

use crate::error::InstallerError;
use crate::forwarder::Forwarder;

/// What selecting a menu entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Forward a single argument to the companion CLI
    Forward(&'static str),
    /// Leave the application
    Quit,
}

/// One tray menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: Option<&'static str>,
    pub kind: ActionKind,
}

pub const ACTIONS: &[Action] = &[
    Action {
        id: "new-account",
        label: "New Account",
        icon: Some("icp_logo.png"),
        kind: ActionKind::Forward("icp-new-account"),
    },
    Action {
        id: "change-account",
        label: "Change Account",
        icon: Some("icp_logo.png"),
        kind: ActionKind::Forward("icp-set-account"),
    },
    Action {
        id: "exit",
        label: "Exit",
        icon: None,
        kind: ActionKind::Quit,
    },
];

/// Result of dispatching an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Output(String),
    Quit,
}

/// Look up an action by id
#[must_use]
pub fn find(id: &str) -> Option<&'static Action> {
    ACTIONS.iter().find(|action| action.id == id)
}

/// Ids of all actions, in menu order
pub fn ids() -> impl Iterator<Item = &'static str> {
    ACTIONS.iter().map(|action| action.id)
}

/// Run an action
///
/// # Errors
/// Returns the forwarder error for `Forward` actions
pub async fn dispatch<F: Forwarder>(
    action: &Action,
    forwarder: &F,
) -> Result<Dispatch, InstallerError> {
    match action.kind {
        ActionKind::Forward(arg) => forwarder.forward(arg).await.map(Dispatch::Output),
        ActionKind::Quit => Ok(Dispatch::Quit),
    }
}
