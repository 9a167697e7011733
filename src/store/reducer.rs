use chrono::{DateTime, Utc};

use crate::models::{AuthState, Issue, IssuePatch, User};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub auth: AuthState,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone)]
pub enum Action {
    Login(User),
    Logout,
    SetIssues(Vec<Issue>),
    AddIssue(Issue),
    UpdateIssue {
        id: String,
        patch: IssuePatch,
        at: DateTime<Utc>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Login(_) => "LOGIN",
            Action::Logout => "LOGOUT",
            Action::SetIssues(_) => "SET_ISSUES",
            Action::AddIssue(_) => "ADD_ISSUE",
            Action::UpdateIssue { .. } => "UPDATE_ISSUE",
        }
    }

    /// Whether committing this action changes what is stored under the issues key.
    pub fn touches_issues(&self) -> bool {
        matches!(
            self,
            Action::SetIssues(_) | Action::AddIssue(_) | Action::UpdateIssue { .. }
        )
    }
}

pub fn reduce(mut state: StoreState, action: Action) -> StoreState {
    match action {
        Action::Login(user) => {
            state.auth = AuthState::signed_in(user);
        }
        Action::Logout => {
            state.auth = AuthState::default();
        }
        Action::SetIssues(issues) => {
            state.issues = issues;
        }
        Action::AddIssue(issue) => {
            state.issues.push(issue);
        }
        Action::UpdateIssue { id, patch, at } => {
            if let Some(issue) = state.issues.iter_mut().find(|issue| issue.id == id) {
                issue.apply(&patch, at);
            }
        }
    }
    state
}
