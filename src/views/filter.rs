use serde::Deserialize;

use crate::models::{Issue, IssueStatus, Priority};

/// Query used by the issue lists. Unset fields match everything; `search`
/// is a case-insensitive substring match over the descriptive text fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        if self.status.is_some_and(|status| issue.status != status) {
            return false;
        }
        if self.priority.is_some_and(|priority| issue.priority != priority) {
            return false;
        }
        if let Some(category) = &self.category {
            if &issue.category != category {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                [
                    &issue.title,
                    &issue.description,
                    &issue.student_name,
                    &issue.location,
                    &issue.category,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }

    pub fn apply(&self, issues: Vec<Issue>) -> Vec<Issue> {
        issues.into_iter().filter(|issue| self.matches(issue)).collect()
    }
}
