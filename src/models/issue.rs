use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Pending,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub status: IssueStatus,
    pub priority: Priority,
    pub student_id: String,
    pub student_name: String,
    pub student_roll_no: String,
    pub student_department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Builds a freshly submitted issue: status is always pending and both
    /// timestamps are `now`.
    pub fn submitted(id: String, data: NewIssue, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            category: data.category,
            location: data.location,
            status: IssueStatus::Pending,
            priority: data.priority,
            student_id: data.student_id,
            student_name: data.student_name,
            student_roll_no: data.student_roll_no,
            student_department: data.student_department,
            assigned_to: None,
            admin_remarks: None,
            image_url: data.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: &IssuePatch, at: DateTime<Utc>) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(assigned_to) = &patch.assigned_to {
            self.assigned_to = Some(assigned_to.clone());
        }
        if let Some(admin_remarks) = &patch.admin_remarks {
            self.admin_remarks = Some(admin_remarks.clone());
        }
        self.updated_at = at;
    }

    pub fn is_resolved(&self) -> bool {
        self.status == IssueStatus::Resolved
    }
}

/// Payload for creating an issue. Everything the submitter controls plus
/// the denormalized student details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(default)]
    pub priority: Priority,
    pub student_id: String,
    pub student_name: String,
    pub student_roll_no: String,
    pub student_department: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// The fields an administrator may change on an existing issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePatch {
    pub status: Option<IssueStatus>,
    pub assigned_to: Option<String>,
    pub admin_remarks: Option<String>,
}

impl IssuePatch {
    pub fn status(status: IssueStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportIssueRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ReportIssueRequest {
    pub fn into_new_issue(self, reporter: &User) -> NewIssue {
        NewIssue {
            title: self.title,
            description: self.description,
            category: self.category,
            location: self.location,
            priority: self.priority,
            student_id: reporter.id.clone(),
            student_name: reporter.name.clone(),
            student_roll_no: reporter.roll_no.clone().unwrap_or_default(),
            student_department: reporter.department.clone().unwrap_or_default(),
            image_url: self.image_url.filter(|url| !url.is_empty()),
        }
    }
}
