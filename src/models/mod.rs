pub mod issue;
pub mod user;

pub use issue::{Issue, IssuePatch, IssueStatus, NewIssue, Priority, ReportIssueRequest};
pub use user::{AuthState, Credential, LoginRequest, RegisterRequest, Role, User};
