//! Read-only aggregates over the issue sequence. Nothing here is cached;
//! callers recompute from a fresh snapshot each time.

pub mod filter;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{Issue, IssueStatus, Priority};

pub use filter::IssueFilter;

pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

pub fn status_counts(issues: &[Issue]) -> StatusCounts {
    issues.iter().fold(StatusCounts::default(), |mut counts, issue| {
        counts.total += 1;
        match issue.status {
            IssueStatus::Pending => counts.pending += 1,
            IssueStatus::InProgress => counts.in_progress += 1,
            IssueStatus::Resolved => counts.resolved += 1,
        }
        counts
    })
}

fn count_by<'a>(issues: &'a [Issue], key: impl Fn(&'a Issue) -> &'a str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for issue in issues {
        *counts.entry(key(issue).to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn category_breakdown(issues: &[Issue]) -> HashMap<String, usize> {
    count_by(issues, |issue| issue.category.as_str())
}

pub fn department_breakdown(issues: &[Issue]) -> HashMap<String, usize> {
    count_by(issues, |issue| issue.student_department.as_str())
}

pub fn priority_breakdown(issues: &[Issue]) -> HashMap<Priority, usize> {
    let mut counts = HashMap::new();
    for issue in issues {
        *counts.entry(issue.priority).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub key: String,
    pub count: usize,
}

/// Highest counts first, at most `n` entries. Order among equal counts is
/// unspecified.
pub fn top_n(breakdown: HashMap<String, usize>, n: usize) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = breakdown
        .into_iter()
        .map(|(key, count)| Ranked { key, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

/// Percentage of issues resolved; 0 for an empty sequence.
pub fn resolution_rate(issues: &[Issue]) -> f64 {
    if issues.is_empty() {
        return 0.0;
    }
    let resolved = issues.iter().filter(|issue| issue.is_resolved()).count();
    resolved as f64 / issues.len() as f64 * 100.0
}

/// Mean of `updated_at - created_at` in days over resolved issues; 0 when
/// none are resolved.
pub fn average_resolution_days(issues: &[Issue]) -> f64 {
    let durations: Vec<f64> = issues
        .iter()
        .filter(|issue| issue.is_resolved())
        .map(|issue| {
            let elapsed = issue.updated_at - issue.created_at;
            elapsed.num_milliseconds() as f64 / (1000.0 * 60.0 * 60.0 * 24.0)
        })
        .collect();

    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}

/// Issues created within the last seven days of `now`.
pub fn recent_issues(issues: &[Issue], now: DateTime<Utc>) -> Vec<&Issue> {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    issues.iter().filter(|issue| issue.created_at >= cutoff).collect()
}

/// The `n` most recently created issues, newest first.
pub fn latest(issues: &[Issue], n: usize) -> Vec<Issue> {
    let mut sorted = issues.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}

/// Distinct categories in order of first appearance.
pub fn categories(issues: &[Issue]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for issue in issues {
        if !seen.iter().any(|c| c == &issue.category) {
            seen.push(issue.category.clone());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub key: String,
    pub count: usize,
    pub percentage: f64,
    pub resolved: usize,
}

fn group_stats<'a>(issues: &'a [Issue], key: impl Fn(&'a Issue) -> &'a str + Copy) -> Vec<GroupStats> {
    let total = issues.len();
    let mut stats: Vec<GroupStats> = count_by(issues, key)
        .into_iter()
        .map(|(group, count)| {
            let resolved = issues
                .iter()
                .filter(|issue| key(*issue) == group && issue.is_resolved())
                .count();
            GroupStats {
                percentage: count as f64 / total as f64 * 100.0,
                key: group,
                count,
                resolved,
            }
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

pub fn category_stats(issues: &[Issue]) -> Vec<GroupStats> {
    group_stats(issues, |issue| issue.category.as_str())
}

pub fn department_stats(issues: &[Issue]) -> Vec<GroupStats> {
    group_stats(issues, |issue| issue.student_department.as_str())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub counts: StatusCounts,
    pub recent: Vec<Issue>,
}

pub fn student_dashboard(own_issues: &[Issue]) -> StudentDashboard {
    StudentDashboard {
        counts: status_counts(own_issues),
        recent: latest(own_issues, 3),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub counts: StatusCounts,
    pub recent_count: usize,
    pub top_categories: Vec<Ranked>,
    pub top_departments: Vec<Ranked>,
}

pub fn admin_dashboard(issues: &[Issue], now: DateTime<Utc>) -> AdminDashboard {
    AdminDashboard {
        counts: status_counts(issues),
        recent_count: recent_issues(issues, now).len(),
        top_categories: top_n(category_breakdown(issues), 5),
        top_departments: top_n(department_breakdown(issues), 3),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub counts: StatusCounts,
    pub resolution_rate: f64,
    pub average_resolution_days: f64,
    pub high_priority: usize,
    pub categories: Vec<GroupStats>,
    pub departments: Vec<GroupStats>,
    pub priorities: HashMap<Priority, usize>,
}

pub fn analytics(issues: &[Issue]) -> AnalyticsReport {
    let priorities = priority_breakdown(issues);
    AnalyticsReport {
        counts: status_counts(issues),
        resolution_rate: resolution_rate(issues),
        average_resolution_days: average_resolution_days(issues),
        high_priority: priorities.get(&Priority::High).copied().unwrap_or(0),
        categories: category_stats(issues),
        departments: department_stats(issues),
        priorities,
    }
}
