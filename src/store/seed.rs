//! Demo accounts and the sample issues installed on first start.

use chrono::{DateTime, Utc};

use crate::models::{Credential, Issue, IssueStatus, Priority, Role, User};

pub fn credentials() -> Vec<Credential> {
    vec![
        Credential {
            user: User {
                id: "1".to_string(),
                email: "student@college.edu".to_string(),
                name: "John Doe".to_string(),
                role: Role::Student,
                roll_no: Some("CS21001".to_string()),
                department: Some("Computer Science".to_string()),
            },
            password: "student123".to_string(),
        },
        Credential {
            user: User {
                id: "2".to_string(),
                email: "admin@college.edu".to_string(),
                name: "Dr. Sarah Smith".to_string(),
                role: Role::Admin,
                roll_no: None,
                department: None,
            },
            password: "admin123".to_string(),
        },
    ]
}

pub fn sample_issues() -> Vec<Issue> {
    vec![
        Issue {
            id: "1".to_string(),
            title: "Broken WiFi in Library".to_string(),
            description: "The WiFi connection in the main library is extremely slow and keeps \
                          disconnecting. This is affecting students' ability to research and \
                          complete assignments."
                .to_string(),
            category: "Infrastructure".to_string(),
            location: "Main Library - 2nd Floor".to_string(),
            status: IssueStatus::Pending,
            priority: Priority::High,
            student_id: "1".to_string(),
            student_name: "John Doe".to_string(),
            student_roll_no: "CS21001".to_string(),
            student_department: "Computer Science".to_string(),
            assigned_to: None,
            admin_remarks: None,
            image_url: None,
            created_at: timestamp("2024-01-15T09:30:00Z"),
            updated_at: timestamp("2024-01-15T09:30:00Z"),
        },
        Issue {
            id: "2".to_string(),
            title: "Leaking Ceiling in Classroom".to_string(),
            description: "There is water leaking from the ceiling in Room 201. It started \
                          yesterday after the rain and is getting worse."
                .to_string(),
            category: "Maintenance".to_string(),
            location: "Academic Block A - Room 201".to_string(),
            status: IssueStatus::InProgress,
            priority: Priority::Medium,
            student_id: "1".to_string(),
            student_name: "John Doe".to_string(),
            student_roll_no: "CS21001".to_string(),
            student_department: "Computer Science".to_string(),
            assigned_to: Some("Maintenance Team".to_string()),
            admin_remarks: Some(
                "Maintenance team has been notified. Repair scheduled for tomorrow.".to_string(),
            ),
            image_url: None,
            created_at: timestamp("2024-01-14T14:20:00Z"),
            updated_at: timestamp("2024-01-15T10:15:00Z"),
        },
        Issue {
            id: "3".to_string(),
            title: "Parking Space Shortage".to_string(),
            description: "There are insufficient parking spaces for students. Many students \
                          have to park far away from campus."
                .to_string(),
            category: "Infrastructure".to_string(),
            location: "Main Parking Area".to_string(),
            status: IssueStatus::Resolved,
            priority: Priority::Low,
            student_id: "1".to_string(),
            student_name: "John Doe".to_string(),
            student_roll_no: "CS21001".to_string(),
            student_department: "Computer Science".to_string(),
            assigned_to: Some("Campus Administration".to_string()),
            admin_remarks: Some(
                "Additional parking spaces have been allocated in the north campus.".to_string(),
            ),
            image_url: None,
            created_at: timestamp("2024-01-10T11:00:00Z"),
            updated_at: timestamp("2024-01-13T16:30:00Z"),
        },
    ]
}

// Only ever called with the literals above.
fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
