pub mod reducer;
pub mod seed;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AuthState, Credential, Issue, IssuePatch, NewIssue, RegisterRequest, Role, User};
use crate::storage::Persistence;

pub use reducer::{Action, StoreState, reduce};

/// The single owner of application state.
///
/// Every mutation goes through [`reduce`]. The next state is computed from a
/// copy, written through the persistence port, and only then committed, so a
/// storage failure leaves the store exactly as it was. Actions are serialized
/// by the inner mutex.
pub struct Store {
    inner: Mutex<Inner>,
    persistence: Persistence,
}

struct Inner {
    state: StoreState,
    credentials: Vec<Credential>,
}

impl Store {
    /// Restores the stored session and issues, installing the sample issues
    /// when nothing has been stored yet.
    pub async fn open(persistence: Persistence, credentials: Vec<Credential>) -> Result<Self, AppError> {
        let stored = persistence.load().await?;
        let store = Self {
            inner: Mutex::new(Inner {
                state: StoreState::default(),
                credentials,
            }),
            persistence,
        };

        {
            let mut inner = store.inner.lock().await;

            if let Some(user) = stored.auth {
                info!("restored session for {}", user.email);
                store.commit(&mut inner, Action::Login(user)).await?;
            }

            let issues = match stored.issues {
                Some(issues) => {
                    info!("loaded {} stored issues", issues.len());
                    issues
                }
                None => {
                    info!("no stored issues, installing sample data");
                    seed::sample_issues()
                }
            };
            store.commit(&mut inner, Action::SetIssues(issues)).await?;
        }

        Ok(store)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let mut inner = self.inner.lock().await;

        let Some(user) = inner
            .credentials
            .iter()
            .find(|c| c.matches(email, password))
            .map(|c| c.user.clone())
        else {
            warn!("failed login attempt for {}", email);
            return Err(AppError::InvalidCredentials);
        };

        self.persistence.save_auth(&user).await?;
        self.commit(&mut inner, Action::Login(user.clone())).await?;
        info!("{} signed in", user.email);
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        self.persistence.clear_auth().await?;
        self.commit(&mut inner, Action::Logout).await
    }

    /// Creates a student account and signs it in. Emails are not required to
    /// be unique.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AppError> {
        let mut inner = self.inner.lock().await;

        let user = User {
            id: Uuid::now_v7().to_string(),
            email: req.email,
            name: req.name,
            role: Role::Student,
            roll_no: req.roll_no,
            department: req.department,
        };

        self.persistence.save_auth(&user).await?;
        self.commit(&mut inner, Action::Login(user.clone())).await?;
        inner.credentials.push(Credential {
            user: user.clone(),
            password: req.password,
        });
        info!("registered {} ({})", user.email, user.id);
        Ok(user)
    }

    pub async fn create_issue(&self, data: NewIssue) -> Result<Issue, AppError> {
        let mut inner = self.inner.lock().await;
        let issue = Issue::submitted(Uuid::now_v7().to_string(), data, Utc::now());
        self.commit(&mut inner, Action::AddIssue(issue.clone())).await?;
        info!("issue {} reported by student {}", issue.id, issue.student_id);
        Ok(issue)
    }

    /// Merges `patch` into the issue with `id`. Unknown ids leave the state
    /// untouched and yield `None`.
    pub async fn update_issue(&self, id: &str, patch: IssuePatch) -> Result<Option<Issue>, AppError> {
        let mut inner = self.inner.lock().await;

        if !inner.state.issues.iter().any(|issue| issue.id == id) {
            debug!("update for unknown issue {} ignored", id);
            return Ok(None);
        }

        if let Some(status) = patch.status {
            info!("issue {} marked {}", id, status.as_str());
        }
        let action = Action::UpdateIssue {
            id: id.to_string(),
            patch,
            at: Utc::now(),
        };
        self.commit(&mut inner, action).await?;

        Ok(inner.state.issues.iter().find(|issue| issue.id == id).cloned())
    }

    /// Issues reported by `student_id`, in submission order.
    pub async fn student_issues(&self, student_id: &str) -> Vec<Issue> {
        let inner = self.inner.lock().await;
        inner
            .state
            .issues
            .iter()
            .filter(|issue| issue.student_id == student_id)
            .cloned()
            .collect()
    }

    pub async fn issues(&self) -> Vec<Issue> {
        self.inner.lock().await.state.issues.clone()
    }

    pub async fn auth(&self) -> AuthState {
        self.inner.lock().await.state.auth.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.inner.lock().await.state.auth.user.clone()
    }

    pub async fn snapshot(&self) -> StoreState {
        self.inner.lock().await.state.clone()
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.persistence.ping().await
    }

    async fn commit(&self, inner: &mut Inner, action: Action) -> Result<(), AppError> {
        let name = action.name();
        let persist_issues = action.touches_issues();
        let next = reduce(inner.state.clone(), action);

        if persist_issues {
            self.persistence.save_issues(&next.issues).await?;
        }

        inner.state = next;
        debug!("committed {}", name);
        Ok(())
    }
}
