//! Authentication handler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use deskpilot_protocols::{Domain, TaskError, TaskResult};

use super::DomainHandler;
use crate::auth::AuthService;
use crate::registry::CapabilityRegistry;
use crate::rules::extraction::{extract, ParamKind};
use crate::rules::{contains_any, normalize};

const REGISTER_TRIGGERS: &[&str] = &["зарегистрировать пользователя", "регистрация", "register"];
const LOGIN_TRIGGERS: &[&str] = &["войти как пользователь", "вход", "log in", "login"];
const RIGHTS_TRIGGERS: &[&str] = &[
    "проверить права доступа",
    "права доступа",
    "access rights",
    "rights",
];

/// Registers users, logs them in and reports access rights.
pub struct AuthHandler {
    auth: Arc<AuthService>,
}

impl AuthHandler {
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }

    fn credentials(description: &str, username_kind: ParamKind) -> Option<(String, String)> {
        let username = extract(description, username_kind)?;
        let password = extract(description, ParamKind::Password)?;
        Some((username, password))
    }

    fn register(&self, description: &str) -> TaskResult {
        let Some((username, password)) =
            Self::credentials(description, ParamKind::RegisterUsername)
        else {
            return TaskResult::failure("Could not extract username or password");
        };
        match self.auth.register(&username, &password) {
            Ok(()) => TaskResult::success(format!("User {} registered", username)),
            Err(e) => TaskResult::failure(e.to_string()),
        }
    }

    fn login(&self, description: &str) -> TaskResult {
        let Some((username, password)) = Self::credentials(description, ParamKind::LoginUsername)
        else {
            return TaskResult::failure("Could not extract username or password");
        };
        match self.auth.login(&username, &password) {
            Ok(token) => {
                TaskResult::success(format!("User {} logged in. Token: {}", username, token))
            }
            Err(e) => TaskResult::failure(e.to_string()),
        }
    }

    fn check_rights(&self) -> TaskResult {
        match self.auth.check_rights() {
            Ok(report) => TaskResult::success(report.to_string()),
            Err(e) => TaskResult::failure(e.to_string()),
        }
    }
}

#[async_trait]
impl DomainHandler for AuthHandler {
    fn domain(&self) -> Domain {
        Domain::Auth
    }

    async fn execute(
        &self,
        description: &str,
        _capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError> {
        let text = normalize(description);
        let result = if contains_any(&text, REGISTER_TRIGGERS) {
            debug!("Auth register");
            self.register(description)
        } else if contains_any(&text, LOGIN_TRIGGERS) {
            debug!("Auth login");
            self.login(description)
        } else if contains_any(&text, RIGHTS_TRIGGERS) {
            debug!("Auth rights check");
            self.check_rights()
        } else {
            TaskResult::failure(format!("Unknown auth operation: {}", description))
        };
        Ok(result)
    }
}
