use std::fmt;

use anyhow::{Result, bail};
use clap::ValueEnum;

/// Which write endpoints require the shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AuthScope {
    /// No endpoint checks credentials.
    None,
    /// Only the power-reset trigger checks credentials.
    Reset,
    /// Both the telemetry write and the power-reset trigger check credentials.
    #[default]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateStatus,
    TriggerReset,
}

#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPolicy {
    secret: Option<String>,
    scope: AuthScope,
}

impl CredentialPolicy {
    pub fn new(secret: Option<String>, scope: AuthScope) -> Result<Self> {
        let secret = secret.filter(|s| !s.is_empty());

        if scope != AuthScope::None && secret.is_none() {
            bail!("auth scope {scope:?} requires a non-empty shared secret");
        }

        Ok(Self { secret, scope })
    }

    /// A policy that accepts every request.
    pub fn open() -> Self {
        Self {
            secret: None,
            scope: AuthScope::None,
        }
    }

    pub fn scope(&self) -> AuthScope {
        self.scope
    }

    pub fn requires(&self, action: Action) -> bool {
        match (self.scope, action) {
            (AuthScope::None, _) => false,
            (AuthScope::Reset, Action::UpdateStatus) => false,
            (AuthScope::Reset, Action::TriggerReset) => true,
            (AuthScope::All, _) => true,
        }
    }

    pub fn authorize(&self, action: Action, supplied: Option<&str>) -> bool {
        if !self.requires(action) {
            return true;
        }

        match (&self.secret, supplied) {
            (Some(secret), Some(supplied)) => secret == supplied,
            _ => false,
        }
    }
}

impl fmt::Debug for CredentialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPolicy")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_policy_requires_a_secret() {
        assert!(CredentialPolicy::new(None, AuthScope::All).is_err());
        assert!(CredentialPolicy::new(Some(String::new()), AuthScope::Reset).is_err());
        assert!(CredentialPolicy::new(None, AuthScope::None).is_ok());
    }

    #[test]
    fn all_scope_checks_both_actions() {
        let policy = CredentialPolicy::new(Some("hunter2".into()), AuthScope::All).unwrap();

        for action in [Action::UpdateStatus, Action::TriggerReset] {
            assert!(policy.authorize(action, Some("hunter2")));
            assert!(!policy.authorize(action, Some("hunter3")));
            assert!(!policy.authorize(action, None));
        }
    }

    #[test]
    fn reset_scope_leaves_telemetry_open() {
        let policy = CredentialPolicy::new(Some("hunter2".into()), AuthScope::Reset).unwrap();

        assert!(policy.authorize(Action::UpdateStatus, None));
        assert!(policy.authorize(Action::UpdateStatus, Some("anything")));
        assert!(!policy.authorize(Action::TriggerReset, None));
        assert!(policy.authorize(Action::TriggerReset, Some("hunter2")));
    }

    #[test]
    fn open_policy_accepts_everything() {
        let policy = CredentialPolicy::open();

        assert!(policy.authorize(Action::UpdateStatus, None));
        assert!(policy.authorize(Action::TriggerReset, Some("whatever")));
    }

    #[test]
    fn debug_output_hides_secret() {
        let policy = CredentialPolicy::new(Some("hunter2".into()), AuthScope::All).unwrap();

        assert!(!format!("{policy:?}").contains("hunter2"));
    }
}
