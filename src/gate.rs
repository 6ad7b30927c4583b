use crate::error::{AppError, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Locked,
    Unlocked,
}

/// Single shared-secret check in front of the admin panel.
///
/// There is no user identity, lockout or logout: a session is one process, and
/// once unlocked it stays unlocked until the process exits. Callers check
/// [`AdminGate::is_unlocked`] before listing or updating messages.
#[derive(Debug)]
pub struct AdminGate {
    secret: String,
    state: GateState,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            state: GateState::Locked,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    pub fn attempt_unlock(&mut self, password: &str) -> Result<()> {
        if password == self.secret {
            if !self.is_unlocked() {
                self.state = GateState::Unlocked;
                info!("admin panel unlocked");
            }
            Ok(())
        } else {
            warn!("rejected admin password attempt");
            Err(AppError::Auth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_locked() {
        let gate = AdminGate::new("hunter2");
        assert_eq!(gate.state(), GateState::Locked);
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn test_wrong_password_stays_locked() {
        let mut gate = AdminGate::new("hunter2");
        assert!(matches!(gate.attempt_unlock("wrong"), Err(AppError::Auth)));
        assert!(!gate.is_unlocked());
        // No lockout: the right secret still works afterwards
        assert!(matches!(gate.attempt_unlock("also wrong"), Err(AppError::Auth)));
        assert!(gate.attempt_unlock("hunter2").is_ok());
    }

    #[test]
    fn test_unlock_persists_for_the_session() {
        let mut gate = AdminGate::new("hunter2");
        gate.attempt_unlock("hunter2").unwrap();
        assert!(gate.is_unlocked());
        // A wrong password is still refused, but does not re-lock
        assert!(matches!(gate.attempt_unlock("wrong"), Err(AppError::Auth)));
        assert_eq!(gate.state(), GateState::Unlocked);
        assert!(gate.attempt_unlock("hunter2").is_ok());
        assert_eq!(gate.state(), GateState::Unlocked);
    }

    #[test]
    fn test_match_is_exact() {
        let mut gate = AdminGate::new("hunter2");
        assert!(gate.attempt_unlock(" hunter2").is_err());
        assert!(gate.attempt_unlock("Hunter2").is_err());
        assert!(!gate.is_unlocked());
    }
}
