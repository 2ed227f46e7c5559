use serde::{Deserialize, Serialize};

/// Authentication status of the single browsing session.
///
/// `Checking` only exists between process start and the settlement of the
/// boot-time verification call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    pub fn is_settled(self) -> bool {
        !matches!(self, SessionStatus::Checking)
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }
}
