//! Session token handling.

use std::fmt;

/// Session id issued by `api_login.php`.
///
/// Held by [`crate::api::InkbunnyApi`] for the lifetime of the client and
/// attached as `sid` to every authenticated call.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    sid: String,
}

impl Session {
    pub fn new(sid: impl Into<String>) -> Self {
        Self { sid: sid.into() }
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.sid.chars().take(4).collect();
        write!(f, "Session({}…)", shown)
    }
}
