//! Nickname collision recovery.

use tracing::warn;

/// Derives replacement nicknames after `ERR_NICKNAMEINUSE`.
///
/// Each rejection appends `suffix` to the rejected nick. With a ceiling
/// set, rejections past it are reported but no new nick is proposed.
#[derive(Clone, Debug)]
pub struct NickCollisionResolver {
    suffix: String,
    max_attempts: Option<u32>,
    attempts: u32,
}

impl NickCollisionResolver {
    pub fn new(suffix: impl Into<String>, max_attempts: Option<u32>) -> Self {
        Self {
            suffix: suffix.into(),
            max_attempts,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The nick to try after `rejected` was refused, if any attempts remain.
    pub fn resolve(&mut self, rejected: &str) -> Option<String> {
        if let Some(max) = self.max_attempts {
            if self.attempts >= max {
                warn!(rejected, max, "giving up on nick collision recovery");
                return None;
            }
        }
        self.attempts += 1;
        Some(format!("{}{}", rejected, self.suffix))
    }

    /// Forget past attempts; called on registration and when a nick change lands.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl Default for NickCollisionResolver {
    fn default() -> Self {
        Self::new("_", Some(5))
    }
}
