use serde::{Deserialize, Serialize};

/// XP earned by plain activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperiencePolicy {
    /// XP per counted message
    pub message_xp: u64,
    /// Whether a member may react to their own messages
    pub allow_self_reaction: bool,
}

impl Default for ExperiencePolicy {
    fn default() -> Self {
        Self {
            message_xp: 1,
            allow_self_reaction: false,
        }
    }
}
