use dashmap::DashMap;

use crate::ids::{GuildId, UserId};

/// A member's presence as the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    Online,
    Idle,
    DoNotDisturb,
    Offline,
}

impl PresenceStatus {
    /// Parse a platform status string. Anything unrecognized degrades to
    /// `Offline` so a status value we have never seen cannot break rendering.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "online" => Self::Online,
            "idle" => Self::Idle,
            "dnd" => Self::DoNotDisturb,
            _ => Self::Offline,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Online => "🟢",
            Self::Idle => "🌙",
            Self::DoNotDisturb => "⛔",
            Self::Offline => "⚫",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Idle => "Idle",
            Self::DoNotDisturb => "Do Not Disturb",
            Self::Offline => "Offline",
        }
    }
}

/// Read side of presence state. Lookups are synchronous cache reads so the
/// panel renderer stays a pure function. `None` means the member could not be
/// resolved in the guild at all, which is distinct from `Offline`.
pub trait PresenceSource: Send + Sync {
    fn presence(&self, guild_id: GuildId, user_id: UserId) -> Option<PresenceStatus>;
}

/// In-memory presence cache fed by the host's gateway connection: seed
/// members (typically as `Offline`) when a guild loads, update on presence
/// events, remove members when they leave.
#[derive(Default)]
pub struct PresenceCache {
    entries: DashMap<(GuildId, UserId), PresenceStatus>,
}

impl PresenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, guild_id: GuildId, user_id: UserId, status: PresenceStatus) {
        self.entries.insert((guild_id, user_id), status);
    }

    /// Forget a member entirely; subsequent lookups render as "not found"
    /// rather than Offline.
    pub fn remove(&self, guild_id: GuildId, user_id: UserId) {
        self.entries.remove(&(guild_id, user_id));
    }
}

impl PresenceSource for PresenceCache {
    fn presence(&self, guild_id: GuildId, user_id: UserId) -> Option<PresenceStatus> {
        self.entries.get(&(guild_id, user_id)).map(|e| *e)
    }
}
