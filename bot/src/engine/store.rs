use dashmap::DashMap;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::db::queries::guilds as guild_queries;
use crate::ids::{ChannelId, GuildId, MessageId, UserId};

/// Location of a guild's status panel message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// Everything the bot remembers about one guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildState {
    pub guild_id: GuildId,
    /// Panel display order; duplicates are forbidden.
    pub tracked_user_ids: Vec<UserId>,
    /// Set once a panel has been installed. Never cleared; recreation only
    /// replaces the message ID.
    pub panel: Option<PanelRef>,
}

impl GuildState {
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            tracked_user_ids: Vec::new(),
            panel: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Guild state held in memory with write-through persistence. The in-memory
/// map is updated first; a failed database write is reported to the caller
/// and does not roll the memory back. When constructed without a pool the
/// store is memory-only.
pub struct GuildStore {
    guilds: DashMap<GuildId, GuildState>,
    db: Option<SqlitePool>,
}

impl GuildStore {
    pub fn new(db: Option<SqlitePool>) -> Self {
        Self {
            guilds: DashMap::new(),
            db,
        }
    }

    // ── Startup loading ─────────────────────────────────────────────

    /// Load guild state from the database into memory on startup.
    pub async fn load_from_db(&self) -> Result<(), StoreError> {
        let Some(pool) = &self.db else {
            return Ok(());
        };

        let rows = guild_queries::list_guilds(pool).await?;
        for row in rows {
            let mut state = GuildState::new(row.id);
            state.panel = match (row.panel_channel_id, row.panel_message_id) {
                (Some(channel_id), Some(message_id)) => Some(PanelRef {
                    channel_id,
                    message_id,
                }),
                _ => None,
            };
            let tracked = guild_queries::list_tracked_users(pool, row.id).await?;
            state.tracked_user_ids = tracked.into_iter().map(|t| t.user_id).collect();
            self.guilds.insert(row.id, state);
        }

        info!(count = self.guilds.len(), "loaded guild state from database");
        Ok(())
    }

    // ── Read side ───────────────────────────────────────────────────

    /// Snapshot of one guild's state. Unknown guilds read as the default
    /// empty state without creating anything.
    pub fn get(&self, guild_id: GuildId) -> GuildState {
        self.guilds
            .get(&guild_id)
            .map(|g| g.clone())
            .unwrap_or_else(|| GuildState::new(guild_id))
    }

    /// Guild IDs in ascending order; this is the sweep order.
    pub fn all_guild_ids(&self) -> Vec<GuildId> {
        let mut ids: Vec<GuildId> = self.guilds.iter().map(|g| *g.key()).collect();
        ids.sort_unstable();
        ids
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Replace a guild's entire state. Duplicate tracked users collapse to
    /// their first occurrence so the stored list always honors the
    /// duplicates-forbidden invariant, whatever the caller assembled.
    pub async fn put(&self, mut state: GuildState) -> Result<(), StoreError> {
        let mut deduped = Vec::with_capacity(state.tracked_user_ids.len());
        for user_id in state.tracked_user_ids {
            if !deduped.contains(&user_id) {
                deduped.push(user_id);
            }
        }
        state.tracked_user_ids = deduped;

        let guild_id = state.guild_id;
        self.guilds.insert(guild_id, state.clone());

        if let Some(pool) = &self.db {
            guild_queries::replace_guild(
                pool,
                guild_id,
                state.panel.map(|p| (p.channel_id, p.message_id)),
                &state.tracked_user_ids,
            )
            .await?;
        }
        Ok(())
    }

    /// Start tracking a user. Returns false if they are already tracked.
    pub async fn add_tracked_user(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, StoreError> {
        // Scope the map guard so it is not held across the database writes.
        {
            let mut entry = self
                .guilds
                .entry(guild_id)
                .or_insert_with(|| GuildState::new(guild_id));
            if entry.tracked_user_ids.contains(&user_id) {
                return Ok(false);
            }
            entry.tracked_user_ids.push(user_id);
        }

        if let Some(pool) = &self.db {
            guild_queries::ensure_guild(pool, guild_id).await?;
            let position = guild_queries::next_tracked_position(pool, guild_id).await?;
            guild_queries::add_tracked_user(pool, guild_id, user_id, position).await?;
        }
        Ok(true)
    }

    /// Stop tracking a user. Returns false if they were not tracked.
    pub async fn remove_tracked_user(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<bool, StoreError> {
        let removed = {
            let Some(mut entry) = self.guilds.get_mut(&guild_id) else {
                return Ok(false);
            };
            let before = entry.tracked_user_ids.len();
            entry.tracked_user_ids.retain(|id| *id != user_id);
            entry.tracked_user_ids.len() != before
        };

        if removed && let Some(pool) = &self.db {
            guild_queries::remove_tracked_user(pool, guild_id, user_id).await?;
        }
        Ok(removed)
    }

    /// Record where a guild's panel lives. Installation and recreation both
    /// land here.
    pub async fn set_panel(&self, guild_id: GuildId, panel: PanelRef) -> Result<(), StoreError> {
        {
            let mut entry = self
                .guilds
                .entry(guild_id)
                .or_insert_with(|| GuildState::new(guild_id));
            entry.panel = Some(panel);
        }

        if let Some(pool) = &self.db {
            guild_queries::set_panel(pool, guild_id, panel.channel_id, panel.message_id).await?;
        }
        Ok(())
    }
}
