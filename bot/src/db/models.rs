use serde::{Deserialize, Serialize};

/// A stored guild's panel registration from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuildRow {
    pub id: i64,
    pub panel_channel_id: Option<i64>,
    pub panel_message_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A tracked support member within a guild.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackedUserRow {
    pub guild_id: i64,
    pub user_id: i64,
    pub position: i64,
    pub added_at: String,
}
