use sqlx::SqlitePool;

use crate::db::models::{GuildRow, TrackedUserRow};

/// Ensure a guild row exists (no-op if it already does).
pub async fn ensure_guild(pool: &SqlitePool, guild_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO guilds (id) VALUES (?)")
        .bind(guild_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Get a guild row by ID.
pub async fn get_guild(pool: &SqlitePool, guild_id: i64) -> Result<Option<GuildRow>, sqlx::Error> {
    sqlx::query_as::<_, GuildRow>("SELECT * FROM guilds WHERE id = ?")
        .bind(guild_id)
        .fetch_optional(pool)
        .await
}

/// List all known guilds, ascending by ID so sweeps see a stable order.
pub async fn list_guilds(pool: &SqlitePool) -> Result<Vec<GuildRow>, sqlx::Error> {
    sqlx::query_as::<_, GuildRow>("SELECT * FROM guilds ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Record the panel location for a guild, creating the row if needed.
pub async fn set_panel(
    pool: &SqlitePool,
    guild_id: i64,
    channel_id: i64,
    message_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO guilds (id, panel_channel_id, panel_message_id) VALUES (?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
             panel_channel_id = excluded.panel_channel_id, \
             panel_message_id = excluded.panel_message_id, \
             updated_at = datetime('now')",
    )
    .bind(guild_id)
    .bind(channel_id)
    .bind(message_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Add a tracked user at the given position.
pub async fn add_tracked_user(
    pool: &SqlitePool,
    guild_id: i64,
    user_id: i64,
    position: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO tracked_users (guild_id, user_id, position) VALUES (?, ?, ?)")
        .bind(guild_id)
        .bind(user_id)
        .bind(position)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove a tracked user from a guild.
pub async fn remove_tracked_user(
    pool: &SqlitePool,
    guild_id: i64,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tracked_users WHERE guild_id = ? AND user_id = ?")
        .bind(guild_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// List a guild's tracked users in display order.
pub async fn list_tracked_users(
    pool: &SqlitePool,
    guild_id: i64,
) -> Result<Vec<TrackedUserRow>, sqlx::Error> {
    sqlx::query_as::<_, TrackedUserRow>(
        "SELECT * FROM tracked_users WHERE guild_id = ? ORDER BY position",
    )
    .bind(guild_id)
    .fetch_all(pool)
    .await
}

/// Next free position for a guild's tracked list. Positions are append-only,
/// so removals leave gaps and re-added users land at the end.
pub async fn next_tracked_position(pool: &SqlitePool, guild_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COALESCE(MAX(position), -1) + 1 FROM tracked_users WHERE guild_id = ?")
        .bind(guild_id)
        .fetch_one(pool)
        .await
}

/// Replace a guild's entire stored state (panel location plus tracked list)
/// in one transaction.
pub async fn replace_guild(
    pool: &SqlitePool,
    guild_id: i64,
    panel: Option<(i64, i64)>,
    tracked: &[i64],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO guilds (id, panel_channel_id, panel_message_id) VALUES (?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
             panel_channel_id = excluded.panel_channel_id, \
             panel_message_id = excluded.panel_message_id, \
             updated_at = datetime('now')",
    )
    .bind(guild_id)
    .bind(panel.map(|p| p.0))
    .bind(panel.map(|p| p.1))
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM tracked_users WHERE guild_id = ?")
        .bind(guild_id)
        .execute(&mut *tx)
        .await?;

    for (position, user_id) in tracked.iter().enumerate() {
        sqlx::query("INSERT INTO tracked_users (guild_id, user_id, position) VALUES (?, ?, ?)")
            .bind(guild_id)
            .bind(user_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
