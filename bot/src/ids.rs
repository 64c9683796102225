//! Platform identifier aliases. IDs are snowflakes on the wire; SQLite stores
//! them as signed 64-bit integers, so that is what we use throughout.

pub type GuildId = i64;
pub type UserId = i64;
pub type ChannelId = i64;
pub type MessageId = i64;
