//! Dragoman is the engine room of a support-team chat bot: live presence
//! status panels plus multi-language auto-translation. It deliberately stops
//! short of the platform connection itself. The host process that owns the
//! gateway session wires the pieces together:
//!
//! 1. Load [`config::BotConfig`], create the pool with
//!    [`db::pool::create_pool`] and run [`db::pool::run_migrations`].
//! 2. Build an [`engine::store::GuildStore`] over the pool and call
//!    `load_from_db`.
//! 3. Feed an [`engine::presence::PresenceCache`] from gateway presence
//!    events, and construct [`surface::rest::RestSurface`] and
//!    [`translate::libre::LibreTranslator`] from the config.
//! 4. Spawn [`engine::sync::PanelSynchronizer::run`] and fire its readiness
//!    signal once the gateway session is up; route messages and commands
//!    through [`engine::fanout::TranslationEngine`] and the store, formatting
//!    responses with [`engine::reply`].

pub mod config;
pub mod db;
pub mod engine;
pub mod ids;
pub mod surface;
pub mod translate;
