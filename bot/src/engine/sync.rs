use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::engine::panel::{self, PanelContent};
use crate::engine::presence::PresenceSource;
use crate::engine::store::{GuildStore, PanelRef, StoreError};
use crate::ids::{ChannelId, GuildId, MessageId};
use crate::surface::{DisplaySurface, SurfaceError};

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Keeps every guild's status panel message in line with tracked-user state
/// and cached presence. One instance serves all guilds; the host spawns
/// [`run`](Self::run) once and signals it when the platform connection is
/// ready.
pub struct PanelSynchronizer {
    store: Arc<GuildStore>,
    presence: Arc<dyn PresenceSource>,
    surface: Arc<dyn DisplaySurface>,
    period: Duration,
}

impl PanelSynchronizer {
    pub fn new(
        store: Arc<GuildStore>,
        presence: Arc<dyn PresenceSource>,
        surface: Arc<dyn DisplaySurface>,
        period: Duration,
    ) -> Self {
        Self {
            store,
            presence,
            surface,
            // tokio's interval panics on a zero period
            period: period.max(Duration::from_secs(1)),
        }
    }

    /// Install a guild's panel: render current state, post it, remember where
    /// it landed. Re-running in another channel simply moves the panel; the
    /// old message is left behind unmanaged.
    pub async fn install_panel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<MessageId, PanelError> {
        let content = self.render_for(guild_id);
        let message_id = self.surface.send_message(channel_id, &content).await?;
        self.store
            .set_panel(
                guild_id,
                PanelRef {
                    channel_id,
                    message_id,
                },
            )
            .await?;
        info!(%guild_id, %channel_id, %message_id, "status panel installed");
        Ok(message_id)
    }

    /// Periodic update loop. Holds off until `ready` fires so no sweep races
    /// the host's startup; if the sender is dropped instead, the loop exits
    /// without ever touching the display surface. The first sweep runs
    /// immediately after the signal, then once per period. Sweeps never
    /// overlap: each runs to completion before the next tick is taken.
    pub async fn run(self, ready: oneshot::Receiver<()>) {
        if ready.await.is_err() {
            info!("readiness signal dropped, panel synchronizer not starting");
            return;
        }

        info!(
            period_secs = self.period.as_secs(),
            "panel synchronizer running"
        );
        let mut ticker = tokio::time::interval(self.period);
        loop {
            ticker.tick().await;
            self.sweep().await;
        }
    }

    /// One pass over every known guild, in ascending guild ID order. A guild
    /// whose panel cannot be updated is logged and skipped; it never stops
    /// the rest of the sweep.
    pub async fn sweep(&self) {
        for guild_id in self.store.all_guild_ids() {
            self.reconcile_guild(guild_id).await;
        }
    }

    async fn reconcile_guild(&self, guild_id: GuildId) {
        let state = self.store.get(guild_id);
        let Some(stored) = state.panel else {
            // No panel installed; nothing to reconcile.
            return;
        };

        let content = panel::render_panel(&state, |user_id| {
            self.presence.presence(guild_id, user_id)
        });

        match self
            .surface
            .fetch_message(stored.channel_id, stored.message_id)
            .await
        {
            Ok(()) => {
                if let Err(e) = self
                    .surface
                    .edit_message(stored.channel_id, stored.message_id, &content)
                    .await
                {
                    warn!(%guild_id, error = %e, "panel edit failed, retrying next sweep");
                }
            }
            Err(SurfaceError::NotFound) => {
                self.recreate_panel(guild_id, stored.channel_id, &content)
                    .await;
            }
            Err(e) => {
                // The message may still exist; recreating here could leave
                // two panels behind.
                warn!(%guild_id, error = %e, "panel probe failed, leaving panel untouched");
            }
        }
    }

    /// The stored message is gone, so post a replacement in the same channel.
    /// At most one send per guild per sweep; if it fails, the stored
    /// reference stays as it was and the next sweep tries again.
    async fn recreate_panel(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        content: &PanelContent,
    ) {
        match self.surface.send_message(channel_id, content).await {
            Ok(message_id) => {
                info!(%guild_id, %message_id, "panel message was deleted, recreated");
                if let Err(e) = self
                    .store
                    .set_panel(
                        guild_id,
                        PanelRef {
                            channel_id,
                            message_id,
                        },
                    )
                    .await
                {
                    warn!(%guild_id, error = %e, "failed to persist recreated panel reference");
                }
            }
            Err(e) => {
                warn!(%guild_id, error = %e, "panel recreation failed, retrying next sweep");
            }
        }
    }

    fn render_for(&self, guild_id: GuildId) -> PanelContent {
        let state = self.store.get(guild_id);
        panel::render_panel(&state, |user_id| {
            self.presence.presence(guild_id, user_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::presence::PresenceCache;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

    /// In-memory display surface that records every call. Messages can be
    /// marked missing (probe answers NotFound) or unreachable (probe answers
    /// Transient), and sends/edits can be made to fail.
    struct MockSurface {
        missing: Mutex<HashSet<MessageId>>,
        unreachable: Mutex<HashSet<MessageId>>,
        send_fails: AtomicBool,
        edit_fails: AtomicBool,
        next_id: AtomicI64,
        log: Mutex<Vec<String>>,
    }

    impl MockSurface {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                missing: Mutex::new(HashSet::new()),
                unreachable: Mutex::new(HashSet::new()),
                send_fails: AtomicBool::new(false),
                edit_fails: AtomicBool::new(false),
                next_id: AtomicI64::new(1000),
                log: Mutex::new(Vec::new()),
            })
        }

        fn mark_missing(&self, message_id: MessageId) {
            self.missing.lock().unwrap().insert(message_id);
        }

        fn mark_unreachable(&self, message_id: MessageId) {
            self.unreachable.lock().unwrap().insert(message_id);
        }

        /// Drain the call log, so assertions only see what happened since the
        /// last call.
        fn take_calls(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.lock().unwrap())
        }
    }

    #[async_trait]
    impl DisplaySurface for MockSurface {
        async fn send_message(
            &self,
            channel_id: ChannelId,
            _content: &PanelContent,
        ) -> Result<MessageId, SurfaceError> {
            self.log.lock().unwrap().push(format!("send:{channel_id}"));
            if self.send_fails.load(Ordering::SeqCst) {
                return Err(SurfaceError::Transient("send refused".to_string()));
            }
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        async fn fetch_message(
            &self,
            channel_id: ChannelId,
            message_id: MessageId,
        ) -> Result<(), SurfaceError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("fetch:{channel_id}/{message_id}"));
            if self.unreachable.lock().unwrap().contains(&message_id) {
                return Err(SurfaceError::Transient("timed out".to_string()));
            }
            if self.missing.lock().unwrap().contains(&message_id) {
                return Err(SurfaceError::NotFound);
            }
            Ok(())
        }

        async fn edit_message(
            &self,
            channel_id: ChannelId,
            message_id: MessageId,
            _content: &PanelContent,
        ) -> Result<(), SurfaceError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("edit:{channel_id}/{message_id}"));
            if self.edit_fails.load(Ordering::SeqCst) {
                return Err(SurfaceError::Transient("edit refused".to_string()));
            }
            Ok(())
        }
    }

    fn synchronizer(store: Arc<GuildStore>, surface: Arc<MockSurface>) -> PanelSynchronizer {
        PanelSynchronizer::new(
            store,
            Arc::new(PresenceCache::new()),
            surface,
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_install_panel_posts_and_remembers_location() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store.clone(), surface.clone());

        let message_id = sync.install_panel(1, 5).await.unwrap();

        assert_eq!(message_id, 1000);
        assert_eq!(surface.take_calls(), vec!["send:5"]);
        assert_eq!(
            store.get(1).panel,
            Some(PanelRef {
                channel_id: 5,
                message_id: 1000,
            })
        );
    }

    #[tokio::test]
    async fn test_install_panel_send_failure_stores_nothing() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        surface.send_fails.store(true, Ordering::SeqCst);
        let sync = synchronizer(store.clone(), surface.clone());

        assert!(sync.install_panel(1, 5).await.is_err());
        assert_eq!(store.get(1).panel, None);
    }

    #[tokio::test]
    async fn test_sweep_skips_guilds_without_panel() {
        let store = Arc::new(GuildStore::new(None));
        store.add_tracked_user(1, 10).await.unwrap();
        let surface = MockSurface::new();
        let sync = synchronizer(store, surface.clone());

        sync.sweep().await;

        assert!(surface.take_calls().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_edits_live_panel_in_place() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store, surface.clone());
        sync.install_panel(1, 5).await.unwrap();
        surface.take_calls();

        sync.sweep().await;

        assert_eq!(surface.take_calls(), vec!["fetch:5/1000", "edit:5/1000"]);
    }

    #[tokio::test]
    async fn test_sweep_recreates_deleted_panel_once() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store.clone(), surface.clone());
        sync.install_panel(1, 5).await.unwrap();
        surface.mark_missing(1000);
        surface.take_calls();

        sync.sweep().await;

        // Exactly one replacement send, no edit of a message known gone.
        assert_eq!(surface.take_calls(), vec!["fetch:5/1000", "send:5"]);
        assert_eq!(
            store.get(1).panel,
            Some(PanelRef {
                channel_id: 5,
                message_id: 1001,
            })
        );

        // The next sweep manages the replacement message.
        sync.sweep().await;
        assert_eq!(surface.take_calls(), vec!["fetch:5/1001", "edit:5/1001"]);
    }

    #[tokio::test]
    async fn test_failed_recreation_keeps_old_reference() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store.clone(), surface.clone());
        sync.install_panel(1, 5).await.unwrap();
        surface.mark_missing(1000);
        surface.send_fails.store(true, Ordering::SeqCst);
        surface.take_calls();

        sync.sweep().await;

        assert_eq!(surface.take_calls(), vec!["fetch:5/1000", "send:5"]);
        assert_eq!(
            store.get(1).panel,
            Some(PanelRef {
                channel_id: 5,
                message_id: 1000,
            }),
            "failed recreation must not clobber the stored reference"
        );

        // Once sends recover the sweep retries from the stored reference.
        surface.send_fails.store(false, Ordering::SeqCst);
        sync.sweep().await;
        assert_eq!(surface.take_calls(), vec!["fetch:5/1000", "send:5"]);
        assert_eq!(store.get(1).panel.unwrap().message_id, 1001);
    }

    #[tokio::test]
    async fn test_edit_failure_is_swallowed() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store.clone(), surface.clone());
        sync.install_panel(1, 5).await.unwrap();
        surface.edit_fails.store(true, Ordering::SeqCst);
        surface.take_calls();

        sync.sweep().await;

        // No replacement sent for a message that still exists.
        assert_eq!(surface.take_calls(), vec!["fetch:5/1000", "edit:5/1000"]);
        assert_eq!(store.get(1).panel.unwrap().message_id, 1000);
    }

    #[tokio::test]
    async fn test_transient_probe_failure_leaves_panel_untouched() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store.clone(), surface.clone());
        sync.install_panel(1, 5).await.unwrap();
        surface.mark_unreachable(1000);
        surface.take_calls();

        sync.sweep().await;

        // Inconclusive probe: no edit, and crucially no recreation.
        assert_eq!(surface.take_calls(), vec!["fetch:5/1000"]);
        assert_eq!(store.get(1).panel.unwrap().message_id, 1000);
    }

    #[tokio::test]
    async fn test_sweep_visits_guilds_in_ascending_order() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store, surface.clone());
        sync.install_panel(30, 3).await.unwrap(); // message 1000
        sync.install_panel(10, 1).await.unwrap(); // message 1001
        sync.install_panel(20, 2).await.unwrap(); // message 1002
        surface.take_calls();

        sync.sweep().await;

        assert_eq!(
            surface.take_calls(),
            vec![
                "fetch:1/1001",
                "edit:1/1001",
                "fetch:2/1002",
                "edit:2/1002",
                "fetch:3/1000",
                "edit:3/1000",
            ]
        );
    }

    #[tokio::test]
    async fn test_troubled_guild_does_not_stop_the_sweep() {
        let store = Arc::new(GuildStore::new(None));
        let surface = MockSurface::new();
        let sync = synchronizer(store.clone(), surface.clone());
        sync.install_panel(1, 5).await.unwrap(); // message 1000
        sync.install_panel(2, 6).await.unwrap(); // message 1001
        surface.mark_unreachable(1000);
        surface.take_calls();

        sync.sweep().await;

        assert_eq!(
            surface.take_calls(),
            vec!["fetch:5/1000", "fetch:6/1001", "edit:6/1001"]
        );
    }

    #[tokio::test]
    async fn test_run_exits_when_readiness_sender_dropped() {
        let store = Arc::new(GuildStore::new(None));
        store
            .set_panel(
                1,
                PanelRef {
                    channel_id: 5,
                    message_id: 100,
                },
            )
            .await
            .unwrap();
        let surface = MockSurface::new();
        let sync = synchronizer(store, surface.clone());

        let (tx, rx) = oneshot::channel();
        drop(tx);
        sync.run(rx).await;

        assert!(surface.take_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_for_ready_then_sweeps_on_period() {
        let store = Arc::new(GuildStore::new(None));
        store
            .set_panel(
                1,
                PanelRef {
                    channel_id: 5,
                    message_id: 100,
                },
            )
            .await
            .unwrap();
        let surface = MockSurface::new();
        let sync = synchronizer(store, surface.clone());

        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(sync.run(rx));

        // Time passing before readiness must not trigger anything.
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert!(surface.take_calls().is_empty());

        // First sweep comes right after the signal, not a period later.
        tx.send(()).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(surface.take_calls(), vec!["fetch:5/100", "edit:5/100"]);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(surface.take_calls(), vec!["fetch:5/100", "edit:5/100"]);

        handle.abort();
    }
}
