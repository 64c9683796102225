use chrono::{DateTime, Utc};

use crate::engine::presence::PresenceStatus;
use crate::engine::store::GuildState;
use crate::ids::UserId;

/// Panel title shown above the member list.
pub const PANEL_TITLE: &str = "Support Team Status";

/// Panel footer documenting the update cadence.
pub const PANEL_FOOTER: &str = "Presence updates every 60 seconds.";

/// Line shown when a guild tracks nobody yet.
pub const EMPTY_PANEL_LINE: &str = "No tracked users yet. Use `/adduser` to add support members.";

/// Rendered panel content, ready for a display surface to post or edit.
/// `generated_at` is display-only; two renders of the same state are
/// semantically equal ignoring it.
#[derive(Debug, Clone)]
pub struct PanelContent {
    pub title: String,
    pub lines: Vec<String>,
    pub footer: String,
    pub generated_at: DateTime<Utc>,
}

impl PanelContent {
    /// The panel body as a single string, one member per line.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

/// Render a guild's status panel. Pure and infallible: presence lookups are
/// plain cache reads, and a member that cannot be resolved gets its own line
/// rather than an error.
pub fn render_panel(
    state: &GuildState,
    presence: impl Fn(UserId) -> Option<PresenceStatus>,
) -> PanelContent {
    let lines = if state.tracked_user_ids.is_empty() {
        vec![EMPTY_PANEL_LINE.to_string()]
    } else {
        state
            .tracked_user_ids
            .iter()
            .map(|&user_id| match presence(user_id) {
                Some(status) => {
                    format!("{} <@{}> – **{}**", status.icon(), user_id, status.label())
                }
                None => format!("❓ <@{}> – Not found in this server", user_id),
            })
            .collect()
    };

    PanelContent {
        title: PANEL_TITLE.to_string(),
        lines,
        footer: PANEL_FOOTER.to_string(),
        generated_at: Utc::now(),
    }
}
