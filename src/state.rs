use std::path::PathBuf;

use crate::bridge::EventBridge;
use crate::event::TrayEvent;
use crate::notification::Notification;
use crate::utils::truncate_utf16;

/// Longest tooltip the shell accepts, excluding the terminating nul.
pub const MAX_TOOLTIP_LEN: usize = 127;

/// What the shell currently shows for the icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconState {
    tooltip: String,
    icon_path: Option<PathBuf>,
    visible: bool,
    balloon: Option<Notification>,
}

impl IconState {
    pub fn new(icon_path: Option<PathBuf>, tooltip: &str) -> Self {
        Self {
            tooltip: truncate_utf16(tooltip, MAX_TOOLTIP_LEN).to_owned(),
            icon_path,
            visible: true,
            balloon: None,
        }
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn set_tooltip(&mut self, tooltip: &str) {
        self.tooltip = truncate_utf16(tooltip, MAX_TOOLTIP_LEN).to_owned();
    }

    pub fn icon_path(&self) -> Option<&PathBuf> {
        self.icon_path.as_ref()
    }

    pub fn set_icon_path(&mut self, path: Option<PathBuf>) {
        self.icon_path = path;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn pending_balloon(&self) -> Option<&Notification> {
        self.balloon.as_ref()
    }
}

/// Everything the window procedure and the application share.
#[derive(Debug)]
pub struct TrayState {
    pub icon: IconState,
    pub bridge: EventBridge,
    /// A replaced balloon still owes the shell's closing message.
    superseded: bool,
}

impl TrayState {
    pub fn new(icon: IconState) -> Self {
        Self {
            icon,
            bridge: EventBridge::new(),
            superseded: false,
        }
    }

    pub fn begin_balloon(&mut self, notification: Notification) {
        if let Some(previous) = self.icon.balloon.replace(notification) {
            tracing::debug!("Balloon {:?} superseded before it finished", previous.title());
            self.superseded = true;
        }
    }

    /// Forgets the pending balloon, e.g. when the shell refused to show it.
    pub fn end_balloon(&mut self) {
        self.icon.balloon = None;
        self.superseded = false;
    }

    /// Balloon bookkeeping is settled before the event becomes observable.
    ///
    /// After a replacement the first balloon event belongs to the old balloon
    /// and leaves the new one pending. Every event is queued either way.
    pub fn record_icon_event(&mut self, event: TrayEvent) {
        if event.is_balloon() {
            if self.superseded {
                self.superseded = false;
            } else {
                self.icon.balloon = None;
            }
        }
        self.bridge.push_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TrayState {
        TrayState::new(IconState::new(None, "tip"))
    }

    #[test]
    fn balloon_is_cleared_before_event_is_queued() {
        let mut state = state();
        state.begin_balloon(Notification::new("Saved", "All done"));
        assert!(state.icon.pending_balloon().is_some());

        state.record_icon_event(TrayEvent::BalloonTimedOut);
        assert!(state.icon.pending_balloon().is_none());
        assert_eq!(state.bridge.pop_event(), Some(TrayEvent::BalloonTimedOut));
    }

    #[test]
    fn clicks_leave_balloon_pending() {
        let mut state = state();
        state.begin_balloon(Notification::new("Saved", "All done"));
        state.record_icon_event(TrayEvent::Clicked);

        assert_eq!(state.icon.pending_balloon().map(Notification::title), Some("Saved"));
    }

    #[test]
    fn replaced_balloon_survives_the_old_one_closing() {
        let mut state = state();
        state.begin_balloon(Notification::new("Saving", "Working on it"));
        state.begin_balloon(Notification::new("Saved", "All done"));

        state.record_icon_event(TrayEvent::BalloonHidden);
        assert_eq!(state.icon.pending_balloon().map(Notification::title), Some("Saved"));

        state.record_icon_event(TrayEvent::BalloonTimedOut);
        assert!(state.icon.pending_balloon().is_none());

        assert_eq!(state.bridge.pop_event(), Some(TrayEvent::BalloonHidden));
        assert_eq!(state.bridge.pop_event(), Some(TrayEvent::BalloonTimedOut));
    }

    #[test]
    fn refused_balloon_forgets_the_replacement() {
        let mut state = state();
        state.begin_balloon(Notification::new("Saving", "Working on it"));
        state.begin_balloon(Notification::new("Saved", "All done"));
        state.end_balloon();

        state.begin_balloon(Notification::new("Again", "Fresh balloon"));
        state.record_icon_event(TrayEvent::BalloonClicked);
        assert!(state.icon.pending_balloon().is_none());
    }

    #[test]
    fn tooltip_is_truncated() {
        let mut icon = IconState::new(None, &"x".repeat(500));
        assert_eq!(icon.tooltip().len(), MAX_TOOLTIP_LEN);

        icon.set_tooltip("short");
        assert_eq!(icon.tooltip(), "short");
        assert!(icon.is_visible());
    }
}
