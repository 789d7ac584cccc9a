use strum::{Display, EnumString};

use crate::utils::truncate_utf16;

/// Longest balloon title the shell accepts, excluding the terminating nul.
pub const MAX_TITLE_LEN: usize = 63;
/// Longest balloon body the shell accepts, excluding the terminating nul.
pub const MAX_BODY_LEN: usize = 255;

/// The icon shown inside a balloon notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationIcon {
    None,
    #[default]
    Info,
    Warning,
    Error,
    /// The tray icon itself.
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    title: String,
    body: String,
    icon: NotificationIcon,
    sound: bool,
}

impl Notification {
    pub fn new(title: impl AsRef<str>, body: impl AsRef<str>) -> Self {
        Self {
            title: truncate_utf16(title.as_ref(), MAX_TITLE_LEN).to_owned(),
            body: truncate_utf16(body.as_ref(), MAX_BODY_LEN).to_owned(),
            icon: NotificationIcon::default(),
            sound: false,
        }
    }

    pub fn icon(mut self, icon: NotificationIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn icon_kind(&self) -> NotificationIcon {
        self.icon
    }

    pub fn plays_sound(&self) -> bool {
        self.sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_silent_info() {
        let n = Notification::new("Title", "Body");
        assert_eq!(n.icon_kind(), NotificationIcon::Info);
        assert!(!n.plays_sound());

        let n = n.icon(NotificationIcon::Warning).sound(true);
        assert_eq!(n.icon_kind(), NotificationIcon::Warning);
        assert!(n.plays_sound());
    }

    #[test]
    fn long_text_is_cut_to_shell_limits() {
        let n = Notification::new("t".repeat(100), "b".repeat(300));
        assert_eq!(n.title().len(), MAX_TITLE_LEN);
        assert_eq!(n.body().len(), MAX_BODY_LEN);
    }

    #[test]
    fn icon_parses_case_insensitively() {
        assert_eq!("Warning".parse::<NotificationIcon>().ok(), Some(NotificationIcon::Warning));
        assert_eq!("user".parse::<NotificationIcon>().ok(), Some(NotificationIcon::User));
        assert!("loud".parse::<NotificationIcon>().is_err());
        assert_eq!(NotificationIcon::Error.to_string(), "error");
    }
}
