use strum::{Display, EnumIter};

/// Something the user did with the tray icon or its balloon notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TrayEvent {
    Clicked,
    DoubleClicked,
    BalloonTimedOut,
    BalloonHidden,
    BalloonClicked,
}

impl TrayEvent {
    /// Whether this event ends the lifecycle of the current balloon.
    pub fn is_balloon(&self) -> bool {
        matches!(
            self,
            Self::BalloonTimedOut | Self::BalloonHidden | Self::BalloonClicked
        )
    }
}
