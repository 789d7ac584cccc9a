//! A Windows notification-area icon for applications that run a frame loop.
//!
//! The shell reports clicks and balloon notifications to a hidden window
//! whenever its messages get dispatched. [`Tray`] dispatches them at the start
//! of every poll and parks the resulting [`TrayEvent`]s in a small
//! drop-oldest queue, so a game or immediate-mode UI can simply drain it once
//! per frame:
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> anyhow::Result<()> {
//! use raytray::{Tray, TrayConfig, TrayEvent};
//!
//! let tray = Tray::new(&TrayConfig::new(Some("icon.ico".into()), "My game"))?;
//! loop {
//!     while let Some(event) = tray.poll_event() {
//!         if event == TrayEvent::Clicked {
//!             // bring the window back
//!         }
//!     }
//!     // draw the frame
//! #   break;
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

pub mod bridge;
pub mod config;
pub mod event;
pub mod menu;
pub mod notification;
pub mod queue;
pub mod state;
mod utils;
#[cfg(target_os = "windows")]
pub mod windows;

pub use crate::bridge::{EventBridge, MessagePump, EVENT_QUEUE_CAPACITY};
pub use crate::config::TrayConfig;
pub use crate::event::TrayEvent;
pub use crate::menu::{ContextMenu, MenuEntry, PopupAlignment, MENU_END, MENU_SEPARATOR};
pub use crate::notification::{Notification, NotificationIcon};
pub use crate::queue::RingBuffer;
#[cfg(target_os = "windows")]
pub use crate::windows::Tray;
