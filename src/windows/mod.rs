use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::NOTIFYICONDATAW;

use crate::bridge::poll_with;
use crate::config::TrayConfig;
use crate::event::TrayEvent;
use crate::menu::ContextMenu;
use crate::notification::Notification;
use crate::state::{IconState, TrayState};
use crate::windows::message_window::TrayWindow;
use crate::windows::notify_icon::LoadedIcon;
use crate::windows::popup_menu::PopupMenu;

mod message_window;
mod notify_icon;
mod popup_menu;

pub use message_window::{IconMessage, WM_TRAYICON};

static NEXT_ICON_ID: AtomicU32 = AtomicU32::new(1);

/// State shared between [`Tray`] and its window procedure.
pub(crate) struct Shared {
    state: TrayState,
    uid: u32,
    icon: LoadedIcon,
    icon_size: i32,
    menu: Option<PopupMenu>,
}

impl Shared {
    fn notify_data(&self, hwnd: HWND) -> NOTIFYICONDATAW {
        notify_icon::data(hwnd, self.uid, &self.icon, &self.state.icon)
    }
}

fn build_menu(menu: &ContextMenu) -> Option<PopupMenu> {
    if menu.is_empty() {
        return None;
    }

    PopupMenu::build(menu)
        .inspect_err(|e| tracing::error!("Failed to build tray context menu: {e}"))
        .ok()
}

/// One icon in the Windows notification area.
///
/// Call [`Tray::poll_event`] until it returns `None` once per frame, the
/// window messages feeding it are dispatched as part of the poll.
pub struct Tray {
    window: TrayWindow,
    shared: Rc<RefCell<Shared>>,
}

impl Tray {
    /// Creates the tray window and places the icon.
    ///
    /// Only failing to create the window is an error. A missing icon file, a
    /// broken menu or the shell refusing the icon are logged and the tray
    /// carries on without them.
    pub fn new(config: &TrayConfig) -> anyhow::Result<Self> {
        let icon = LoadedIcon::load(config.icon.as_deref(), config.icon_size);
        let state = TrayState::new(IconState::new(config.icon.clone(), &config.tooltip));

        let shared = Rc::new(RefCell::new(Shared {
            state,
            uid: NEXT_ICON_ID.fetch_add(1, Ordering::Relaxed),
            icon,
            icon_size: config.icon_size,
            menu: build_menu(&config.context_menu()),
        }));

        let window = unsafe { TrayWindow::create(&config.class_name, shared.clone())? };

        let nid = shared.borrow().notify_data(window.hwnd);
        if notify_icon::place(&nid) {
            tracing::info!("Tray icon ready: {:?}", config.tooltip);
        }

        Ok(Self { window, shared })
    }

    /// Dispatches pending window messages, then returns the oldest unread event.
    pub fn poll_event(&self) -> Option<TrayEvent> {
        poll_with(&self.window, &*self.shared, |shared| {
            shared.state.bridge.pop_event()
        })
    }

    /// Returns the id of the last context menu item picked since the previous call.
    pub fn poll_menu_selection(&self) -> Option<u16> {
        poll_with(&self.window, &*self.shared, |shared| {
            shared.state.bridge.take_menu_selection()
        })
    }

    pub fn send_notification(&self, notification: &Notification) {
        if notification.body().is_empty() {
            tracing::warn!("Skipping balloon {:?} without a body", notification.title());
            return;
        }

        let nid = {
            let mut shared = self.shared.borrow_mut();
            shared.state.begin_balloon(notification.clone());
            let nid = shared.notify_data(self.window.hwnd);
            notify_icon::with_balloon(nid, &shared.icon, notification)
        };

        if !notify_icon::modify(&nid) {
            self.shared.borrow_mut().state.end_balloon();
        }
    }

    pub fn change_icon(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let icon = LoadedIcon::load(Some(path), self.shared.borrow().icon_size);

        let nid = {
            let shared = self.shared.borrow();
            notify_icon::data(self.window.hwnd, shared.uid, &icon, &shared.state.icon)
        };
        notify_icon::modify(&nid);

        // the shell keeps its own copy, the old handle can go now
        let mut shared = self.shared.borrow_mut();
        shared.icon = icon;
        shared.state.icon.set_icon_path(Some(path.to_path_buf()));
    }

    pub fn change_tooltip(&self, tooltip: &str) {
        let nid = {
            let mut shared = self.shared.borrow_mut();
            shared.state.icon.set_tooltip(tooltip);
            shared.notify_data(self.window.hwnd)
        };
        notify_icon::modify(&nid);
    }

    pub fn set_menu(&self, menu: &ContextMenu) {
        let menu = build_menu(menu);
        self.shared.borrow_mut().menu = menu;
    }

    pub fn hide(&self) {
        self.set_visible(false);
    }

    pub fn show(&self) {
        self.set_visible(true);
    }

    fn set_visible(&self, visible: bool) {
        let nid = {
            let mut shared = self.shared.borrow_mut();
            if shared.state.icon.is_visible() == visible {
                return;
            }
            shared.state.icon.set_visible(visible);
            shared.notify_data(self.window.hwnd)
        };
        notify_icon::modify(&nid);
    }

    pub fn is_visible(&self) -> bool {
        self.shared.borrow().state.icon.is_visible()
    }

    pub fn tooltip(&self) -> String {
        self.shared.borrow().state.icon.tooltip().to_owned()
    }

    pub fn has_pending_balloon(&self) -> bool {
        self.shared.borrow().state.icon.pending_balloon().is_some()
    }

    pub fn hwnd(&self) -> HWND {
        self.window.hwnd
    }
}

impl Drop for Tray {
    fn drop(&mut self) {
        let nid = self.shared.borrow().notify_data(self.window.hwnd);
        notify_icon::remove(&nid);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use windows::Win32::Foundation::{LPARAM, WPARAM};
    use windows::Win32::UI::Shell::NIN_BALLOONHIDE;
    use windows::Win32::UI::WindowsAndMessaging::{PostMessageW, WM_COMMAND, WM_LBUTTONUP};

    use super::*;

    // each test registers its own class so parallel teardown can't unregister it early
    fn tray(class_name: &str) -> Tray {
        let config = TrayConfig {
            class_name: class_name.to_string(),
            ..TrayConfig::default()
        };
        Tray::new(&config).unwrap()
    }

    fn post(tray: &Tray, msg: u32, wparam: usize, lparam: isize) {
        unsafe { PostMessageW(Some(tray.hwnd()), msg, WPARAM(wparam), LPARAM(lparam)) }.unwrap();
    }

    #[test]
    fn icon_callbacks_are_polled_in_order() {
        let tray = tray("raytray-test::icon-callbacks");

        // high word carries the icon id, only the low word is the message
        post(&tray, WM_TRAYICON, 0, (0x0003 << 16) | WM_LBUTTONUP as isize);
        post(&tray, WM_TRAYICON, 0, NIN_BALLOONHIDE as isize);

        assert_eq!(tray.poll_event(), Some(TrayEvent::Clicked));
        assert_eq!(tray.poll_event(), Some(TrayEvent::BalloonHidden));
        assert_eq!(tray.poll_event(), None);
    }

    #[test]
    fn menu_command_keeps_last_selection() {
        let tray = tray("raytray-test::menu-command");

        post(&tray, WM_COMMAND, 0x0001_0007, 0);
        post(&tray, WM_COMMAND, 9, 0);

        assert_eq!(tray.poll_menu_selection(), Some(9));
        assert_eq!(tray.poll_menu_selection(), None);
    }

    #[test]
    fn menu_command_uses_low_word() {
        let tray = tray("raytray-test::menu-low-word");

        post(&tray, WM_COMMAND, 0x0001_0007, 0);

        assert_eq!(tray.poll_menu_selection(), Some(7));
    }

    #[test]
    fn polling_dispatches_only_its_own_window() {
        let first = tray("raytray-test::own-window-a");
        let second = tray("raytray-test::own-window-b");

        post(&first, WM_TRAYICON, 0, WM_LBUTTONUP as isize);

        assert_eq!(second.poll_event(), None);
        assert_eq!(first.poll_event(), Some(TrayEvent::Clicked));
    }

    #[test]
    fn dropping_tray_frees_window_context() {
        let tray = tray("raytray-test::teardown");
        let shared = Rc::downgrade(&tray.shared);
        assert_eq!(shared.strong_count(), 2);

        drop(tray);
        assert!(shared.upgrade().is_none());
    }
}
