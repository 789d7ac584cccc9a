use std::path::Path;

use windows::core::PCWSTR;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::*;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::notification::{Notification, NotificationIcon};
use crate::state::IconState;
use crate::utils::{copy_to_wide_buf, encode_wide};
use crate::windows::message_window::WM_TRAYICON;

/// An icon handle, destroyed on drop when it was loaded from a file.
#[derive(Debug)]
pub struct LoadedIcon {
    handle: HICON,
    owned: bool,
}

impl LoadedIcon {
    /// Loads `path`, falling back to the stock application icon so the tray
    /// still shows something when the file is missing or unreadable.
    pub fn load(path: Option<&Path>, size: i32) -> Self {
        if let Some(path) = path {
            let wide_path = encode_wide(path);
            let handle = unsafe {
                LoadImageW(
                    None,
                    PCWSTR(wide_path.as_ptr()),
                    IMAGE_ICON,
                    size,
                    size,
                    LR_LOADFROMFILE | LR_LOADTRANSPARENT,
                )
            };

            match handle {
                Ok(handle) => {
                    return Self {
                        handle: HICON(handle.0),
                        owned: true,
                    }
                }
                Err(e) => tracing::warn!("Failed to load icon {}: {e}", path.display()),
            }
        }

        let handle = unsafe { LoadIconW(None, IDI_APPLICATION) }.unwrap_or_else(|e| {
            tracing::error!("Failed to load stock application icon: {e}");
            HICON::default()
        });

        Self {
            handle,
            owned: false,
        }
    }

    pub fn handle(&self) -> HICON {
        self.handle
    }
}

impl Drop for LoadedIcon {
    fn drop(&mut self) {
        if self.owned {
            if let Err(e) = unsafe { DestroyIcon(self.handle) } {
                tracing::warn!("Failed to destroy tray icon handle: {e}");
            }
        }
    }
}

/// Balloon flags for `notification`.
pub fn info_flags(notification: &Notification) -> NOTIFY_ICON_INFOTIP_FLAGS {
    let mut flags = match notification.icon_kind() {
        NotificationIcon::None => NIIF_NONE,
        NotificationIcon::Info => NIIF_INFO,
        NotificationIcon::Warning => NIIF_WARNING,
        NotificationIcon::Error => NIIF_ERROR,
        NotificationIcon::User => NIIF_USER | NIIF_LARGE_ICON,
    };

    if !notification.plays_sound() {
        flags = flags | NIIF_NOSOUND;
    }

    flags
}

/// Describes the icon as it should currently appear.
pub fn data(hwnd: HWND, uid: u32, icon: &LoadedIcon, state: &IconState) -> NOTIFYICONDATAW {
    let mut nid = NOTIFYICONDATAW {
        cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: hwnd,
        uID: uid,
        uFlags: NIF_MESSAGE | NIF_ICON | NIF_TIP | NIF_STATE | NIF_SHOWTIP,
        uCallbackMessage: WM_TRAYICON,
        hIcon: icon.handle(),
        dwStateMask: NIS_HIDDEN,
        dwState: if state.is_visible() {
            NOTIFY_ICON_STATE(0)
        } else {
            NIS_HIDDEN
        },
        Anonymous: NOTIFYICONDATAW_0 {
            uVersion: NOTIFYICON_VERSION,
        },
        ..Default::default()
    };
    copy_to_wide_buf(&mut nid.szTip, state.tooltip());
    nid
}

/// Adds the balloon described by `notification` to `nid`.
pub fn with_balloon(
    mut nid: NOTIFYICONDATAW,
    icon: &LoadedIcon,
    notification: &Notification,
) -> NOTIFYICONDATAW {
    nid.uFlags = nid.uFlags | NIF_INFO;
    nid.dwInfoFlags = info_flags(notification);
    nid.hBalloonIcon = icon.handle();
    copy_to_wide_buf(&mut nid.szInfoTitle, notification.title());
    copy_to_wide_buf(&mut nid.szInfo, notification.body());
    nid
}

/// Adds the icon to the notification area. Returns whether the shell accepted it.
pub fn place(nid: &NOTIFYICONDATAW) -> bool {
    unsafe {
        if !Shell_NotifyIconW(NIM_ADD, nid).as_bool() {
            // A crashed process leaves its icon behind until the mouse passes over it
            let _ = Shell_NotifyIconW(NIM_DELETE, nid);
            if !Shell_NotifyIconW(NIM_ADD, nid).as_bool() {
                tracing::error!("Tray icon creation error");
                let _ = Shell_NotifyIconW(NIM_DELETE, nid);
                return false;
            }
        }

        // Balloon lifecycle messages are only sent from version 3 on
        if !Shell_NotifyIconW(NIM_SETVERSION, nid).as_bool() {
            tracing::warn!("Failed to set tray icon version");
        }
    }

    tracing::debug!("Placed tray icon {}", nid.uID);
    true
}

pub fn modify(nid: &NOTIFYICONDATAW) -> bool {
    let ok = unsafe { Shell_NotifyIconW(NIM_MODIFY, nid) }.as_bool();
    if !ok {
        tracing::warn!("Failed to update tray icon {}", nid.uID);
    }
    ok
}

pub fn remove(nid: &NOTIFYICONDATAW) {
    tracing::debug!("Removing tray icon {}", nid.uID);
    if !unsafe { Shell_NotifyIconW(NIM_DELETE, nid) }.as_bool() {
        tracing::warn!("Failed to remove tray icon {}", nid.uID);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_by_default_and_user_icon_is_large() {
        let n = Notification::new("t", "b").icon(NotificationIcon::User);
        assert_eq!(info_flags(&n), NIIF_USER | NIIF_LARGE_ICON | NIIF_NOSOUND);

        let n = Notification::new("t", "b").icon(NotificationIcon::Error).sound(true);
        assert_eq!(info_flags(&n), NIIF_ERROR);
    }

    #[test]
    fn data_reflects_visibility_and_tooltip() {
        let icon = LoadedIcon {
            handle: HICON::default(),
            owned: false,
        };
        let mut state = IconState::new(None, "hello");
        state.set_visible(false);

        let nid = data(HWND::default(), 4, &icon, &state);
        assert_eq!(nid.uID, 4);
        assert_eq!(nid.dwState, NIS_HIDDEN);
        assert_eq!(&nid.szTip[..6], &[104, 101, 108, 108, 111, 0]);

        let nid = with_balloon(nid, &icon, &Notification::new("Saved", "Done"));
        assert_eq!(nid.uFlags & NIF_INFO, NIF_INFO);
        let title: Vec<u16> = "Saved".encode_utf16().collect();
        assert_eq!(&nid.szInfoTitle[..5], title.as_slice());
    }
}
