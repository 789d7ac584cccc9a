use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use windows::core::*;
use windows::Win32::Foundation::*;
use windows::Win32::System::LibraryLoader::*;
use windows::Win32::UI::Shell::*;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::bridge::MessagePump;
use crate::event::TrayEvent;
use crate::menu::{HorizontalAlign, PopupAlignment, VerticalAlign};
use crate::utils::encode_wide;
use crate::windows::{notify_icon, Shared};

/// Message the shell sends to the tray window for icon interactions.
pub const WM_TRAYICON: u32 = WM_APP + 9;

static WM_TASKBARCREATED: LazyLock<u32> =
    LazyLock::new(|| unsafe { RegisterWindowMessageA(s!("TaskbarCreated")) });

/// What a tray callback message asks the window procedure to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconMessage {
    Event(TrayEvent),
    ContextMenu,
    Ignored,
    Unknown(u32),
}

impl IconMessage {
    /// Classifies the low word of a [`WM_TRAYICON`] lParam.
    pub fn classify(code: u32) -> Self {
        match code {
            WM_LBUTTONUP => Self::Event(TrayEvent::Clicked),
            WM_LBUTTONDBLCLK => Self::Event(TrayEvent::DoubleClicked),
            NIN_BALLOONTIMEOUT => Self::Event(TrayEvent::BalloonTimedOut),
            NIN_BALLOONHIDE => Self::Event(TrayEvent::BalloonHidden),
            NIN_BALLOONUSERCLICK => Self::Event(TrayEvent::BalloonClicked),
            WM_RBUTTONUP => Self::ContextMenu,
            WM_MOUSEMOVE | WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_RBUTTONDBLCLK | WM_MBUTTONDOWN
            | WM_MBUTTONUP | WM_MBUTTONDBLCLK | NIN_BALLOONSHOW => Self::Ignored,
            code => Self::Unknown(code),
        }
    }
}

struct WndProcUserData {
    shared: Rc<RefCell<Shared>>,
}

impl WndProcUserData {
    unsafe fn from_hwnd<'a>(hwnd: HWND) -> Option<&'a Self> {
        (GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const Self).as_ref()
    }
}

/// The invisible tool window that receives shell callbacks for one icon.
///
/// Destroying it frees the context handed to the window procedure.
pub struct TrayWindow {
    pub hwnd: HWND,
    hinstance: HINSTANCE,
    class_name: Vec<u16>,
}

impl TrayWindow {
    pub unsafe fn create(class_name: &str, shared: Rc<RefCell<Shared>>) -> anyhow::Result<Self> {
        let hinstance: HINSTANCE = GetModuleHandleW(None)?.into();
        let class_name = encode_wide(class_name);

        let wc = WNDCLASSW {
            hInstance: hinstance,
            lpszClassName: PCWSTR(class_name.as_ptr()),
            lpfnWndProc: Some(wndproc_tray_window),
            ..Default::default()
        };

        // Fails harmlessly when another tray in this process registered it already
        if RegisterClassW(&wc) == 0 {
            tracing::debug!("Tray window class not registered: {}", Error::from_win32());
        }

        let userdata = Box::into_raw(Box::new(WndProcUserData { shared }));

        let hwnd = CreateWindowExW(
            // WS_EX_TOOLWINDOW keeps this window out of the taskbar and alt-tab
            WS_EX_NOACTIVATE | WS_EX_TOOLWINDOW,
            PCWSTR(class_name.as_ptr()),
            w!("Tray Icon"),
            WS_OVERLAPPED,
            CW_USEDEFAULT,
            0,
            CW_USEDEFAULT,
            0,
            None,
            None,
            Some(hinstance),
            Some(userdata as _),
        );

        let hwnd = match hwnd {
            Ok(hwnd) => hwnd,
            Err(e) => {
                drop(Box::from_raw(userdata));
                return Err(e.into());
            }
        };

        tracing::debug!("Created tray window {hwnd:?}");

        Ok(Self {
            hwnd,
            hinstance,
            class_name,
        })
    }
}

impl MessagePump for TrayWindow {
    fn pump(&self) {
        let mut msg = MSG::default();
        unsafe {
            while PeekMessageW(&mut msg, Some(self.hwnd), 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}

impl Drop for TrayWindow {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = DestroyWindow(self.hwnd) {
                tracing::error!("Failed to destroy tray window: {e}");
            }

            // Still in use while another tray of this process is alive
            if let Err(e) = UnregisterClassW(PCWSTR(self.class_name.as_ptr()), Some(self.hinstance))
            {
                tracing::debug!("Tray window class not unregistered: {e}");
            }
        }
    }
}

unsafe fn show_context_menu(hwnd: HWND, hmenu: HMENU) {
    let mut cursor = POINT::default();
    if let Err(e) = GetCursorPos(&mut cursor) {
        tracing::warn!("Failed to get cursor position for tray menu: {e}");
        return;
    }

    let screen = (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN));
    let alignment = PopupAlignment::for_cursor((cursor.x, cursor.y), screen);

    let horizontal = match alignment.horizontal {
        HorizontalAlign::Left => TPM_LEFTALIGN,
        HorizontalAlign::Right => TPM_RIGHTALIGN,
    };
    let vertical = match alignment.vertical {
        VerticalAlign::Top => TPM_TOPALIGN,
        VerticalAlign::Bottom => TPM_BOTTOMALIGN,
    };
    let flags = TPM_RIGHTBUTTON | horizontal | vertical;

    // The menu only closes on an outside click if its owner is foreground
    let _ = SetForegroundWindow(hwnd);
    let _ = TrackPopupMenu(hmenu, flags, cursor.x, cursor.y, None, hwnd, None);
    let _ = PostMessageW(Some(hwnd), WM_NULL, WPARAM(0), LPARAM(0));
}

unsafe fn handle_icon_message(hwnd: HWND, shared: &RefCell<Shared>, code: u32) {
    match IconMessage::classify(code) {
        IconMessage::Event(event) => {
            tracing::trace!("Tray icon event: {event}");
            match shared.try_borrow_mut() {
                Ok(mut shared) => shared.state.record_icon_event(event),
                // re-entered while the application holds the state
                Err(_) => tracing::warn!("Tray state busy, dropped {event}"),
            }
        }

        IconMessage::ContextMenu => {
            // TrackPopupMenu runs a nested message loop, hold no borrow across it
            let hmenu = shared
                .try_borrow()
                .ok()
                .and_then(|shared| shared.menu.as_ref().map(|m| m.handle()));
            if let Some(hmenu) = hmenu {
                show_context_menu(hwnd, hmenu);
            }
        }

        IconMessage::Ignored => {}

        IconMessage::Unknown(code) => {
            tracing::debug!("Unrecognised tray icon message: {code:#x}");
        }
    }
}

unsafe extern "system" fn wndproc_tray_window(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // Initialize GWLP_USERDATA
        WM_CREATE => {
            let create_struct = &*(lparam.0 as *const CREATESTRUCTW);
            let userdata = create_struct.lpCreateParams as *const WndProcUserData;
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, userdata as _);
        }

        WM_TRAYICON => {
            if let Some(userdata) = WndProcUserData::from_hwnd(hwnd) {
                handle_icon_message(hwnd, &userdata.shared, (lparam.0 & 0xFFFF) as u32);
            }
            return LRESULT(0);
        }

        WM_COMMAND => {
            if let Some(userdata) = WndProcUserData::from_hwnd(hwnd) {
                let id = (wparam.0 & 0xFFFF) as u16;
                tracing::debug!("Tray menu item {id} selected");
                match userdata.shared.try_borrow_mut() {
                    Ok(mut shared) => shared.state.bridge.select_menu_item(id),
                    Err(_) => tracing::warn!("Tray state busy, dropped menu selection {id}"),
                }
            }
            return LRESULT(0);
        }

        // Handle taskbar recreation (explorer.exe restart)
        msg if msg == *WM_TASKBARCREATED => {
            if let Some(userdata) = WndProcUserData::from_hwnd(hwnd) {
                tracing::info!("Taskbar recreated, placing tray icon again");
                let nid = userdata
                    .shared
                    .try_borrow()
                    .ok()
                    .map(|shared| shared.notify_data(hwnd));
                if let Some(nid) = nid {
                    notify_icon::place(&nid);
                }
            }
        }

        WM_DESTROY => {
            // Drop userdata
            let userdata = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut WndProcUserData;
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            if !userdata.is_null() {
                drop(Box::from_raw(userdata));
            }
        }

        _ => {}
    }

    DefWindowProcW(hwnd, msg, wparam, lparam)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_clicks_and_balloon_lifecycle() {
        assert_eq!(
            IconMessage::classify(WM_LBUTTONUP),
            IconMessage::Event(TrayEvent::Clicked)
        );
        assert_eq!(
            IconMessage::classify(WM_LBUTTONDBLCLK),
            IconMessage::Event(TrayEvent::DoubleClicked)
        );
        assert_eq!(
            IconMessage::classify(NIN_BALLOONUSERCLICK),
            IconMessage::Event(TrayEvent::BalloonClicked)
        );
        assert_eq!(
            IconMessage::classify(NIN_BALLOONTIMEOUT),
            IconMessage::Event(TrayEvent::BalloonTimedOut)
        );
        assert_eq!(
            IconMessage::classify(NIN_BALLOONHIDE),
            IconMessage::Event(TrayEvent::BalloonHidden)
        );
    }

    #[test]
    fn right_click_opens_menu_and_noise_is_ignored() {
        assert_eq!(IconMessage::classify(WM_RBUTTONUP), IconMessage::ContextMenu);
        assert_eq!(IconMessage::classify(WM_MOUSEMOVE), IconMessage::Ignored);
        assert_eq!(IconMessage::classify(NIN_BALLOONSHOW), IconMessage::Ignored);
        assert_eq!(IconMessage::classify(WM_MBUTTONDBLCLK), IconMessage::Ignored);
        assert_eq!(IconMessage::classify(0x7777), IconMessage::Unknown(0x7777));
    }
}
