use windows::core::PCWSTR;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::menu::{ContextMenu, MenuEntry};
use crate::utils::encode_wide;

/// Native popup menu built from a [`ContextMenu`], destroyed on drop.
#[derive(Debug)]
pub struct PopupMenu(HMENU);

impl PopupMenu {
    pub fn build(menu: &ContextMenu) -> anyhow::Result<Self> {
        let hmenu = unsafe { CreatePopupMenu()? };
        // from here on, drop cleans up if an item fails
        let popup = Self(hmenu);

        for entry in menu.entries() {
            match entry {
                MenuEntry::Item { label, id } => {
                    let label = encode_wide(label);
                    unsafe {
                        AppendMenuW(hmenu, MF_STRING, *id as usize, PCWSTR(label.as_ptr()))?
                    };
                }
                MenuEntry::Separator { .. } => unsafe {
                    AppendMenuW(hmenu, MF_SEPARATOR, 0, PCWSTR::null())?
                },
            }
        }

        Ok(popup)
    }

    pub fn handle(&self) -> HMENU {
        self.0
    }
}

impl Drop for PopupMenu {
    fn drop(&mut self) {
        if let Err(e) = unsafe { DestroyMenu(self.0) } {
            tracing::warn!("Failed to destroy tray menu: {e}");
        }
    }
}
