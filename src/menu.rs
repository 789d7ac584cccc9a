use serde::{Deserialize, Serialize};

/// Id that turns an entry of [`ContextMenu::from_parallel`] into a separator.
pub const MENU_SEPARATOR: u16 = u16::MAX;
/// Id that terminates the list given to [`ContextMenu::from_parallel`].
pub const MENU_END: u16 = u16::MAX - 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuEntry {
    Item { label: String, id: u16 },
    Separator { separator: bool },
}

impl MenuEntry {
    pub fn item(label: impl Into<String>, id: u16) -> Self {
        Self::Item {
            label: label.into(),
            id,
        }
    }

    pub fn separator() -> Self {
        Self::Separator { separator: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    entries: Vec<MenuEntry>,
}

impl ContextMenu {
    pub fn new(entries: impl IntoIterator<Item = MenuEntry>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|e| !matches!(e, MenuEntry::Separator { separator: false }))
            .collect();
        Self { entries }
    }

    /// Builds a menu from parallel label/id arrays, honouring the
    /// [`MENU_SEPARATOR`] and [`MENU_END`] sentinels.
    pub fn from_parallel<S: AsRef<str>>(labels: &[S], ids: &[u16]) -> Self {
        let entries = labels
            .iter()
            .zip(ids)
            .take_while(|&(_, &id)| id != MENU_END)
            .map(|(label, &id)| match id {
                MENU_SEPARATOR => MenuEntry::separator(),
                id => MenuEntry::item(label.as_ref(), id),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.iter().filter_map(|e| match e {
            MenuEntry::Item { id, .. } => Some(*id),
            MenuEntry::Separator { .. } => None,
        })
    }

    pub fn label_of(&self, id: u16) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            MenuEntry::Item { label, id: item_id } if *item_id == id => Some(label.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    /// The menu's left edge sits at the cursor.
    Left,
    /// The menu's right edge sits at the cursor.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Bottom,
}

/// Where a popup menu is anchored relative to the cursor so it opens
/// towards the centre of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupAlignment {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl PopupAlignment {
    pub fn for_cursor(cursor: (i32, i32), screen: (i32, i32)) -> Self {
        let (x, y) = cursor;
        let (width, height) = screen;

        let horizontal = if x >= width / 2 {
            HorizontalAlign::Right
        } else {
            HorizontalAlign::Left
        };
        let vertical = if y >= height / 2 {
            VerticalAlign::Bottom
        } else {
            VerticalAlign::Top
        };

        Self {
            horizontal,
            vertical,
        }
    }
}
