use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::menu::{ContextMenu, MenuEntry};

fn default_tooltip() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_icon_size() -> i32 {
    64
}

fn default_class_name() -> String {
    #[cfg(debug_assertions)]
    let name = concat!(env!("CARGO_PKG_NAME"), "-debug::tray-window");
    #[cfg(not(debug_assertions))]
    let name = concat!(env!("CARGO_PKG_NAME"), "::tray-window");

    name.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayConfig {
    /// `.ico` file shown in the notification area. The stock application
    /// icon is used when unset or unreadable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,

    #[serde(default = "default_tooltip")]
    pub tooltip: String,

    #[serde(default = "default_icon_size")]
    pub icon_size: i32,

    #[serde(default = "default_class_name")]
    pub class_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub menu: Vec<MenuEntry>,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            icon: None,
            tooltip: default_tooltip(),
            icon_size: default_icon_size(),
            class_name: default_class_name(),
            menu: Vec::new(),
        }
    }
}

impl TrayConfig {
    #[cfg(debug_assertions)]
    pub const FILENAME: &'static str = "raytray.debug.toml";
    #[cfg(not(debug_assertions))]
    pub const FILENAME: &'static str = "raytray.toml";

    pub fn new(icon: Option<PathBuf>, tooltip: impl Into<String>) -> Self {
        Self {
            icon,
            tooltip: tooltip.into(),
            ..Default::default()
        }
    }

    pub fn with_menu(mut self, menu: &ContextMenu) -> Self {
        self.menu = menu.entries().to_vec();
        self
    }

    pub fn context_menu(&self) -> ContextMenu {
        ContextMenu::new(self.menu.iter().cloned())
    }

    pub fn path() -> anyhow::Result<PathBuf> {
        dirs::config_dir()
            .context("Could not determine config directory")
            .map(|dir| dir.join(Self::FILENAME))
    }

    /// Loads the config from [`TrayConfig::path`], or defaults if there is none.
    pub fn load() -> anyhow::Result<Self> {
        let config_file = Self::path()?;

        if config_file.exists() {
            Self::from_file(&config_file)
        } else {
            tracing::info!(
                "Config file not found at {}, using default config",
                config_file.display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        tracing::info!("Loading config from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        tracing::info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: TrayConfig = toml::from_str("tooltip = \"Hello\"").unwrap();
        assert_eq!(config.tooltip, "Hello");
        assert_eq!(config.icon, None);
        assert_eq!(config.icon_size, 64);
        assert!(config.context_menu().is_empty());
    }

    #[test]
    fn menu_tables_parse_items_and_separators() {
        let config: TrayConfig = toml::from_str(
            r#"
            icon = "assets/raylib.ico"

            [[menu]]
            label = "Show window"
            id = 1

            [[menu]]
            separator = true

            [[menu]]
            label = "Quit"
            id = 2
            "#,
        )
        .unwrap();

        let menu = config.context_menu();
        assert_eq!(
            menu.entries(),
            [
                MenuEntry::item("Show window", 1),
                MenuEntry::separator(),
                MenuEntry::item("Quit", 2),
            ]
        );
        assert_eq!(config.icon, Some(PathBuf::from("assets/raylib.ico")));
    }

    #[test]
    fn new_without_icon_keeps_other_defaults() {
        let config = TrayConfig::new(None, "tip");
        assert_eq!(config.icon, None);
        assert_eq!(config.tooltip, "tip");
        assert_eq!(config.icon_size, default_icon_size());
        assert_eq!(config.class_name, default_class_name());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(TrayConfig::FILENAME);

        let menu = ContextMenu::from_parallel(&["Quit"], &[7]);
        let config = TrayConfig::new(Some("tray.ico".into()), "Saved tooltip").with_menu(&menu);
        config.save(&path).unwrap();

        let loaded = TrayConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "icon_size = \"big\"").unwrap();

        let err = TrayConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
