//! Desktop rendition of shortcut registration.
//!
//! A pin request drops the entry onto the user's desktop; static
//! registration puts it into the applications menu.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::desktop_entry::{exec_line, DesktopEntry};
use super::icons::save_bitmap;
use crate::error::RegistrationError;
use crate::models::{ShortcutDescriptor, ShortcutIcon, BOOT_PATH_ARG};
use crate::platform::ShortcutCapabilities;

/// Icon theme name used when the default icon file is missing.
pub const THEMED_FALLBACK_ICON: &str = "applications-games";

pub struct ShortcutDirs {
    /// ~/.local/share/applications
    pub apps_dir: Option<PathBuf>,
    /// ~/Desktop
    pub desktop_dir: Option<PathBuf>,
    /// Where picked icons are stored as PNG.
    pub icons_dir: PathBuf,
    /// Program the shortcut re-invokes.
    pub launcher: PathBuf,
}

impl ShortcutDirs {
    pub fn detect(data_dir: &Path) -> Self {
        Self {
            apps_dir: dirs::data_dir().map(|d| d.join("applications")),
            desktop_dir: dirs::desktop_dir().filter(|d| d.is_dir()),
            icons_dir: data_dir.join("icons"),
            launcher: std::env::current_exe().unwrap_or_else(|_| PathBuf::from("kenji-launcher")),
        }
    }

    pub fn capabilities(&self) -> ShortcutCapabilities {
        let pin_request = self.desktop_dir.is_some();
        ShortcutCapabilities {
            registration: self.apps_dir.is_some() || pin_request,
            pin_request,
            pin_callback: pin_request,
        }
    }

    pub fn install_pinned(&self, descriptor: &ShortcutDescriptor) -> Result<PathBuf, RegistrationError> {
        let dir = self.desktop_dir.as_ref().ok_or(RegistrationError::Unsupported)?;
        self.install(descriptor, dir)
    }

    pub fn install_dynamic(&self, descriptor: &ShortcutDescriptor) -> Result<PathBuf, RegistrationError> {
        let dir = self.apps_dir.as_ref().ok_or(RegistrationError::Unsupported)?;
        self.install(descriptor, dir)
    }

    fn install(&self, descriptor: &ShortcutDescriptor, dir: &Path) -> Result<PathBuf, RegistrationError> {
        let icon = match &descriptor.icon {
            ShortcutIcon::Bitmap(bitmap) => {
                let path = self.icons_dir.join(format!("{}.png", descriptor.id));
                save_bitmap(bitmap, &path)?;
                path.to_string_lossy().into_owned()
            }
            ShortcutIcon::Default(asset) => icon_value(&asset.0),
        };

        let entry = DesktopEntry {
            name: descriptor.short_label.clone(),
            comment: Some(descriptor.long_label.clone()),
            exec: exec_line(&self.launcher, &[BOOT_PATH_ARG, &descriptor.launch.boot_path]),
            icon,
            categories: vec!["Game".to_string(), "Emulator".to_string()],
            startup_wm_class: Some("kenji-launcher".to_string()),
        };

        let path = dir.join(format!("{}.desktop", descriptor.id));
        entry.write_to_file(&path)?;
        info!("Installed shortcut {:?}", path);
        Ok(path)
    }

}

fn icon_value(asset: &Path) -> String {
    if asset.is_file() {
        return asset.to_string_lossy().into_owned();
    }
    warn!("Default icon {:?} not found, using themed icon", asset);
    THEMED_FALLBACK_ICON.to_string()
}
