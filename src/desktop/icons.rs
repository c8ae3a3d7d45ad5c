use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{DecodeError, RegistrationError};
use crate::models::{Bitmap, FileReference, IconAsset};

/// Launcher icon compiled into the binary.
pub const EMBEDDED_ICON: &[u8] = include_bytes!("../../assets/ic_launcher.png");
const EMBEDDED_ICON_NAME: &str = "ic_launcher.png";

/// Finds the default icon on disk. Absolute paths are taken as given,
/// relative ones are looked up next to the executable and then in the
/// working directory. If no file is found the embedded icon is written to
/// `data_dir` and used instead.
pub fn resolve_default_icon(asset: &IconAsset, exe_dir: Option<&Path>, data_dir: &Path) -> IconAsset {
    let candidates = if asset.0.is_absolute() {
        vec![asset.0.clone()]
    } else {
        exe_dir
        .map(|dir| dir.join(&asset.0))
        .into_iter()
        .chain(std::env::current_dir().ok().map(|dir| dir.join(&asset.0)))
        .collect()
    };

    if let Some(found) = candidates.into_iter().find(|path| path.is_file()) {
        return IconAsset(found);
    }

    let extracted = data_dir.join(EMBEDDED_ICON_NAME);
    if !extracted.is_file() {
        if let Err(e) = fs::create_dir_all(data_dir).and_then(|_| fs::write(&extracted, EMBEDDED_ICON)) {
            warn!("Failed to write default icon to {:?}: {}", extracted, e);
            return asset.clone();
        }
        debug!("Wrote embedded icon to {:?}", extracted);
    }
    IconAsset(extracted)
}

/// Decodes a picked image into an RGBA bitmap no larger than `size` on
/// either side.
pub fn decode_icon(reference: &FileReference, size: u32) -> Result<Bitmap, DecodeError> {
    let path = reference
    .to_file_path()
    .ok_or_else(|| DecodeError::NotLocal(reference.to_string()))?;

    let image = image::open(&path)?;
    let rgba = image.thumbnail(size, size).to_rgba8();
    debug!("Decoded icon {:?} at {}x{}", path, rgba.width(), rgba.height());

    Ok(Bitmap {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

pub fn save_bitmap(bitmap: &Bitmap, path: &Path) -> Result<(), RegistrationError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RegistrationError::Io {
            message: "create icon directory".to_string(),
            path: parent.to_path_buf(),
            source: Some(e),
        })?;
    }

    let image = image::RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.rgba.clone())
    .ok_or_else(|| RegistrationError::Io {
        message: "bitmap buffer does not match its dimensions".to_string(),
        path: path.to_path_buf(),
        source: None,
    })?;

    image.save(path)?;
    Ok(())
}
