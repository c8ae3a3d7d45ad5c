//! Building and registering home-screen shortcuts.

use std::ops::{Deref, DerefMut};

use tracing::{debug, info, warn};

use crate::flow::permissions::request_durable;
use crate::models::{
    FileReference, IconAsset, Orientation, Permissions, ShortcutDescriptor, ShortcutIcon,
    ShortcutLaunch,
};
use crate::platform::{GrantTable, ImageDecoder, PinCallback, ScreenOrientation, ShortcutHost};

pub const SHORTCUT_ID_PREFIX: &str = "kenji_game_";
pub const SHORT_LABEL_MAX: usize = 24;

/// Stable id for a game reference. Non-cryptographic; two references may
/// collide, which is accepted.
pub fn shortcut_id(reference: &FileReference) -> String {
    let hash = reference
    .as_str()
    .encode_utf16()
    .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));
    format!("{}{}", SHORTCUT_ID_PREFIX, hash)
}

pub fn short_label(label: &str) -> String {
    label.chars().take(SHORT_LABEL_MAX).collect()
}

pub fn build<P>(
    platform: &mut P,
    game: &FileReference,
    label: &str,
    image: Option<&FileReference>,
    default_icon: &IconAsset,
) -> ShortcutDescriptor
where
    P: GrantTable + ImageDecoder + ?Sized,
{
    let bitmap = image.and_then(|image| {
        if let Err(e) = request_durable(platform, image, Permissions::READ) {
            debug!("Decoding icon without durable grant: {}", e);
        }
        match platform.decode_image(image) {
            Ok(bitmap) => Some(bitmap),
            Err(e) => {
                debug!("Icon decode failed, using default icon: {}", e);
                None
            }
        }
    });

    let icon = match bitmap {
        Some(bitmap) => ShortcutIcon::Bitmap(bitmap),
        None => ShortcutIcon::Default(default_icon.clone()),
    };

    ShortcutDescriptor {
        id: shortcut_id(game),
        short_label: short_label(label),
        long_label: label.to_string(),
        icon,
        launch: ShortcutLaunch {
            data: game.clone(),
            boot_path: game.to_string(),
        },
    }
}

/// Returns true if a registration call was issued. Acceptance by the user
/// is not tracked.
pub fn register<P>(platform: &mut P, descriptor: &ShortcutDescriptor) -> bool
where
    P: ShortcutHost + ScreenOrientation + ?Sized,
{
    let capabilities = platform.shortcut_capabilities();
    if !capabilities.registration {
        warn!("Shortcut registration unavailable, skipping {}", descriptor.id);
        return false;
    }

    let mut host = OrientationLock::acquire(platform, Orientation::Portrait);

    let result = if capabilities.pin_request {
        let callback: Option<PinCallback> = capabilities.pin_callback.then(|| {
            Box::new(|pinned: &ShortcutDescriptor| info!("Shortcut {} pinned", pinned.id))
            as PinCallback
        });
        host.request_pin(descriptor, callback)
    } else {
        host.add_dynamic(descriptor)
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Shortcut registration failed for {}: {}", descriptor.id, e);
            false
        }
    }
}

/// Holds the screen in a fixed orientation and puts the previous one back
/// when dropped.
pub struct OrientationLock<'a, P: ScreenOrientation + ?Sized> {
    host: &'a mut P,
    previous: Orientation,
}

impl<'a, P: ScreenOrientation + ?Sized> OrientationLock<'a, P> {
    pub fn acquire(host: &'a mut P, orientation: Orientation) -> Self {
        let previous = host.requested_orientation();
        host.set_requested_orientation(orientation);
        Self { host, previous }
    }
}

impl<P: ScreenOrientation + ?Sized> Deref for OrientationLock<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.host
    }
}

impl<P: ScreenOrientation + ?Sized> DerefMut for OrientationLock<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.host
    }
}

impl<P: ScreenOrientation + ?Sized> Drop for OrientationLock<'_, P> {
    fn drop(&mut self) {
        self.host.set_requested_orientation(self.previous);
    }
}
