//! Platform implementation for a desktop session: native file dialogs,
//! a JSON grant table, XDG shortcuts and a spawned executor process.

pub mod desktop_entry;
pub mod executor;
pub mod grants;
pub mod icons;
pub mod shortcuts;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{DecodeError, LaunchError, PermissionError, RegistrationError};
use crate::models::{
    AccessGrant, Bitmap, FileReference, LauncherConfig, LaunchRequest, Orientation, Permissions,
    PickKind, PickOutcome, PickRequest, RequestTag, ShortcutDescriptor, ToastDuration,
};
use crate::platform::{
    DocumentPicker, GrantTable, ImageDecoder, Notifier, PinCallback, ScreenOrientation,
    ShortcutCapabilities, ShortcutHost, TargetLauncher,
};

use self::grants::GrantStore;
use self::shortcuts::ShortcutDirs;

pub struct Toast {
    pub message: String,
    pub duration: ToastDuration,
    /// Set on the first frame that draws the toast. A native picker can
    /// block the UI long before that.
    pub shown_at: Option<Instant>,
}

impl Toast {
    pub fn expired(&self) -> bool {
        self.shown_at
        .is_some_and(|shown_at| shown_at.elapsed().as_secs_f32() >= self.duration.as_secs_f32())
    }
}

pub struct DesktopPlatform {
    grants: GrantStore,
    shortcuts: ShortcutDirs,
    executable: Option<PathBuf>,
    icon_size: u32,
    pending_pick: Option<(RequestTag, PickRequest)>,
    orientation: Orientation,
    toasts: VecDeque<Toast>,
}

impl DesktopPlatform {
    pub fn new(config: &LauncherConfig, data_dir: &Path) -> Self {
        Self::with_shortcuts(config, data_dir, ShortcutDirs::detect(data_dir))
    }

    pub fn with_shortcuts(config: &LauncherConfig, data_dir: &Path, shortcuts: ShortcutDirs) -> Self {
        Self {
            grants: GrantStore::load(&data_dir.join("grants.json")),
            shortcuts,
            executable: config.target.executable.clone(),
            icon_size: config.icon_size,
            pending_pick: None,
            orientation: Orientation::Unspecified,
            toasts: VecDeque::new(),
        }
    }

    pub fn has_pending_pick(&self) -> bool {
        self.pending_pick.is_some()
    }

    /// Shows the native dialog for the queued pick request, if any, and
    /// returns the result for the flow. Picked files receive a transient
    /// grant so they can be persisted afterwards.
    pub fn fulfil_pending_pick(&mut self) -> Option<(RequestTag, PickOutcome)> {
        let (tag, request) = self.pending_pick.take()?;

        let picked = show_file_dialog(&request).and_then(|path| FileReference::from_path(&path));
        let outcome = match picked {
            Some(reference) => {
                if request.persistable {
                    self.grants.grant_transient(&reference, request.grant);
                }
                PickOutcome::Picked(reference)
            }
            None => PickOutcome::Cancelled,
        };

        debug!("Pick {:?} resolved: {:?}", tag, outcome);
        Some((tag, outcome))
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn prune_toasts(&mut self) {
        self.toasts.retain(|toast| !toast.expired());
    }

    /// Starts the display timer of every toast not drawn before.
    pub fn mark_toasts_shown(&mut self) {
        let now = Instant::now();
        for toast in self.toasts.iter_mut().filter(|toast| toast.shown_at.is_none()) {
            toast.shown_at = Some(now);
        }
    }
}

fn show_file_dialog(request: &PickRequest) -> Option<PathBuf> {
    match request.kind {
        PickKind::Document => rfd::FileDialog::new()
        .set_title("Pick a game file")
        .add_filter("Switch games", &["nsp", "xci", "nro"])
        .add_filter("All files", &["*"])
        .pick_file(),
        PickKind::Image => rfd::FileDialog::new()
        .set_title("Select icon (or cancel to use app icon)")
        .add_filter("Images", &["png", "jpg", "jpeg", "ico"])
        .pick_file(),
    }
}

impl GrantTable for DesktopPlatform {
    fn persisted_grants(&self) -> Vec<AccessGrant> {
        self.grants.grants().to_vec()
    }

    fn take_persistable(
        &mut self,
        reference: &FileReference,
        permissions: Permissions,
    ) -> Result<(), PermissionError> {
        self.grants.persist(reference, permissions)
    }
}

impl DocumentPicker for DesktopPlatform {
    fn request_document(&mut self, tag: RequestTag, request: PickRequest) {
        debug!("Queued {:?} pick for {}", tag, request.mime_type());
        self.pending_pick = Some((tag, request));
    }
}

impl ImageDecoder for DesktopPlatform {
    fn decode_image(&mut self, reference: &FileReference) -> Result<Bitmap, DecodeError> {
        icons::decode_icon(reference, self.icon_size)
    }
}

impl ShortcutHost for DesktopPlatform {
    fn shortcut_capabilities(&self) -> ShortcutCapabilities {
        self.shortcuts.capabilities()
    }

    fn request_pin(
        &mut self,
        descriptor: &ShortcutDescriptor,
        callback: Option<PinCallback>,
    ) -> Result<(), RegistrationError> {
        self.shortcuts.install_pinned(descriptor)?;
        if let Some(callback) = callback {
            callback(descriptor);
        }
        Ok(())
    }

    fn add_dynamic(&mut self, descriptor: &ShortcutDescriptor) -> Result<(), RegistrationError> {
        self.shortcuts.install_dynamic(descriptor).map(|_| ())
    }
}

impl ScreenOrientation for DesktopPlatform {
    fn requested_orientation(&self) -> Orientation {
        self.orientation
    }

    fn set_requested_orientation(&mut self, orientation: Orientation) {
        debug!("Requested orientation {:?}", orientation);
        self.orientation = orientation;
    }
}

impl TargetLauncher for DesktopPlatform {
    fn content_type(&self, reference: &FileReference) -> Option<String> {
        executor::content_type_for(reference)
    }

    fn grant_to_target(
        &mut self,
        _package: &str,
        _reference: &FileReference,
        _permissions: Permissions,
    ) -> Result<(), PermissionError> {
        // Desktop processes share the user's file access
        Err(PermissionError::Unsupported)
    }

    fn start(&mut self, request: &LaunchRequest) -> Result<(), LaunchError> {
        executor::spawn(self.executable.as_deref(), request)
    }
}

impl Notifier for DesktopPlatform {
    fn toast(&mut self, message: &str, duration: ToastDuration) {
        info!("{}", message);
        self.toasts.push_back(Toast {
            message: message.to_string(),
            duration,
            shown_at: None,
        });
    }
}
