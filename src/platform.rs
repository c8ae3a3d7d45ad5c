//! Contracts the entry flow expects from the outside world.
//!
//! The flow never talks to dialogs, the grant table or the executor
//! directly; it goes through these traits so the same state machine runs
//! against the desktop platform and against test doubles.

use crate::error::{DecodeError, LaunchError, PermissionError, RegistrationError};
use crate::models::{
    AccessGrant, Bitmap, FileReference, LaunchRequest, Orientation, Permissions, PickRequest,
    RequestTag, ShortcutDescriptor, ToastDuration,
};

/// Durable grants that survive process restarts.
pub trait GrantTable {
    fn persisted_grants(&self) -> Vec<AccessGrant>;

    /// Turns a transient grant into a durable one.
    fn take_persistable(
        &mut self,
        reference: &FileReference,
        permissions: Permissions,
    ) -> Result<(), PermissionError>;
}

/// Out-of-process document picker. The answer arrives later through
/// `EntryFlow::on_result` with the same tag.
pub trait DocumentPicker {
    fn request_document(&mut self, tag: RequestTag, request: PickRequest);
}

pub trait ImageDecoder {
    fn decode_image(&mut self, reference: &FileReference) -> Result<Bitmap, DecodeError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShortcutCapabilities {
    /// Any kind of shortcut registration exists at all.
    pub registration: bool,
    /// Interactive "request to pin" is available.
    pub pin_request: bool,
    /// A pin request can report back on success.
    pub pin_callback: bool,
}

/// Invoked by the platform once a pin request has been accepted.
pub type PinCallback = Box<dyn FnOnce(&ShortcutDescriptor)>;

pub trait ShortcutHost {
    fn shortcut_capabilities(&self) -> ShortcutCapabilities;

    fn request_pin(
        &mut self,
        descriptor: &ShortcutDescriptor,
        callback: Option<PinCallback>,
    ) -> Result<(), RegistrationError>;

    fn add_dynamic(&mut self, descriptor: &ShortcutDescriptor) -> Result<(), RegistrationError>;
}

pub trait ScreenOrientation {
    fn requested_orientation(&self) -> Orientation;
    fn set_requested_orientation(&mut self, orientation: Orientation);
}

pub trait TargetLauncher {
    fn content_type(&self, reference: &FileReference) -> Option<String>;

    fn grant_to_target(
        &mut self,
        package: &str,
        reference: &FileReference,
        permissions: Permissions,
    ) -> Result<(), PermissionError>;

    fn start(&mut self, request: &LaunchRequest) -> Result<(), LaunchError>;
}

pub trait Notifier {
    fn toast(&mut self, message: &str, duration: ToastDuration);
}

pub trait Platform:
    GrantTable
    + DocumentPicker
    + ImageDecoder
    + ShortcutHost
    + ScreenOrientation
    + TargetLauncher
    + Notifier
{
}

impl<T> Platform for T where
    T: GrantTable
        + DocumentPicker
        + ImageDecoder
        + ShortcutHost
        + ScreenOrientation
        + TargetLauncher
        + Notifier
{
}
