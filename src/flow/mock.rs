//! Recording platform double for flow tests.

use std::collections::HashMap;

use crate::error::{DecodeError, LaunchError, PermissionError, RegistrationError};
use crate::models::{
    AccessGrant, Bitmap, FileReference, LaunchRequest, LaunchVariant, Orientation, Permissions,
    PickRequest, RequestTag, ShortcutDescriptor, ToastDuration,
};
use crate::platform::{
    DocumentPicker, GrantTable, ImageDecoder, Notifier, PinCallback, ScreenOrientation,
    ShortcutCapabilities, ShortcutHost, TargetLauncher,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Persist(FileReference, Permissions),
    Pick(RequestTag, PickRequest),
    Decode(FileReference),
    Pin { id: String, callback: bool },
    Dynamic(String),
    Orientation(Orientation),
    GrantTarget(String, FileReference),
    Start(LaunchVariant),
    Toast(String),
}

pub struct MockPlatform {
    pub calls: Vec<Call>,
    pub grants: Vec<AccessGrant>,
    pub fail_persist: bool,
    pub images: HashMap<FileReference, Bitmap>,
    pub capabilities: ShortcutCapabilities,
    pub fail_registration: bool,
    pub pinned: Vec<ShortcutDescriptor>,
    pub dynamic: Vec<ShortcutDescriptor>,
    pub orientation: Orientation,
    pub content_types: HashMap<FileReference, String>,
    pub target_grant_supported: bool,
    pub fail_primary: bool,
    pub fail_fallback: bool,
    pub started: Vec<LaunchRequest>,
    pub toasts: Vec<(String, ToastDuration)>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            grants: Vec::new(),
            fail_persist: false,
            images: HashMap::new(),
            capabilities: ShortcutCapabilities {
                registration: true,
                pin_request: true,
                pin_callback: true,
            },
            fail_registration: false,
            pinned: Vec::new(),
            dynamic: Vec::new(),
            orientation: Orientation::Unspecified,
            content_types: HashMap::new(),
            target_grant_supported: true,
            fail_primary: false,
            fail_fallback: false,
            started: Vec::new(),
            toasts: Vec::new(),
        }
    }
}

impl MockPlatform {
    pub fn add_durable(&mut self, reference: &FileReference, permissions: Permissions) {
        self.grants.push(AccessGrant {
            reference: reference.clone(),
            permissions,
            persisted_at: chrono::Utc::now(),
        });
    }

    pub fn picks(&self) -> Vec<RequestTag> {
        self.calls
        .iter()
        .filter_map(|c| match c {
            Call::Pick(tag, _) => Some(*tag),
            _ => None,
        })
        .collect()
    }

    pub fn registrations(&self) -> usize {
        self.calls
        .iter()
        .filter(|c| matches!(c, Call::Pin { .. } | Call::Dynamic(_)))
        .count()
    }
}

impl GrantTable for MockPlatform {
    fn persisted_grants(&self) -> Vec<AccessGrant> {
        self.grants.clone()
    }

    fn take_persistable(
        &mut self,
        reference: &FileReference,
        permissions: Permissions,
    ) -> Result<(), PermissionError> {
        self.calls.push(Call::Persist(reference.clone(), permissions));
        if self.fail_persist {
            return Err(PermissionError::NoTransientGrant(reference.to_string()));
        }
        self.grants.retain(|g| &g.reference != reference);
        self.add_durable(reference, permissions);
        Ok(())
    }
}

impl DocumentPicker for MockPlatform {
    fn request_document(&mut self, tag: RequestTag, request: PickRequest) {
        self.calls.push(Call::Pick(tag, request));
    }
}

impl ImageDecoder for MockPlatform {
    fn decode_image(&mut self, reference: &FileReference) -> Result<Bitmap, DecodeError> {
        self.calls.push(Call::Decode(reference.clone()));
        self.images
        .get(reference)
        .cloned()
        .ok_or_else(|| DecodeError::NotLocal(reference.to_string()))
    }
}

impl ShortcutHost for MockPlatform {
    fn shortcut_capabilities(&self) -> ShortcutCapabilities {
        self.capabilities
    }

    fn request_pin(
        &mut self,
        descriptor: &ShortcutDescriptor,
        callback: Option<PinCallback>,
    ) -> Result<(), RegistrationError> {
        self.calls.push(Call::Pin { id: descriptor.id.clone(), callback: callback.is_some() });
        if self.fail_registration {
            return Err(RegistrationError::Unsupported);
        }
        self.pinned.push(descriptor.clone());
        if let Some(callback) = callback {
            callback(descriptor);
        }
        Ok(())
    }

    fn add_dynamic(&mut self, descriptor: &ShortcutDescriptor) -> Result<(), RegistrationError> {
        self.calls.push(Call::Dynamic(descriptor.id.clone()));
        if self.fail_registration {
            return Err(RegistrationError::Unsupported);
        }
        self.dynamic.push(descriptor.clone());
        Ok(())
    }
}

impl ScreenOrientation for MockPlatform {
    fn requested_orientation(&self) -> Orientation {
        self.orientation
    }

    fn set_requested_orientation(&mut self, orientation: Orientation) {
        self.calls.push(Call::Orientation(orientation));
        self.orientation = orientation;
    }
}

impl TargetLauncher for MockPlatform {
    fn content_type(&self, reference: &FileReference) -> Option<String> {
        self.content_types.get(reference).cloned()
    }

    fn grant_to_target(
        &mut self,
        package: &str,
        reference: &FileReference,
        _permissions: Permissions,
    ) -> Result<(), PermissionError> {
        self.calls.push(Call::GrantTarget(package.to_string(), reference.clone()));
        if self.target_grant_supported {
            Ok(())
        } else {
            Err(PermissionError::Unsupported)
        }
    }

    fn start(&mut self, request: &LaunchRequest) -> Result<(), LaunchError> {
        self.calls.push(Call::Start(request.variant));
        self.started.push(request.clone());
        let fail = match request.variant {
            LaunchVariant::Primary => self.fail_primary,
            LaunchVariant::Fallback => self.fail_fallback,
        };
        if fail {
            Err(LaunchError::TargetUnresolved { component: request.component.clone() })
        } else {
            Ok(())
        }
    }
}

impl Notifier for MockPlatform {
    fn toast(&mut self, message: &str, duration: ToastDuration) {
        self.calls.push(Call::Toast(message.to_string()));
        self.toasts.push((message.to_string(), duration));
    }
}
