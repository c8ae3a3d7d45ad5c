use serde::{Serialize, Deserialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Carries a shortcut's file reference back into the launcher and on to
/// the executor.
pub const BOOT_PATH_ARG: &str = "--boot-path";
pub const CLIP_LABEL: &str = "GameUri";
pub const WILDCARD_TYPE: &str = "*/*";
pub const IMAGE_TYPE: &str = "image/*";

/// Persistent handle to a user-selected file. Compared by identity of the
/// full reference string, never by the file it points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileReference(Url);

impl FileReference {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw).map(FileReference)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().ok()?.join(path)
        };
        Url::from_file_path(absolute).ok().map(FileReference)
    }

    /// Accepts either a URL or a local filesystem path.
    pub fn from_arg(arg: &str) -> Option<Self> {
        match Self::parse(arg) {
            // Single-letter schemes are Windows drive letters
            Ok(reference) if reference.0.scheme().len() > 1 => Some(reference),
            _ => Self::from_path(Path::new(arg)),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.0.scheme() != "file" {
            return None;
        }
        self.0.to_file_path().ok()
    }

    /// Terminal path segment, still percent-encoded.
    pub fn raw_last_segment(&self) -> &str {
        self.0.path().rsplit('/').next().unwrap_or("")
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub read: bool,
    pub write: bool,
}

impl Permissions {
    pub const READ: Permissions = Permissions { read: true, write: false };
    pub const READ_WRITE: Permissions = Permissions { read: true, write: true };

    pub fn contains(&self, other: Permissions) -> bool {
        (self.read || !other.read) && (self.write || !other.write)
    }

    pub fn union(self, other: Permissions) -> Permissions {
        Permissions {
            read: self.read || other.read,
            write: self.write || other.write,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub reference: FileReference,
    pub permissions: Permissions,
    pub persisted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendingShortcutRequest {
    pub game: FileReference,
    pub label: String,
    pub awaiting_icon: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Asset used whenever no custom icon could be produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconAsset(pub PathBuf);

#[derive(Clone, Debug, PartialEq)]
pub enum ShortcutIcon {
    Bitmap(Bitmap),
    Default(IconAsset),
}

impl ShortcutIcon {
    pub fn is_default(&self) -> bool {
        matches!(self, ShortcutIcon::Default(_))
    }
}

/// What activating a shortcut hands back to the launcher.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortcutLaunch {
    pub data: FileReference,
    pub boot_path: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShortcutDescriptor {
    pub id: String,
    pub short_label: String,
    pub long_label: String,
    pub icon: ShortcutIcon,
    pub launch: ShortcutLaunch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipData {
    pub label: String,
    pub reference: FileReference,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchVariant {
    Primary,
    Fallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaunchRequest {
    pub variant: LaunchVariant,
    pub action: String,
    pub package: String,
    pub component: String,
    pub data: FileReference,
    pub content_type: String,
    pub clip: ClipData,
    pub boot_path: String,
    pub new_task: bool,
    pub grant: Permissions,
}

impl LaunchRequest {
    fn build(
        variant: LaunchVariant,
        action: &str,
        target: &TargetConfig,
        data: &FileReference,
        content_type: &str,
    ) -> Self {
        Self {
            variant,
            action: action.to_string(),
            package: target.package.clone(),
            component: target.component.clone(),
            data: data.clone(),
            content_type: content_type.to_string(),
            clip: ClipData {
                label: CLIP_LABEL.to_string(),
                reference: data.clone(),
            },
            boot_path: data.to_string(),
            new_task: true,
            grant: Permissions::READ_WRITE,
        }
    }

    pub fn primary(target: &TargetConfig, data: &FileReference, content_type: &str) -> Self {
        Self::build(LaunchVariant::Primary, &target.primary_action, target, data, content_type)
    }

    pub fn fallback(target: &TargetConfig, data: &FileReference, content_type: &str) -> Self {
        Self::build(LaunchVariant::Fallback, &target.fallback_action, target, data, content_type)
    }
}

/// How the process was started: from a shortcut (carrying a reference) or fresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StartupSignal {
    pub boot_path: Option<String>,
    pub data: Option<FileReference>,
}

impl StartupSignal {
    pub fn reference(&self) -> Option<FileReference> {
        self.boot_path
        .as_deref()
        .and_then(|raw| FileReference::parse(raw).ok())
        .or_else(|| self.data.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestTag {
    PickGame = 1,
    PickIcon = 2,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PickOutcome {
    Picked(FileReference),
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickKind {
    Document,
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickRequest {
    pub kind: PickKind,
    pub persistable: bool,
    pub grant: Permissions,
}

impl PickRequest {
    pub fn game() -> Self {
        Self { kind: PickKind::Document, persistable: true, grant: Permissions::READ_WRITE }
    }

    pub fn icon() -> Self {
        Self { kind: PickKind::Image, persistable: true, grant: Permissions::READ }
    }

    pub fn mime_type(&self) -> &'static str {
        match self.kind {
            PickKind::Document => WILDCARD_TYPE,
            PickKind::Image => IMAGE_TYPE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Unspecified,
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastDuration {
    Short,
    Long,
}

impl ToastDuration {
    pub fn as_secs_f32(&self) -> f32 {
        match self {
            ToastDuration::Short => 2.0,
            ToastDuration::Long => 3.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub package: String,
    pub component: String,
    pub primary_action: String,
    pub fallback_action: String,
    pub executable: Option<PathBuf>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            package: "org.kenjinx.android".to_string(),
            component: "org.kenjinx.android.MainActivity".to_string(),
            primary_action: "org.kenjinx.android.LAUNCH_GAME".to_string(),
            fallback_action: "android.intent.action.VIEW".to_string(),
            executable: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    pub target: TargetConfig,
    pub default_icon: IconAsset,
    pub icon_size: u32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            default_icon: IconAsset(PathBuf::from("assets/ic_launcher.png")),
            icon_size: 256,
        }
    }
}
