use std::borrow::Cow;

use crate::models::FileReference;

pub const DEFAULT_LABEL: &str = "Start Game";

/// The three buttons of the "Choose action" dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionChoice {
    StartNow,
    /// Raw text from the label box; blank means "use the suggestion".
    CreateShortcut { label_input: String },
    Cancel,
}

/// Derives a shortcut label from the terminal path segment of a reference.
///
/// Encoded separators are decoded too, so `.../My%2FGame.nsp` becomes
/// `My/Game.nsp`.
pub fn suggest_label(reference: &FileReference) -> String {
    let decoded = percent_decode(reference.raw_last_segment());
    if decoded.trim().is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        decoded.into_owned()
    }
}

pub fn resolve_label(input: &str, suggested: &str) -> String {
    if input.trim().is_empty() {
        suggested.to_string()
    } else {
        input.to_string()
    }
}

fn percent_decode(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        // Invalid UTF-8 after decoding
        Err(_) => {
            let bytes = urlencoding::decode_binary(raw.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
