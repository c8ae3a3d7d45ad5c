use crate::models::{FileReference, StartupSignal};

#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    /// Started from a shortcut; no instructions, resume with the reference.
    DirectLaunch(FileReference),
    /// Plain app start; show instructions, then pick a file.
    FreshPick,
}

pub fn route(signal: &StartupSignal) -> Route {
    match signal.reference() {
        Some(reference) => Route::DirectLaunch(reference),
        None => Route::FreshPick,
    }
}
