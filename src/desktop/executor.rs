use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::LaunchError;
use crate::models::{FileReference, LaunchRequest, BOOT_PATH_ARG};

pub fn content_type_for(reference: &FileReference) -> Option<String> {
    let segment = reference.raw_last_segment();
    let (_, extension) = segment.rsplit_once('.')?;

    let content_type = match extension.to_ascii_lowercase().as_str() {
        "nsp" => "application/x-nx-nsp",
        "xci" => "application/x-nx-xci",
        "nro" => "application/x-nx-nro",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        _ => return None,
    };
    Some(content_type.to_string())
}

pub fn build_command(executable: &Path, request: &LaunchRequest) -> Command {
    let mut cmd = Command::new(executable);
    cmd.arg("--action").arg(&request.action);
    cmd.arg("--component").arg(&request.component);
    cmd.arg("--type").arg(&request.content_type);
    cmd.arg(BOOT_PATH_ARG).arg(&request.boot_path);

    // Local files are passed as plain paths, anything else as the reference
    match request.data.to_file_path() {
        Some(path) => cmd.arg(path),
        None => cmd.arg(request.data.as_str()),
    };
    cmd
}

/// Starts the executor without waiting for it.
pub fn spawn(executable: Option<&Path>, request: &LaunchRequest) -> Result<(), LaunchError> {
    let executable = executable.ok_or_else(|| LaunchError::TargetUnresolved {
        component: request.component.clone(),
    })?;

    let child = build_command(executable, request)
    .spawn()
    .map_err(|source| LaunchError::Spawn {
        program: executable.to_path_buf(),
        source,
    })?;

    info!("Started {:?} (pid {}) with {}", executable, child.id(), request.action);
    Ok(())
}
