//! XDG `.desktop` entries for game shortcuts.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::RegistrationError;

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopEntry {
    pub name: String,
    pub comment: Option<String>,
    pub exec: String,
    pub icon: String,
    pub categories: Vec<String>,
    pub startup_wm_class: Option<String>,
}

impl DesktopEntry {
    pub fn to_contents(&self) -> String {
        let mut content = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(content, "[Desktop Entry]");
        let _ = writeln!(content, "Type=Application");
        let _ = writeln!(content, "Name={}", escape_value(&self.name));
        if let Some(ref comment) = self.comment {
            let _ = writeln!(content, "Comment={}", escape_value(comment));
        }
        let _ = writeln!(content, "Exec={}", self.exec);
        let _ = writeln!(content, "Icon={}", self.icon);
        let _ = writeln!(content, "Terminal=false");
        if !self.categories.is_empty() {
            let _ = writeln!(content, "Categories={};", self.categories.join(";"));
        }
        if let Some(ref wm_class) = self.startup_wm_class {
            let _ = writeln!(content, "StartupWMClass={}", wm_class);
        }

        content
    }

    pub fn write_to_file(&self, path: &Path) -> Result<(), RegistrationError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RegistrationError::Io {
                message: "create directory".to_string(),
                path: parent.to_path_buf(),
                source: Some(e),
            })?;
        }

        fs::write(path, self.to_contents()).map_err(|e| RegistrationError::Io {
            message: "write desktop file".to_string(),
            path: path.to_path_buf(),
            source: Some(e),
        })?;

        // Desktop files must be executable to be trusted on the desktop
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| {
                RegistrationError::Io {
                    message: "set permissions".to_string(),
                    path: path.to_path_buf(),
                    source: Some(e),
                }
            })?;
        }

        debug!("Wrote desktop entry to {:?}", path);
        Ok(())
    }
}

/// Builds an `Exec` value from a program and its arguments.
pub fn exec_line(program: &Path, args: &[&str]) -> String {
    std::iter::once(program.to_string_lossy().as_ref())
    .chain(args.iter().copied())
    .map(quote_exec_arg)
    .collect::<Vec<_>>()
    .join(" ")
}

fn quote_exec_arg(arg: &str) -> String {
    // Literal percent signs would otherwise be read as field codes
    let arg = arg.replace('%', "%%");
    let needs_quotes = arg.is_empty()
    || arg
    .chars()
    .any(|c| c.is_whitespace() || "\"'\\><~|&;$*?#()`".contains(c));

    if !needs_quotes {
        return arg;
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn escape_value(value: &str) -> String {
    value
    .replace('\\', "\\\\")
    .replace('\n', "\\n")
    .replace('\t', "\\t")
    .replace('\r', "\\r")
}
