//! On-disk table of durable file grants.
//!
//! A reference picked through the document picker carries a transient grant
//! for the lifetime of this process. Only such a grant (or one that is
//! already durable) can be persisted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::PermissionError;
use crate::models::{AccessGrant, FileReference, Permissions};

pub struct GrantStore {
    path: PathBuf,
    durable: Vec<AccessGrant>,
    transient: HashMap<FileReference, Permissions>,
}

impl GrantStore {
    pub fn load(path: &Path) -> Self {
        let durable = match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str::<Vec<AccessGrant>>(&json).unwrap_or_else(|e| {
                warn!("Ignoring unreadable grant table {:?}: {}", path, e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };

        debug!("Loaded {} durable grants from {:?}", durable.len(), path);

        Self {
            path: path.to_path_buf(),
            durable,
            transient: HashMap::new(),
        }
    }

    pub fn grants(&self) -> &[AccessGrant] {
        &self.durable
    }

    pub fn grant_transient(&mut self, reference: &FileReference, permissions: Permissions) {
        let entry = self.transient.entry(reference.clone()).or_default();
        *entry = entry.union(permissions);
    }

    pub fn persist(
        &mut self,
        reference: &FileReference,
        permissions: Permissions,
    ) -> Result<(), PermissionError> {
        let existing = self
        .durable
        .iter()
        .find(|g| &g.reference == reference)
        .map(|g| g.permissions)
        .unwrap_or_default();
        let transient = self.transient.get(reference).copied().unwrap_or_default();

        if !existing.union(transient).contains(permissions) {
            return Err(PermissionError::NoTransientGrant(reference.to_string()));
        }

        self.durable.retain(|g| &g.reference != reference);
        self.durable.push(AccessGrant {
            reference: reference.clone(),
            permissions: existing.union(permissions),
            persisted_at: chrono::Utc::now(),
        });

        self.save()
    }

    fn save(&self) -> Result<(), PermissionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PermissionError::Store {
                message: "create grant directory".to_string(),
                path: parent.to_path_buf(),
                source: Some(e),
            })?;
        }

        let json = serde_json::to_string_pretty(&self.durable).map_err(|e| PermissionError::Store {
            message: format!("serialize grants: {}", e),
            path: self.path.clone(),
            source: None,
        })?;

        fs::write(&self.path, json).map_err(|e| PermissionError::Store {
            message: "write grant table".to_string(),
            path: self.path.clone(),
            source: Some(e),
        })
    }
}
