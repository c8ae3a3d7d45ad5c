//! Durable read/write authorization for picked files.
//!
//! Only the grant table's own records are consulted. A grant whose file
//! has vanished still counts as present until something using it fails.

use tracing::debug;

use crate::error::PermissionError;
use crate::models::{FileReference, Permissions};
use crate::platform::GrantTable;

pub fn has_durable_read<G: GrantTable + ?Sized>(grants: &G, reference: &FileReference) -> bool {
    grants
    .persisted_grants()
    .iter()
    .any(|grant| &grant.reference == reference && grant.permissions.read)
}

/// Callers treat failure as "ignore and continue"; the error is returned so
/// each call site can log it.
pub fn request_durable<G: GrantTable + ?Sized>(
    grants: &mut G,
    reference: &FileReference,
    permissions: Permissions,
) -> Result<(), PermissionError> {
    grants
    .take_persistable(reference, permissions)
    .inspect_err(|e| debug!("Could not persist {:?} for {}: {}", permissions, reference, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::mock::MockPlatform;

    fn reference(raw: &str) -> FileReference {
        FileReference::parse(raw).unwrap()
    }

    #[test]
    fn test_has_durable_read_matches_identity() {
        let mut platform = MockPlatform::default();
        platform.add_durable(&reference("content://docs/document/a.nsp"), Permissions::READ);

        assert!(has_durable_read(&platform, &reference("content://docs/document/a.nsp")));
        assert!(!has_durable_read(&platform, &reference("content://docs/document/b.nsp")));
    }

    #[test]
    fn test_write_only_grant_is_not_read() {
        let mut platform = MockPlatform::default();
        let game = reference("content://docs/document/a.nsp");
        platform.add_durable(&game, Permissions { read: false, write: true });

        assert!(!has_durable_read(&platform, &game));
    }

    #[test]
    fn test_request_durable_reports_failure() {
        let mut platform = MockPlatform::default();
        platform.fail_persist = true;
        let game = reference("content://docs/document/a.nsp");

        assert!(request_durable(&mut platform, &game, Permissions::READ_WRITE).is_err());
        assert!(!has_durable_read(&platform, &game));
    }

    #[test]
    fn test_request_durable_records_grant() {
        let mut platform = MockPlatform::default();
        let game = reference("content://docs/document/a.nsp");

        assert!(request_durable(&mut platform, &game, Permissions::READ_WRITE).is_ok());
        assert!(has_durable_read(&platform, &game));
    }
}
