//! Local account lookup for session owners.

use std::collections::HashMap;

/// Resolves a numeric user id to the account's display name.
pub trait AccountLookup {
    /// Display name for `uid`, or `None` when there is no such account.
    fn real_name(&self, uid: u32) -> Option<String>;
}

/// Reads the system account database (`getpwuid_r`).
///
/// Returns the GECOS field as stored, so names with office or phone
/// subfields come back with their commas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAccounts;

#[cfg(unix)]
impl AccountLookup for SystemAccounts {
    fn real_name(&self, uid: u32) -> Option<String> {
        use nix::unistd::{Uid, User};

        match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => Some(user.gecos.to_string_lossy().into_owned()),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Account lookup for uid {} failed: {}", uid, e);
                None
            }
        }
    }
}

#[cfg(not(unix))]
impl AccountLookup for SystemAccounts {
    fn real_name(&self, _uid: u32) -> Option<String> {
        None
    }
}

/// Fixed uid → name table.
impl AccountLookup for HashMap<u32, String> {
    fn real_name(&self, uid: u32) -> Option<String> {
        self.get(&uid).cloned()
    }
}

impl<A: AccountLookup + ?Sized> AccountLookup for &A {
    fn real_name(&self, uid: u32) -> Option<String> {
        (**self).real_name(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_lookup() {
        let accounts = HashMap::from([(1000, "Alice Example,,,".to_string())]);
        assert_eq!(accounts.real_name(1000).as_deref(), Some("Alice Example,,,"));
        assert_eq!(accounts.real_name(1001), None);
    }

    #[test]
    fn test_lookup_through_reference() {
        let accounts = HashMap::from([(0, "root".to_string())]);
        let by_ref: &dyn AccountLookup = &accounts;
        assert_eq!(by_ref.real_name(0).as_deref(), Some("root"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_lookup_root_exists() {
        // uid 0 always has a passwd entry; its GECOS may be empty.
        assert!(SystemAccounts.real_name(0).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_lookup_unknown_uid() {
        assert_eq!(SystemAccounts.real_name(u32::MAX - 1), None);
    }
}
