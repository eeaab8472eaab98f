//! Record lookup collaborator interface.
//!
//! The pipeline never touches storage directly. Whatever owns the records
//! implements [`RecordLookup`] and is handed to the
//! [`BatchArchiver`](crate::archive::BatchArchiver).

use std::collections::HashMap;
use std::future::Future;

use crate::types::{CredentialRecord, RecordId};

/// Resolves identifiers to credential snapshots.
///
/// A miss is `None` (or an absent key for [`lookup_many`](Self::lookup_many)).
/// Backend failures should be logged by the implementation and reported as
/// misses.
pub trait RecordLookup: Send + Sync + 'static {
    /// Resolve a single identifier.
    fn lookup(&self, id: &RecordId) -> impl Future<Output = Option<CredentialRecord>> + Send;

    /// Resolve a set of identifiers. Missing ids are simply absent.
    fn lookup_many(
        &self,
        ids: &[RecordId],
    ) -> impl Future<Output = HashMap<RecordId, CredentialRecord>> + Send {
        async move {
            let mut found = HashMap::with_capacity(ids.len());
            for id in ids {
                if let Some(record) = self.lookup(id).await {
                    found.insert(*id, record);
                }
            }
            found
        }
    }
}

impl RecordLookup for HashMap<RecordId, CredentialRecord> {
    async fn lookup(&self, id: &RecordId) -> Option<CredentialRecord> {
        self.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SecurityMode;

    fn record(ssid: &str) -> CredentialRecord {
        CredentialRecord {
            id: RecordId::new_v4(),
            ssid: ssid.into(),
            password: Some("password1".into()),
            security: SecurityMode::Wpa2,
            hidden: false,
        }
    }

    #[test]
    fn test_map_lookup_hit_and_miss() {
        let home = record("Home");
        let map: HashMap<_, _> = [(home.id, home.clone())].into_iter().collect();

        assert_eq!(tokio_test::block_on(map.lookup(&home.id)), Some(home));
        assert_eq!(tokio_test::block_on(map.lookup(&RecordId::new_v4())), None);
    }

    #[test]
    fn test_default_lookup_many_skips_misses() {
        let a = record("A");
        let c = record("C");
        let map: HashMap<_, _> = [(a.id, a.clone()), (c.id, c.clone())]
            .into_iter()
            .collect();

        let missing = RecordId::new_v4();
        let found = tokio_test::block_on(map.lookup_many(&[a.id, missing, c.id]));
        assert_eq!(found.len(), 2);
        assert!(found.contains_key(&a.id));
        assert!(found.contains_key(&c.id));
        assert!(!found.contains_key(&missing));
    }
}
