//! Entry identifiers
//!
//! Every logged transaction and replayed statement carries a random
//! [`EntryId`]. The marker type parameter keeps a statement id from being
//! passed where a transaction id is expected; on disk both are a bare UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Marker describing one kind of ledger entry
pub trait EntryKind {
    /// Short tag shown in front of the id in logs
    const TAG: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionEntry;

impl EntryKind for TransactionEntry {
    const TAG: &'static str = "txn";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatementEntry;

impl EntryKind for StatementEntry {
    const TAG: &'static str = "stm";
}

/// Random identifier for an entry of kind `K`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct EntryId<K> {
    uuid: Uuid,
    #[serde(skip)]
    kind: PhantomData<K>,
}

pub type TransactionId = EntryId<TransactionEntry>;
pub type StatementId = EntryId<StatementEntry>;

impl<K: EntryKind> EntryId<K> {
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind: PhantomData,
        }
    }
}

impl<K: EntryKind> Default for EntryId<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// `tag:xxxxxxxx`, the first eight hex digits of the UUID
impl<K: EntryKind> fmt::Display for EntryId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.uuid.simple().to_string();
        write!(f, "{}:{}", K::TAG, &hex[..8])
    }
}
