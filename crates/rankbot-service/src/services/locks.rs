//! Per-member locks
//!
//! Every read-modify-write of a member record holds that member's mutex for
//! the whole cycle. All member guards also hold the shared side of a reset
//! barrier; the daily reset takes it exclusively so it never interleaves
//! with a member update.

use std::sync::Arc;

use dashmap::DashMap;
use rankbot_core::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Lock table keyed by member
#[derive(Clone, Default)]
pub struct MemberLocks {
    members: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
    barrier: Arc<RwLock<()>>,
}

/// Held while one or two member records are being updated
pub struct MemberGuard {
    _members: Vec<OwnedMutexGuard<()>>,
    _barrier: OwnedRwLockReadGuard<()>,
}

impl MemberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: UserId) -> Arc<Mutex<()>> {
        self.members.entry(id).or_default().clone()
    }

    /// Lock a single member
    pub async fn lock(&self, id: UserId) -> MemberGuard {
        let barrier = self.barrier.clone().read_owned().await;
        let guard = self.slot(id).lock_owned().await;
        MemberGuard {
            _members: vec![guard],
            _barrier: barrier,
        }
    }

    /// Lock two members in ascending ID order. Locks once when both IDs are equal.
    pub async fn lock_pair(&self, a: UserId, b: UserId) -> MemberGuard {
        let barrier = self.barrier.clone().read_owned().await;
        let (first, second) = if a <= b { (a, b) } else { (b, a) };

        let mut members = Vec::with_capacity(2);
        members.push(self.slot(first).lock_owned().await);
        if second != first {
            members.push(self.slot(second).lock_owned().await);
        }

        MemberGuard {
            _members: members,
            _barrier: barrier,
        }
    }

    /// Wait for in-flight member updates to finish and block new ones
    pub async fn exclusive(&self) -> OwnedRwLockWriteGuard<()> {
        self.barrier.clone().write_owned().await
    }

    /// Drop mutexes nobody is holding or waiting on.
    ///
    /// Only meaningful under `exclusive()`, when no member guard can exist.
    pub fn prune(&self) -> usize {
        let before = self.members.len();
        self.members.retain(|_, slot| Arc::strong_count(slot) > 1);
        before - self.members.len()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl std::fmt::Debug for MemberLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberLocks")
            .field("members", &self.members.len())
            .finish()
    }
}
