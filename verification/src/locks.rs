//! Per-identity mutual exclusion.
//!
//! A fixed table of mutexes indexed by a hash of the identity. Operations on
//! the same identity always take the same stripe and are serialized; distinct
//! identities usually land on different stripes and run in parallel.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};

use idlink_types::Identity;

pub const DEFAULT_STRIPES: usize = 64;

pub struct StripedLocks {
    stripes: Vec<Mutex<()>>,
}

impl StripedLocks {
    /// `count` is clamped to at least one stripe.
    pub fn new(count: usize) -> Self {
        let stripes = (0..count.max(1)).map(|_| Mutex::new(())).collect();
        Self { stripes }
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn index(&self, identity: &Identity) -> usize {
        let mut hasher = DefaultHasher::new();
        identity.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    /// Block until the stripe for `identity` is free.
    pub fn lock(&self, identity: &Identity) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a panic in another holder cannot leave
        // anything half-updated; recover from poisoning.
        self.stripes[self.index(identity)]
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for StripedLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
