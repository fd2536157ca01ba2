use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, Weak};

use futures::lock::Mutex;

/// Per-record async mutexes, so the load/check/write sequence of one action
/// never interleaves with another action on the same record.
///
/// The registry only holds weak handles. An entry stays live as long as some
/// caller holds or waits on its mutex, and dead entries are pruned once the
/// map grows past `prune_above`.
pub struct RecordLocks {
    locks: StdMutex<HashMap<String, Weak<Mutex<()>>>>,
    prune_above: usize,
}

impl RecordLocks {
    pub fn new(prune_above: usize) -> Self {
        Self {
            locks: StdMutex::new(HashMap::new()),
            prune_above,
        }
    }

    /// The mutex guarding `record_id`, created on first use.
    pub fn for_record(&self, record_id: &str) -> Arc<Mutex<()>> {
        // The map is only touched in this short section, a poisoned guard is still consistent.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(lock) = locks.get(record_id).and_then(Weak::upgrade) {
            return lock;
        }

        if locks.len() >= self.prune_above {
            locks.retain(|_, lock| lock.strong_count() > 0);
        }

        let lock = Arc::new(Mutex::new(()));
        locks.insert(record_id.to_string(), Arc::downgrade(&lock));
        lock
    }
}

impl Default for RecordLocks {
    fn default() -> Self {
        Self::new(1_024)
    }
}
