//! Status ledger: the lifecycle state of every `(maker, hash)` pair.
//!
//! Keys absent from a store are implicitly OPEN. Stores accept batches and
//! apply each batch all-or-nothing, refusing any entry that would leave a
//! terminal state.
//!
//! The engine never writes a store directly. It stages transitions in a
//! [`StagedStatus`] overlay while a call runs and commits the overlay only
//! after every transfer succeeded.

use std::collections::HashMap;

use openswap_types::{Result, Status, StatusKey, SwapError};

/// Durable or in-memory map from [`StatusKey`] to [`Status`].
pub trait StatusStore: Send {
    /// Stored status, `None` if never written.
    fn get(&self, key: &StatusKey) -> Option<Status>;

    /// Apply a batch of writes atomically.
    ///
    /// # Errors
    /// [`SwapError::Storage`] if an entry would rewrite a terminal status,
    /// or an I/O error from a durable backend. Nothing is applied on error.
    fn put_all(&mut self, entries: &[(StatusKey, Status)]) -> Result<()>;

    /// Number of keys written.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: StatusStore + ?Sized> StatusStore for Box<S> {
    fn get(&self, key: &StatusKey) -> Option<Status> {
        (**self).get(key)
    }

    fn put_all(&mut self, entries: &[(StatusKey, Status)]) -> Result<()> {
        (**self).put_all(entries)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Check a batch against current contents before anything is written.
pub(crate) fn check_batch(
    current: impl Fn(&StatusKey) -> Option<Status>,
    entries: &[(StatusKey, Status)],
) -> Result<()> {
    let mut seen: HashMap<StatusKey, Status> = HashMap::new();
    for (key, next) in entries {
        let prior = seen
            .get(key)
            .copied()
            .or_else(|| current(key))
            .unwrap_or_default();
        if !prior.can_transition_to(*next) {
            return Err(SwapError::Storage(format!(
                "illegal transition {prior} -> {next} for {key}"
            )));
        }
        seen.insert(*key, *next);
    }
    Ok(())
}

/// Process-local status store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStatusStore {
    entries: HashMap<StatusKey, Status>,
}

impl MemoryStatusStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusStore for MemoryStatusStore {
    fn get(&self, key: &StatusKey) -> Option<Status> {
        self.entries.get(key).copied()
    }

    fn put_all(&mut self, entries: &[(StatusKey, Status)]) -> Result<()> {
        check_batch(|k| self.entries.get(k).copied(), entries)?;
        self.entries.extend(entries.iter().copied());
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Pending transitions layered over a store for the duration of one call.
///
/// Reads consult pending writes before the store. Dropping the overlay
/// discards them.
#[derive(Debug, Default)]
pub struct StagedStatus {
    pending: Vec<(StatusKey, Status)>,
}

impl StagedStatus {
    /// An empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status of `key` in `store`, including pending writes.
    #[must_use]
    pub fn status_of<S: StatusStore + ?Sized>(&self, store: &S, key: &StatusKey) -> Status {
        self.pending
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, s)| *s)
            .or_else(|| store.get(key))
            .unwrap_or_default()
    }

    /// Stage `expected → next` for `key`.
    ///
    /// # Errors
    /// [`SwapError::OrderNotOpen`] if the current status is not `expected`
    /// or the transition is not allowed.
    pub fn transition<S: StatusStore + ?Sized>(
        &mut self,
        store: &S,
        key: StatusKey,
        expected: Status,
        next: Status,
    ) -> Result<()> {
        let actual = self.status_of(store, &key);
        if actual != expected || !actual.can_transition_to(next) {
            return Err(SwapError::OrderNotOpen {
                hash: key.hash,
                expected,
                actual,
            });
        }
        tracing::debug!(key = %key, from = %actual, to = %next, "Status transition staged");
        self.pending.push((key, next));
        Ok(())
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Write every pending transition to `store`.
    ///
    /// # Errors
    /// Whatever the store reports. The store is unchanged on error.
    pub fn commit<S: StatusStore + ?Sized>(self, store: &mut S) -> Result<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        store.put_all(&self.pending)?;
        Ok(self.pending.len())
    }
}
