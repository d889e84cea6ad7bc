use chrono::{DateTime, Utc};
use shared_models::{AbciEvent, BlockHeader};

use crate::repositories::{CacheStore, KvStore};

/// Execution context of one block: the header, the block's event log, the
/// module store and the events the engine emits while handling the block.
pub struct Context<'a> {
    header: BlockHeader,
    event_history: &'a [AbciEvent],
    store: &'a mut dyn KvStore,
    emitted: Vec<AbciEvent>,
}

impl<'a> Context<'a> {
    /// Create a new context over `store`
    pub fn new(header: BlockHeader, event_history: &'a [AbciEvent], store: &'a mut dyn KvStore) -> Self {
        Self {
            header,
            event_history,
            store,
            emitted: Vec::new(),
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn block_time(&self) -> DateTime<Utc> {
        self.header.time
    }

    pub fn block_height(&self) -> u64 {
        self.header.height
    }

    pub fn store(&self) -> &(dyn KvStore + 'a) {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut (dyn KvStore + 'a) {
        &mut *self.store
    }

    /// Events emitted so far in this block, in emission order.
    pub fn event_history(&self) -> &'a [AbciEvent] {
        self.event_history
    }

    pub fn emit_event(&mut self, event: AbciEvent) {
        self.emitted.push(event);
    }

    pub fn emitted_events(&self) -> &[AbciEvent] {
        &self.emitted
    }

    pub fn take_emitted_events(&mut self) -> Vec<AbciEvent> {
        std::mem::take(&mut self.emitted)
    }

    /// Run `f` against a write-buffered view of the store.
    ///
    /// Writes and emitted events are committed only when `f` returns `Ok`;
    /// on `Err` both are discarded and this context is left untouched.
    pub fn with_cache<T, E>(
        &mut self,
        f: impl FnOnce(&mut Context<'_>) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let header = self.header.clone();
        let event_history = self.event_history;
        let mut cache = CacheStore::new(&mut *self.store);

        let (outcome, emitted) = {
            let mut child = Context {
                header,
                event_history,
                store: &mut cache,
                emitted: Vec::new(),
            };
            let outcome = f(&mut child);
            (outcome, child.emitted)
        };

        if outcome.is_ok() {
            cache.write();
            self.emitted.extend(emitted);
        }
        outcome
    }
}
