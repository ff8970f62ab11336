//! Change notifications for the UI.
//!
//! Listeners registered with [`NoteStore::subscribe`] receive
//! [`DataEvent::AboutToChange`] just before the cached table is replaced and
//! [`DataEvent::Changed`] right after.  Listeners run on the thread performing
//! the operation and must not call back into mutating store operations.
//!
//! [`NoteStore::subscribe`]: crate::NoteStore::subscribe

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::state::ConnectionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataEvent {
    AboutToChange,
    Changed { version: u64, rows: usize },
    ConnectionChanged { state: ConnectionState },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&DataEvent) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Listeners {
    inner: Mutex<ListenerSet>,
}

#[derive(Default)]
struct ListenerSet {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&self, listener: Listener) -> SubscriptionId {
        let mut set = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        set.next_id += 1;
        let id = SubscriptionId(set.next_id);
        set.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut set = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let before = set.entries.len();
        set.entries.retain(|(entry_id, _)| *entry_id != id);
        set.entries.len() != before
    }

    pub(crate) fn emit(&self, event: &DataEvent) {
        // call outside the lock so a listener may subscribe or unsubscribe
        let listeners: Vec<Listener> = {
            let set = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            set.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        tracing::trace!(?event, listeners = listeners.len(), "emitting data event");
        for listener in listeners {
            listener(event);
        }
    }
}
