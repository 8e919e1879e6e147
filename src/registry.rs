//! Per-connection registry of active stream records.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::engine::StreamId;
use crate::request::Request;

/// State for one active HTTP/2 stream.
///
/// Created when a request-initiating HEADERS frame opens the stream,
/// mutated by header-emission and frame events, destroyed on the
/// stream-close notification regardless of whether a response was fully
/// sent.
#[derive(Debug)]
pub(crate) struct StreamRecord {
    stream_id: StreamId,
    request: Request,
    /// A terminal response has been queued for this stream.
    responded: bool,
}

impl StreamRecord {
    pub fn new(stream_id: StreamId) -> Self {
        Self {
            stream_id,
            request: Request::default(),
            responded: false,
        }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn responded(&self) -> bool {
        self.responded
    }

    pub fn mark_responded(&mut self) {
        self.responded = true;
    }
}

/// Duplicate stream id on insert. The engine guarantees ids are never
/// reused within a session, so hitting this is fatal for the connection.
#[derive(Debug, thiserror::Error)]
#[error("duplicate stream id {0}")]
pub(crate) struct DuplicateStream(pub StreamId);

/// Active stream records, keyed by stream id.
///
/// Never holds two records with the same id. No operation blocks, and
/// removal during full-registry traversal is safe (teardown consumes the
/// map through `drain`).
#[derive(Debug, Default)]
pub(crate) struct StreamRegistry {
    streams: HashMap<StreamId, StreamRecord>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: StreamRecord) -> Result<(), DuplicateStream> {
        match self.streams.entry(record.stream_id()) {
            Entry::Occupied(_) => Err(DuplicateStream(record.stream_id())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    #[allow(dead_code)]
    pub fn find(&self, stream_id: StreamId) -> Option<&StreamRecord> {
        self.streams.get(&stream_id)
    }

    pub fn find_mut(&mut self, stream_id: StreamId) -> Option<&mut StreamRecord> {
        self.streams.get_mut(&stream_id)
    }

    /// Remove a record. Removing an absent id is a no-op and returns
    /// `None`.
    pub fn remove(&mut self, stream_id: StreamId) -> Option<StreamRecord> {
        self.streams.remove(&stream_id)
    }

    /// Consume every record. Used only at session teardown.
    pub fn drain(&mut self) -> impl Iterator<Item = StreamRecord> + '_ {
        self.streams.drain().map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_find_remove() {
        let mut registry = StreamRegistry::new();
        registry.insert(StreamRecord::new(1)).unwrap();
        assert!(registry.find_mut(1).is_some());

        let record = registry.remove(1).unwrap();
        assert_eq!(record.stream_id(), 1);
        assert!(registry.find_mut(1).is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut registry = StreamRegistry::new();
        registry.insert(StreamRecord::new(5)).unwrap();
        let err = registry.insert(StreamRecord::new(5)).unwrap_err();
        assert_eq!(err.0, 5);
        // The original record is untouched.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut registry = StreamRegistry::new();
        assert!(registry.remove(7).is_none());
    }

    #[test]
    fn find_never_inserted_returns_none() {
        let mut registry = StreamRegistry::new();
        registry.insert(StreamRecord::new(1)).unwrap();
        assert!(registry.find(3).is_none());
        assert!(registry.find_mut(3).is_none());
    }

    #[test]
    fn drain_consumes_all_records() {
        let mut registry = StreamRegistry::new();
        for id in [1, 3, 5] {
            registry.insert(StreamRecord::new(id)).unwrap();
        }
        let mut ids: Vec<_> = registry.drain().map(|r| r.stream_id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(registry.len(), 0);
    }
}
