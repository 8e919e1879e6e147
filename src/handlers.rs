//! Frame event handlers: the engine-facing callback implementations.
//!
//! The handlers are pure reactions to protocol events. They mutate the
//! stream registry, run request dispatch, and queue response submissions;
//! they never call back into the engine. Submissions queued here are
//! drained by the session adapter after the engine call returns.

use std::collections::VecDeque;

use bytes::{Buf, BytesMut};
use log::{debug, trace};

use crate::bridge::Transport;
use crate::dispatch::{Dispatcher, error_reply};
use crate::engine::{EngineError, EngineHooks, FrameKind, StreamId};
use crate::metrics;
use crate::registry::{StreamRecord, StreamRegistry};
use crate::response::Response;

/// Connection-scoped state shared by every frame event handler.
pub(crate) struct Core<D> {
    pub streams: StreamRegistry,
    pub dispatcher: D,
    /// Responses queued by handlers, handed to the engine after `feed`
    /// returns (handlers must not re-enter the engine).
    pub pending: VecDeque<(StreamId, Response)>,
    /// Serialized bytes the transport has not yet accepted. Retried on
    /// the next flush; never re-serialized.
    pub tx_carry: BytesMut,
    pub preface_sent: bool,
}

impl<D> Core<D> {
    pub fn new(dispatcher: D) -> Self {
        Self {
            streams: StreamRegistry::new(),
            dispatcher,
            pending: VecDeque::new(),
            tx_carry: BytesMut::new(),
            preface_sent: false,
        }
    }

    /// Queue `data` behind any unsent remainder and push as much as the
    /// transport accepts.
    pub fn stage_and_send<T: Transport>(&mut self, io: &mut T, data: &[u8]) {
        self.tx_carry.extend_from_slice(data);
        self.flush_carry(io);
    }

    /// Push carried bytes to the transport. A short write leaves the
    /// remainder in place for the next flush.
    pub fn flush_carry<T: Transport>(&mut self, io: &mut T) {
        if self.tx_carry.is_empty() {
            return;
        }
        let accepted = io.send(&self.tx_carry);
        metrics::BYTES_SENT.add(accepted as u64);
        self.tx_carry.advance(accepted);
    }
}

/// Borrow of the connection core and transport for the duration of one
/// engine call. This is what the engine sees as its callback target.
pub(crate) struct HookCtx<'a, T, D> {
    pub core: &'a mut Core<D>,
    pub io: &'a mut T,
}

impl<T: Transport, D: Dispatcher> EngineHooks for HookCtx<'_, T, D> {
    fn on_begin_request(&mut self, stream_id: StreamId) -> Result<(), EngineError> {
        trace!("stream {stream_id}: request headers begun");
        self.core
            .streams
            .insert(StreamRecord::new(stream_id))
            .map_err(|e| EngineError::Callback(e.to_string()))?;
        metrics::STREAMS_OPENED.increment();
        Ok(())
    }

    fn on_header(&mut self, stream_id: StreamId, name: &[u8], value: &[u8]) {
        // The stream may already be closed; a late header is not an error.
        if let Some(record) = self.core.streams.find_mut(stream_id) {
            record.request_mut().push_header(name, value);
        }
    }

    fn on_frame_recv(
        &mut self,
        stream_id: StreamId,
        kind: FrameKind,
        end_stream: bool,
    ) -> Result<(), EngineError> {
        if !end_stream {
            return Ok(());
        }
        let core = &mut *self.core;
        // This event can arrive after on_stream_close; a missing record
        // means the stream is already gone.
        let Some(record) = core.streams.find_mut(stream_id) else {
            return Ok(());
        };
        if record.responded() {
            return Ok(());
        }
        trace!("stream {stream_id}: request complete ({kind:?})");

        let response = match core.dispatcher.dispatch(record.request()) {
            Ok(response) => {
                metrics::REQUESTS_DISPATCHED.increment();
                response
            }
            Err(err) => {
                metrics::DISPATCH_ERRORS.increment();
                debug!("stream {stream_id}: dispatch failed: {err}");
                error_reply(err.status())
            }
        };
        record.mark_responded();
        core.pending.push_back((stream_id, response));
        Ok(())
    }

    fn on_stream_close(&mut self, stream_id: StreamId) {
        // Closing an already-absent stream is a no-op.
        if self.core.streams.remove(stream_id).is_some() {
            metrics::STREAMS_CLOSED.increment();
        }
    }

    fn on_send(&mut self, data: &[u8]) {
        self.core.stage_and_send(&mut *self.io, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    struct ThrottledIo {
        accepted: Vec<u8>,
        limit: usize,
    }

    impl Transport for ThrottledIo {
        fn take_readable(&mut self) -> Bytes {
            Bytes::new()
        }

        fn put_back(&mut self, _data: &[u8]) {}

        fn send(&mut self, data: &[u8]) -> usize {
            let n = data.len().min(self.limit);
            self.accepted.extend_from_slice(&data[..n]);
            n
        }
    }

    fn core() -> Core<crate::dispatch::DemoPage> {
        Core::new(crate::dispatch::DemoPage)
    }

    #[test]
    fn short_write_carries_remainder() {
        let mut core = core();
        let mut io = ThrottledIo {
            accepted: Vec::new(),
            limit: 4,
        };

        core.stage_and_send(&mut io, b"0123456789");
        assert_eq!(io.accepted, b"0123");
        assert_eq!(&core.tx_carry[..], b"456789");

        // Each flush retries only the remainder; nothing is duplicated.
        core.flush_carry(&mut io);
        core.flush_carry(&mut io);
        core.flush_carry(&mut io);
        assert_eq!(io.accepted, b"0123456789");
        assert!(core.tx_carry.is_empty());
    }

    #[test]
    fn new_data_queues_behind_carry() {
        let mut core = core();
        let mut io = ThrottledIo {
            accepted: Vec::new(),
            limit: 2,
        };

        core.stage_and_send(&mut io, b"abcd");
        core.stage_and_send(&mut io, b"efgh");
        while !core.tx_carry.is_empty() {
            core.flush_carry(&mut io);
        }
        assert_eq!(io.accepted, b"abcdefgh");
    }
}
