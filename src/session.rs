//! Session adapter: owns the framing-engine instance for one connection.
//!
//! The adapter is the only code that calls into the engine. Feeding bytes
//! may synchronously trigger any number of handler callbacks (including
//! response dispatch) before returning; submissions those handlers queue
//! are handed to the engine afterwards, and `flush` pushes the serialized
//! frames out. Submissions queue data but do not send it — every feed and
//! every submission is followed by a flush.

use log::debug;

use crate::bridge::Transport;
use crate::dispatch::Dispatcher;
use crate::engine::{EngineError, FramingEngine};
use crate::error::Error;
use crate::handlers::{Core, HookCtx};
use crate::metrics;
use crate::settings::Settings;

pub(crate) struct Session<E, D> {
    engine: E,
    core: Core<D>,
}

impl<E: FramingEngine, D: Dispatcher> Session<E, D> {
    /// Create the engine instance and bind the frame event handlers to
    /// it. Fails only if engine construction itself fails.
    pub fn initialize(
        engine_init: impl FnOnce() -> Result<E, EngineError>,
        dispatcher: D,
    ) -> Result<Self, Error> {
        let engine = engine_init().map_err(Error::EngineInit)?;
        metrics::SESSIONS_OPENED.increment();
        metrics::SESSIONS_ACTIVE.increment();
        Ok(Self {
            engine,
            core: Core::new(dispatcher),
        })
    }

    /// Submit the initial SETTINGS and flush them. Must be called exactly
    /// once, before the first `feed`; on failure the session is unusable
    /// and must be torn down.
    pub fn send_preface<T: Transport>(
        &mut self,
        io: &mut T,
        settings: &Settings,
    ) -> Result<(), Error> {
        debug_assert!(!self.core.preface_sent, "preface sent twice");
        self.engine
            .submit_settings(&settings.entries())
            .map_err(Error::Preface)?;
        self.core.preface_sent = true;
        self.flush(io).map_err(|e| match e {
            Error::Protocol(inner) => Error::Preface(inner),
            other => other,
        })
    }

    /// Hand raw bytes to the engine. Returns how many were consumed.
    pub fn feed<T: Transport>(&mut self, io: &mut T, data: &[u8]) -> Result<usize, Error> {
        debug_assert!(self.core.preface_sent, "feed before preface");
        metrics::BYTES_RECEIVED.add(data.len() as u64);
        let consumed = {
            let mut hooks = HookCtx {
                core: &mut self.core,
                io: &mut *io,
            };
            self.engine.feed(data, &mut hooks).map_err(|e| {
                metrics::PROTOCOL_ERRORS.increment();
                Error::Protocol(e)
            })?
        };
        self.submit_pending()?;
        Ok(consumed)
    }

    /// Hand queued responses to the engine. Called after `feed` so that
    /// handler code never re-enters the engine from inside a callback.
    fn submit_pending(&mut self) -> Result<(), Error> {
        while let Some((stream_id, response)) = self.core.pending.pop_front() {
            let (fields, body) = response.into_parts();
            match self.engine.submit_response(stream_id, &fields, body) {
                Ok(()) => {}
                // The stream can close between dispatch and submission.
                Err(EngineError::UnknownStream(_)) => {}
                Err(e) => {
                    metrics::PROTOCOL_ERRORS.increment();
                    return Err(Error::Protocol(e));
                }
            }
        }
        Ok(())
    }

    /// Serialize queued frames and push them, plus any carried remainder
    /// from an earlier short write, to the transport.
    pub fn flush<T: Transport>(&mut self, io: &mut T) -> Result<(), Error> {
        {
            let mut hooks = HookCtx {
                core: &mut self.core,
                io: &mut *io,
            };
            self.engine
                .serialize(&mut hooks)
                .map_err(Error::Protocol)?;
        }
        self.core.flush_carry(io);
        Ok(())
    }

    /// Remaining read/write interest. Both false means the session is
    /// logically finished and eligible for teardown.
    pub fn wants_io(&self) -> (bool, bool) {
        (
            self.engine.wants_read(),
            self.engine.wants_write() || !self.core.tx_carry.is_empty(),
        )
    }
}

impl<E, D> Session<E, D> {
    /// Release the engine handle first, then every still-live stream
    /// record. Records can hold backing resources (open files) that must
    /// close regardless of protocol state.
    pub fn teardown(self) {
        let Session { engine, mut core } = self;
        drop(engine);
        let abandoned = core.streams.len();
        for record in core.streams.drain() {
            metrics::STREAMS_CLOSED.increment();
            drop(record);
        }
        metrics::SESSIONS_CLOSED.increment();
        metrics::SESSIONS_ACTIVE.decrement();
        debug!("h2 session torn down, {abandoned} streams still open");
    }
}
