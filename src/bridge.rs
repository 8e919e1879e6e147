//! Connection bridge: the per-connection object the host event loop
//! drives.
//!
//! The host guarantees serialized dispatch per connection — the three
//! entry points never execute concurrently for the same connection, so no
//! locking is needed anywhere below. Nothing here blocks: reads and
//! writes report partial progress and the host re-invokes the entry
//! points when the socket becomes ready again.

use bytes::Bytes;
use log::debug;

use crate::dispatch::Dispatcher;
use crate::engine::{EngineError, FramingEngine};
use crate::error::Error;
use crate::metrics;
use crate::session::Session;
use crate::settings::Settings;

/// Host transport primitives the bridge runs against. All methods are
/// non-blocking.
pub trait Transport {
    /// Detach all bytes currently buffered for reading. Returns an empty
    /// buffer when nothing is pending.
    fn take_readable(&mut self) -> Bytes;

    /// Put back bytes the consumer did not use; they reappear at the
    /// front of the readable buffer.
    fn put_back(&mut self, data: &[u8]);

    /// Hand bytes to the send path. Returns how many were accepted; the
    /// caller retries the remainder later.
    fn send(&mut self, data: &[u8]) -> usize;

    /// Whether the lower transport layer (e.g. TLS) is ready for
    /// application data. Processing must not proceed until it is.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Uninitialized,
    Active,
    Closing,
    /// Terminal. Entry points fail fast once this is reached.
    Closed,
}

/// Per-connection HTTP/2 bridge.
///
/// Owns the framing-engine session, the stream registry, and the host
/// transport. The host calls [`on_readable`](H2Bridge::on_readable),
/// [`on_writable`](H2Bridge::on_writable) and
/// [`on_idle`](H2Bridge::on_idle) as the socket changes state, and
/// [`close`](H2Bridge::close) to tear the connection down.
pub struct H2Bridge<E, T, D> {
    session: Option<Session<E, D>>,
    io: T,
    state: BridgeState,
}

impl<E, T, D> H2Bridge<E, T, D>
where
    E: FramingEngine,
    T: Transport,
    D: Dispatcher,
{
    /// Initialize the session and send the server preface.
    ///
    /// A failed preface leaves the connection unusable: the session is
    /// torn down and the error returned.
    pub fn open(
        engine_init: impl FnOnce() -> Result<E, EngineError>,
        io: T,
        dispatcher: D,
        settings: &Settings,
    ) -> Result<Self, Error> {
        let mut bridge = Self {
            session: None,
            io,
            state: BridgeState::Uninitialized,
        };
        let mut session = Session::initialize(engine_init, dispatcher)?;
        match session.send_preface(&mut bridge.io, settings) {
            Ok(()) => {
                bridge.session = Some(session);
                bridge.state = BridgeState::Active;
                debug!("h2 session active");
                Ok(bridge)
            }
            Err(e) => {
                session.teardown();
                Err(e)
            }
        }
    }

    /// Data arrived on the socket. Feeds whatever the transport has
    /// buffered (zero bytes is a no-op) and flushes the engine's output.
    pub fn on_readable(&mut self) -> Result<(), Error> {
        self.expect_active()?;
        self.process_round().map(|_| ())
    }

    /// The socket can accept writes again. When the engine reports no
    /// remaining read or write interest the session is finished and gets
    /// released; otherwise pending output is flushed.
    pub fn on_writable(&mut self) -> Result<(), Error> {
        match self.state {
            BridgeState::Active | BridgeState::Closing => {}
            _ => return Err(Error::ConnectionClosed),
        }
        let session = self.session.as_mut().ok_or(Error::ConnectionClosed)?;

        let (want_read, want_write) = session.wants_io();
        if !want_read && !want_write {
            self.state = BridgeState::Closing;
            self.teardown_session();
            return Ok(());
        }

        let flushed = {
            let session = self.session.as_mut().ok_or(Error::ConnectionClosed)?;
            session.flush(&mut self.io)
        };
        if let Err(e) = flushed {
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Periodic processing independent of socket readiness.
    ///
    /// Drains input already buffered on the transport (e.g. pipelined
    /// bytes delivered ahead of a readability notification), looping
    /// until a round consumes nothing. Readiness is re-checked every
    /// round: while the lower layer is mid-handshake, nothing runs.
    pub fn on_idle(&mut self) -> Result<(), Error> {
        self.expect_active()?;
        loop {
            if self.process_round()? == 0 {
                return Ok(());
            }
        }
    }

    /// One feed+flush round. Returns the number of bytes consumed.
    fn process_round(&mut self) -> Result<usize, Error> {
        if !self.io.is_ready() {
            return Ok(0);
        }
        let data = self.io.take_readable();
        if data.is_empty() {
            return Ok(0);
        }

        let fed = {
            let session = self.session.as_mut().ok_or(Error::ConnectionClosed)?;
            session.feed(&mut self.io, &data)
        };
        let consumed = match fed {
            Ok(n) => n,
            Err(e) => return Err(self.fail(e)),
        };
        if consumed < data.len() {
            self.io.put_back(&data[consumed..]);
        }

        let flushed = {
            let session = self.session.as_mut().ok_or(Error::ConnectionClosed)?;
            session.flush(&mut self.io)
        };
        if let Err(e) = flushed {
            return Err(self.fail(e));
        }
        Ok(consumed)
    }

    fn expect_active(&self) -> Result<(), Error> {
        match self.state {
            BridgeState::Active => Ok(()),
            _ => Err(Error::ConnectionClosed),
        }
    }

    /// Connection-level failure: no partial recovery — the engine's state
    /// cannot be resumed after a protocol violation, so the whole session
    /// goes down.
    fn fail(&mut self, err: Error) -> Error {
        debug!("h2 connection failed: {err}");
        self.state = BridgeState::Closing;
        self.teardown_session();
        err
    }
}

impl<E, T, D> H2Bridge<E, T, D> {
    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// The underlying transport.
    pub fn io(&self) -> &T {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Host-initiated teardown. Safe to call at any time; a second call
    /// is a no-op.
    pub fn close(&mut self) {
        if self.state == BridgeState::Closed {
            return;
        }
        self.state = BridgeState::Closing;
        self.teardown_session();
    }

    /// Release the session exactly once and reach the terminal state.
    fn teardown_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.teardown();
            metrics::CONNECTIONS_CLOSED.increment();
        }
        self.state = BridgeState::Closed;
    }
}

impl<E, T, D> Drop for H2Bridge<E, T, D> {
    fn drop(&mut self) {
        // Session teardown (engine handle, then stream records) must
        // precede dropping the transport.
        self.close();
    }
}
