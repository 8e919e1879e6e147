//! The framing-engine contract.
//!
//! The engine performs HTTP/2 wire-level encoding/decoding, HPACK header
//! compression, and flow-control bookkeeping. This crate never implements
//! those semantics; it consumes them through [`FramingEngine`] and reacts
//! to protocol events through [`EngineHooks`]. All hook invocations are
//! synchronous: they happen inside `feed` or `serialize`, on the caller's
//! thread, before the call returns.

use crate::body::Body;
use crate::settings::Setting;

/// Protocol stream identifier, unique within a session while the stream
/// is alive. The engine guarantees identifiers are never reused within a
/// session's lifetime.
pub type StreamId = u32;

/// A single header name/value pair in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl HeaderField {
    pub fn new(name: &[u8], value: &[u8]) -> Self {
        Self {
            name: name.to_vec(),
            value: value.to_vec(),
        }
    }
}

/// Frame classification delivered with [`EngineHooks::on_frame_recv`].
///
/// Only HEADERS and DATA frames can carry the end-of-stream flag, so only
/// those are reported; everything else stays inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Data,
    Headers,
}

/// Errors surfaced by the framing engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Engine instance could not be created (resource exhaustion).
    #[error("engine initialization failed: {0}")]
    Init(String),

    /// The engine detected malformed input. The connection must close;
    /// the engine's internal state cannot be resumed afterwards.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// A hook reported an unrecoverable condition back to the engine.
    #[error("callback failure: {0}")]
    Callback(String),

    /// A submission referenced a stream the engine no longer tracks.
    #[error("unknown stream {0}")]
    UnknownStream(StreamId),
}

/// Callbacks the engine invokes while processing input or serializing
/// output.
///
/// Implementations mutate connection-local state only. They must never
/// call back into the engine that invoked them; submissions are queued
/// and handed to the engine after the triggering call returns.
pub trait EngineHooks {
    /// A request-initiating HEADERS frame opened a new stream. Not
    /// invoked for pushed or reserved streams.
    fn on_begin_request(&mut self, stream_id: StreamId) -> Result<(), EngineError>;

    /// The engine decoded one header name/value pair for a stream.
    fn on_header(&mut self, stream_id: StreamId, name: &[u8], value: &[u8]);

    /// A HEADERS or DATA frame finished. `end_stream` marks the client's
    /// final frame on the stream, i.e. the request is complete.
    fn on_frame_recv(
        &mut self,
        stream_id: StreamId,
        kind: FrameKind,
        end_stream: bool,
    ) -> Result<(), EngineError>;

    /// The stream is closed, whether or not a response was fully sent.
    fn on_stream_close(&mut self, stream_id: StreamId);

    /// Serialized bytes are ready for the transport.
    fn on_send(&mut self, data: &[u8]);
}

/// The external HTTP/2 framing engine, one instance per connection.
///
/// `feed` and `serialize` may invoke any number of [`EngineHooks`]
/// callbacks before returning. Submissions (`submit_settings`,
/// `submit_response`) only queue frames; nothing reaches the transport
/// until `serialize` runs.
pub trait FramingEngine {
    /// Hand raw bytes from the transport to the engine. Returns how many
    /// bytes were consumed.
    fn feed(&mut self, data: &[u8], hooks: &mut dyn EngineHooks) -> Result<usize, EngineError>;

    /// Queue the local SETTINGS announcement (part of the preface).
    fn submit_settings(&mut self, settings: &[Setting]) -> Result<(), EngineError>;

    /// Queue a response on a stream. The engine owns `body` and pulls it
    /// lazily while serializing DATA frames, releasing it when the stream
    /// closes.
    fn submit_response(
        &mut self,
        stream_id: StreamId,
        headers: &[HeaderField],
        body: Body,
    ) -> Result<(), EngineError>;

    /// Serialize queued frames, delivering the bytes through
    /// [`EngineHooks::on_send`].
    fn serialize(&mut self, hooks: &mut dyn EngineHooks) -> Result<(), EngineError>;

    /// Whether the engine still expects input from the peer.
    fn wants_read(&self) -> bool;

    /// Whether the engine has frames queued or in progress for output.
    fn wants_write(&self) -> bool;
}
