//! HTTP/2 connection layer for the weft server.
//!
//! This crate owns per-connection HTTP/2 protocol state and bridges the
//! host's buffered, non-blocking socket I/O to an external framing engine.
//! The engine performs all wire-level work (frame codec, HPACK, flow
//! control) and is consumed through a narrow callback contract; this crate
//! tracks the streams that are concurrently open on the connection and
//! dispatches a request once its final frame has arrived.
//!
//! # Architecture
//!
//! ```text
//!   host event loop (on_readable / on_writable / on_idle)
//!        |
//!   +----v----------+   feed / serialize   +-----------------+
//!   | H2Bridge      +--------------------->+ framing engine  |
//!   |  Session      |                      | (HTTP/2 codec,  |
//!   |  StreamRegistry+<---- EngineHooks ---+  HPACK, flow)   |
//!   +----+----------+                      +-----------------+
//!        |
//!   Dispatcher (request -> response)
//! ```
//!
//! The engine's callbacks run synchronously inside `feed` and `serialize`.
//! Handlers react by mutating the stream registry and queuing response
//! submissions; they never call back into the engine, so re-entrant frame
//! processing is structurally impossible.
//!
//! # Example
//!
//! ```rust,ignore
//! use weft_h2::{H2Bridge, Response, Settings};
//!
//! let mut bridge = H2Bridge::open(
//!     || Engine::server(),
//!     transport,
//!     |req: &weft_h2::Request| Ok(Response::with_body(200, "hello")),
//!     &Settings::server_default(),
//! )?;
//!
//! // Driven by the host connection manager:
//! bridge.on_readable()?;
//! bridge.on_writable()?;
//! bridge.on_idle()?;
//! ```

pub mod body;
pub mod bridge;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod request;
pub mod response;
pub mod settings;

pub(crate) mod handlers;
pub(crate) mod registry;
pub(crate) mod session;

/// Lazily-pulled response body.
pub use body::Body;
/// Connection lifecycle states.
pub use bridge::BridgeState;
/// Per-connection bridge between the host socket and the framing engine.
pub use bridge::H2Bridge;
/// Host transport primitives the bridge runs against.
pub use bridge::Transport;
/// Fixed demo-page dispatcher.
pub use dispatch::DemoPage;
/// Per-stream dispatch failure, mapped to an error status.
pub use dispatch::DispatchError;
/// Produces the response for a completed request.
pub use dispatch::Dispatcher;
/// Doc-root file dispatcher.
pub use dispatch::StaticFiles;
/// Errors surfaced by the framing engine.
pub use engine::EngineError;
/// Callback contract the engine invokes during feed/serialize.
pub use engine::EngineHooks;
/// Frame classification delivered with end-of-stream notifications.
pub use engine::FrameKind;
/// The external HTTP/2 framing engine.
pub use engine::FramingEngine;
/// A single header name/value pair in wire form.
pub use engine::HeaderField;
/// Protocol stream identifier.
pub use engine::StreamId;
/// Bridge errors.
pub use error::Error;
/// Accumulated request metadata for one stream.
pub use request::Request;
/// Server response: status, headers, body.
pub use response::Response;
/// A single SETTINGS entry.
pub use settings::Setting;
/// SETTINGS identifiers (RFC 7540 Section 6.5.1).
pub use settings::SettingId;
/// Initial settings announced in the server preface.
pub use settings::Settings;
