use crate::engine::EngineError;

/// Errors produced by the connection bridge.
///
/// Stream-not-found is deliberately absent: a missing record is an
/// expected race between stream close and late frames, and the handlers
/// ignore it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine could not be created; the connection never became
    /// usable.
    #[error("engine init: {0}")]
    EngineInit(#[source] EngineError),

    /// The engine rejected input or a submission. Fatal for the
    /// connection; no partial recovery is attempted.
    #[error("protocol violation: {0}")]
    Protocol(#[source] EngineError),

    /// The initial settings exchange failed. The session was torn down.
    #[error("preface failed: {0}")]
    Preface(#[source] EngineError),

    /// Per-stream dispatch failure. Contained: the stream receives an
    /// error response and the connection continues.
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// A lifecycle entry point was called after the bridge closed.
    #[error("connection closed")]
    ConnectionClosed,
}
