//! Bridge metrics.
//!
//! Static counters for session and stream lifecycle, dispatch outcomes,
//! and byte throughput. Exposed via the host's metrics exporter when
//! registered.

use metriken::{Counter, Gauge, metric};

// ── Session lifecycle ────────────────────────────────────────────

#[metric(
    name = "weft/h2/sessions/opened",
    description = "HTTP/2 sessions initialized"
)]
pub static SESSIONS_OPENED: Counter = Counter::new();

#[metric(
    name = "weft/h2/sessions/closed",
    description = "HTTP/2 sessions torn down"
)]
pub static SESSIONS_CLOSED: Counter = Counter::new();

#[metric(
    name = "weft/h2/sessions/active",
    description = "Currently active HTTP/2 sessions"
)]
pub static SESSIONS_ACTIVE: Gauge = Gauge::new();

#[metric(
    name = "weft/h2/connections/closed",
    description = "Bridge connections released"
)]
pub static CONNECTIONS_CLOSED: Counter = Counter::new();

// ── Streams ──────────────────────────────────────────────────────

#[metric(name = "weft/h2/streams/opened", description = "Streams opened")]
pub static STREAMS_OPENED: Counter = Counter::new();

#[metric(name = "weft/h2/streams/closed", description = "Streams closed")]
pub static STREAMS_CLOSED: Counter = Counter::new();

// ── Dispatch ─────────────────────────────────────────────────────

#[metric(
    name = "weft/h2/requests/dispatched",
    description = "Requests handed to the dispatcher"
)]
pub static REQUESTS_DISPATCHED: Counter = Counter::new();

#[metric(
    name = "weft/h2/requests/dispatch_errors",
    description = "Dispatch failures converted to error responses"
)]
pub static DISPATCH_ERRORS: Counter = Counter::new();

// ── Protocol ─────────────────────────────────────────────────────

#[metric(
    name = "weft/h2/protocol_errors",
    description = "Connection-fatal protocol violations"
)]
pub static PROTOCOL_ERRORS: Counter = Counter::new();

// ── Bytes ────────────────────────────────────────────────────────

#[metric(
    name = "weft/h2/bytes/received",
    description = "Bytes fed to the framing engine"
)]
pub static BYTES_RECEIVED: Counter = Counter::new();

#[metric(
    name = "weft/h2/bytes/sent",
    description = "Bytes accepted by the transport"
)]
pub static BYTES_SENT: Counter = Counter::new();
