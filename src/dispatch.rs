//! Request dispatch: turning a completed request into a response.
//!
//! The dispatcher is an external collaborator from the bridge's point of
//! view; the handlers invoke it synchronously once a stream's request is
//! complete and submit whatever it returns. A failed dispatch becomes an
//! error response on that stream — a stream is never left without a
//! terminal response.

use std::fs::File;
use std::io;
use std::path::PathBuf;

use crate::body::Body;
use crate::request::Request;
use crate::response::Response;

/// Produces the response for a completed request.
pub trait Dispatcher {
    fn dispatch(&mut self, request: &Request) -> Result<Response, DispatchError>;
}

impl<F> Dispatcher for F
where
    F: FnMut(&Request) -> Result<Response, DispatchError>,
{
    fn dispatch(&mut self, request: &Request) -> Result<Response, DispatchError> {
        self(request)
    }
}

/// Per-stream dispatch failure. Recoverable: converted into an error
/// response on the failing stream, never into a connection error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("internal: {0}")]
    Internal(String),
}

impl DispatchError {
    /// HTTP status for the error response.
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound(_) => 404,
            DispatchError::Forbidden(_) => 403,
            DispatchError::Io(e) if e.kind() == io::ErrorKind::NotFound => 404,
            DispatchError::Io(e) if e.kind() == io::ErrorKind::PermissionDenied => 403,
            DispatchError::Io(_) | DispatchError::Internal(_) => 500,
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

/// Canned HTML error reply for a failed dispatch.
pub(crate) fn error_reply(status: u16) -> Response {
    let page = format!(
        "<html><head><title>{status}</title></head><body><h1>{status} {}</h1></body></html>\n",
        reason(status)
    );
    Response::with_body(status, page).header("content-type", "text/html")
}

/// Answers every request with a fixed demo page.
pub struct DemoPage;

const DEMO_PAGE: &str =
    "<html><head><title>weft demo</title></head><body>weft demo</body></html>\n";

impl Dispatcher for DemoPage {
    fn dispatch(&mut self, _request: &Request) -> Result<Response, DispatchError> {
        Ok(Response::with_body(200, DEMO_PAGE).header("content-type", "text/html"))
    }
}

/// Serves files from a document root. The decoded request path is
/// resolved under the root; paths escaping the root are refused.
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, DispatchError> {
        if path.split('/').any(|segment| segment == "..") {
            return Err(DispatchError::Forbidden(path.to_string()));
        }
        Ok(self.root.join(path.trim_start_matches('/')))
    }
}

impl Dispatcher for StaticFiles {
    fn dispatch(&mut self, request: &Request) -> Result<Response, DispatchError> {
        let path = request
            .path()
            .ok_or_else(|| DispatchError::NotFound("request carried no path".to_string()))?;
        let full = self.resolve(path)?;

        let file = File::open(&full).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DispatchError::NotFound(path.to_string()),
            io::ErrorKind::PermissionDenied => DispatchError::Forbidden(path.to_string()),
            _ => DispatchError::Io(e),
        })?;
        if file.metadata()?.is_dir() {
            return Err(DispatchError::NotFound(path.to_string()));
        }

        Ok(Response::with_body(200, Body::File(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for(path: &[u8]) -> Request {
        let mut req = Request::default();
        req.push_header(b":method", b"GET");
        req.push_header(b":path", path);
        req
    }

    #[test]
    fn closure_is_a_dispatcher() {
        let mut count = 0;
        let mut handler = |_req: &Request| -> Result<Response, DispatchError> {
            count += 1;
            Ok(Response::new(204))
        };
        let response = handler.dispatch(&request_for(b"/")).unwrap();
        assert_eq!(response.status(), 204);
        drop(handler);
        assert_eq!(count, 1);
    }

    #[test]
    fn demo_page_answers_everything() {
        let response = DemoPage.dispatch(&request_for(b"/anything")).unwrap();
        assert_eq!(response.status(), 200);
    }

    #[test]
    fn static_files_rejects_traversal() {
        let mut files = StaticFiles::new(std::env::temp_dir());
        let err = files.dispatch(&request_for(b"/../etc/passwd")).unwrap_err();
        assert!(matches!(err, DispatchError::Forbidden(_)));
        assert_eq!(err.status(), 403);
    }

    #[test]
    fn static_files_missing_maps_to_404() {
        let mut files = StaticFiles::new(std::env::temp_dir());
        let err = files
            .dispatch(&request_for(b"/no-such-file-weft-h2"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::NotFound(_)));
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn error_reply_carries_status_page() {
        let response = error_reply(404);
        assert_eq!(response.status(), 404);
        assert_eq!(response.headers()[0].0, "content-type");
    }
}
