//! Accumulated request metadata for one stream.

/// Request metadata, populated incrementally as the engine emits header
/// pairs. The request is complete once the stream's final frame arrives.
#[derive(Debug, Clone, Default)]
pub struct Request {
    method: Option<String>,
    path: Option<String>,
    scheme: Option<String>,
    authority: Option<String>,
    headers: Vec<(String, String)>,
}

impl Request {
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Request path with any query suffix stripped and percent-escapes
    /// decoded.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Regular (non-pseudo) headers in arrival order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Record one header pair emitted by the engine. Pseudo-headers are
    /// routed to their fields; only the first `:path` value is kept.
    pub(crate) fn push_header(&mut self, name: &[u8], value: &[u8]) {
        match name {
            b":method" => self.method = Some(lossy(value)),
            b":path" => {
                if self.path.is_none() {
                    self.path = Some(decode_path(value));
                }
            }
            b":scheme" => self.scheme = Some(lossy(value)),
            b":authority" => self.authority = Some(lossy(value)),
            _ if name.first() == Some(&b':') => {}
            _ => self.headers.push((lossy(name), lossy(value))),
        }
    }
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Strip the query suffix, then percent-decode the path component.
fn decode_path(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == b'?').unwrap_or(raw.len());
    percent_decode(&raw[..end])
}

fn percent_decode(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%'
            && i + 2 < raw.len()
            && let (Some(hi), Some(lo)) = (hex_val(raw[i + 1]), hex_val(raw[i + 2]))
        {
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_pseudo_headers() {
        let mut req = Request::default();
        req.push_header(b":method", b"GET");
        req.push_header(b":path", b"/index.html");
        req.push_header(b":scheme", b"https");
        req.push_header(b":authority", b"example.com");
        req.push_header(b"accept", b"text/html");

        assert_eq!(req.method(), Some("GET"));
        assert_eq!(req.path(), Some("/index.html"));
        assert_eq!(req.scheme(), Some("https"));
        assert_eq!(req.authority(), Some("example.com"));
        assert_eq!(req.headers(), &[("accept".into(), "text/html".into())]);
    }

    #[test]
    fn strips_query_suffix() {
        let mut req = Request::default();
        req.push_header(b":path", b"/search?q=weft&page=2");
        assert_eq!(req.path(), Some("/search"));
    }

    #[test]
    fn decodes_percent_escapes() {
        let mut req = Request::default();
        req.push_header(b":path", b"/a%20b/c%2Fd");
        assert_eq!(req.path(), Some("/a b/c/d"));
    }

    #[test]
    fn malformed_escape_passes_through() {
        let mut req = Request::default();
        req.push_header(b":path", b"/bad%zz%2");
        assert_eq!(req.path(), Some("/bad%zz%2"));
    }

    #[test]
    fn first_path_value_wins() {
        let mut req = Request::default();
        req.push_header(b":path", b"/first");
        req.push_header(b":path", b"/second");
        assert_eq!(req.path(), Some("/first"));
    }

    #[test]
    fn unknown_pseudo_headers_are_dropped() {
        let mut req = Request::default();
        req.push_header(b":protocol", b"websocket");
        assert!(req.headers().is_empty());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut req = Request::default();
        req.push_header(b"Content-Type", b"text/plain");
        assert_eq!(req.header("content-type"), Some("text/plain"));
    }
}
