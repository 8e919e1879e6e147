use crate::body::Body;
use crate::engine::HeaderField;

/// Server response: status, headers, and a lazily-pulled body.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: Body,
}

impl Response {
    /// Response with the given status and no body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Response with a status and body.
    pub fn with_body(status: u16, body: impl Into<Body>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Append a header (builder style).
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// HTTP status code (e.g. 200, 404).
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers as (name, value) pairs.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Split into wire header fields (`:status` pseudo-header first) and
    /// the body for submission to the engine.
    pub(crate) fn into_parts(self) -> (Vec<HeaderField>, Body) {
        let mut fields = Vec::with_capacity(self.headers.len() + 1);
        fields.push(HeaderField::new(
            b":status",
            self.status.to_string().as_bytes(),
        ));
        for (name, value) in &self.headers {
            fields.push(HeaderField::new(name.as_bytes(), value.as_bytes()));
        }
        (fields, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_field_comes_first() {
        let response = Response::with_body(200, "ok").header("content-type", "text/plain");
        let (fields, _body) = response.into_parts();
        assert_eq!(fields[0], HeaderField::new(b":status", b"200"));
        assert_eq!(fields[1], HeaderField::new(b"content-type", b"text/plain"));
    }
}
