//! Lazily-pulled response bodies.
//!
//! The framing engine pulls body data chunk by chunk while it serializes
//! DATA frames; nothing is read ahead of what the engine asks for. A
//! [`Body`] reports exactly how many bytes it supplied on each pull and
//! raises the end flag once no more remain.

use std::fs::File;
use std::io::{self, Read};

use bytes::{Buf, Bytes};

/// Response body.
#[derive(Debug, Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// In-memory bytes.
    Bytes(Bytes),
    /// File streamed from disk. The descriptor closes when the body is
    /// dropped, whether or not it was fully read.
    File(File),
}

impl Body {
    /// Fill `buf` with the next chunk.
    ///
    /// Returns the number of bytes supplied and whether the body is
    /// finished. Never blocks beyond a local file read.
    pub fn pull(&mut self, buf: &mut [u8]) -> io::Result<(usize, bool)> {
        match self {
            Body::Empty => Ok((0, true)),
            Body::Bytes(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                bytes.advance(n);
                Ok((n, bytes.is_empty()))
            }
            Body::File(file) => {
                let n = file.read(buf)?;
                Ok((n, n == 0))
            }
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Body::Empty
        } else {
            Body::Bytes(bytes)
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::from(Bytes::from(v))
    }
}

impl From<&[u8]> for Body {
    fn from(s: &[u8]) -> Self {
        Body::from(Bytes::copy_from_slice(s))
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::from(s.as_bytes())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::from(Bytes::from(s.into_bytes()))
    }
}

impl From<File> for Body {
    fn from(file: File) -> Self {
        Body::File(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_is_immediately_done() {
        let mut body = Body::Empty;
        let mut buf = [0u8; 8];
        assert_eq!(body.pull(&mut buf).unwrap(), (0, true));
        // Pulling again stays done.
        assert_eq!(body.pull(&mut buf).unwrap(), (0, true));
    }

    #[test]
    fn bytes_pull_in_chunks() {
        let mut body = Body::from("hello world");
        let mut buf = [0u8; 4];

        let (n, done) = body.pull(&mut buf).unwrap();
        assert_eq!((&buf[..n], done), (&b"hell"[..], false));

        let (n, done) = body.pull(&mut buf).unwrap();
        assert_eq!((&buf[..n], done), (&b"o wo"[..], false));

        let (n, done) = body.pull(&mut buf).unwrap();
        assert_eq!((&buf[..n], done), (&b"rld"[..], true));
    }

    #[test]
    fn empty_string_collapses_to_empty() {
        let mut body = Body::from("");
        let mut buf = [0u8; 8];
        assert_eq!(body.pull(&mut buf).unwrap(), (0, true));
    }

    #[test]
    fn file_pull_reads_to_eof() {
        let path = std::env::temp_dir().join("weft-h2-body-test.txt");
        {
            let mut f = File::create(&path).unwrap();
            f.write_all(b"file contents").unwrap();
        }

        let mut body = Body::from(File::open(&path).unwrap());
        let mut out = Vec::new();
        let mut buf = [0u8; 5];
        loop {
            let (n, done) = body.pull(&mut buf).unwrap();
            out.extend_from_slice(&buf[..n]);
            if done {
                break;
            }
        }
        assert_eq!(out, b"file contents");

        std::fs::remove_file(&path).ok();
    }
}
