use core::fmt::{self, Write};

/// Html output buffer for one fragment.
///
/// Gopher text is 8-bit clean, so names and selectors are written as bytes
/// and only the markup itself goes through `fmt::Write`.
pub(crate) struct Out {
    buf: Vec<u8>,
}

impl Out {
    pub fn new() -> Self {
        Out { buf: Vec::new() }
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn str(&mut self, s: &str) -> &mut Self {
        self.raw(s.as_bytes())
    }

    /// Text content, escaping `<`, `>` and `&`.
    pub fn text(&mut self, bytes: &[u8]) -> &mut Self {
        for b in bytes {
            match b {
                b'<' => self.str("&lt;"),
                b'>' => self.str("&gt;"),
                b'&' => self.str("&amp;"),
                _ => self.raw(core::slice::from_ref(b)),
            };
        }
        self
    }

    /// Double quoted attribute value, additionally escaping `"`.
    pub fn attr(&mut self, bytes: &[u8]) -> &mut Self {
        for b in bytes {
            if *b == b'"' {
                self.str("&quot;");
            } else {
                self.text(core::slice::from_ref(b));
            }
        }
        self
    }

    pub fn markup(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        // Writing to a Vec does not fail.
        let _ = self.write_fmt(args);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn flush(self) -> Vec<u8> {
        self.buf
    }
}

impl fmt::Write for Out {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.str(s);
        Ok(())
    }
}

impl fmt::Debug for Out {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Out")
            .field("buf", &String::from_utf8_lossy(&self.buf))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn escape_text(bytes: &[u8]) -> Vec<u8> {
        let mut out = Out::new();
        out.text(bytes);
        out.flush()
    }

    #[test]
    fn escape_markup_in_text() {
        assert_eq!(escape_text(b"a<b>&c"), b"a&lt;b&gt;&amp;c");
        assert_eq!(escape_text(b"\"quoted\""), b"\"quoted\"");
    }

    #[test]
    fn escape_quote_in_attr() {
        let mut out = Out::new();
        out.attr(b"/x?a=\"1\"&b=<2>");
        assert_eq!(out.flush(), b"/x?a=&quot;1&quot;&amp;b=&lt;2&gt;");
    }

    #[test]
    fn bytes_pass_through() {
        let mut out = Out::new();
        out.str("<p>").text(b"caf\xe9").str("</p>");
        assert_eq!(out.flush(), b"<p>caf\xe9</p>");
    }
}
