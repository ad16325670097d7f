//! Gopher item types.
//!
//! Every gopher menu line, and every gopher url path, starts with a single
//! byte telling what kind of resource is referenced. RFC 1436 defines the
//! digits and a few letters, the rest are de-facto extensions seen on
//! servers in the wild.

use core::fmt;

/// Kind of resource referenced by a menu line or url.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    /// `0` plain text file.
    Text,
    /// `1` gopher menu.
    Directory,
    /// `2` CSO phone book server.
    CsoSearch,
    /// `3` error line inside a menu.
    Error,
    /// `4` BinHex encoded file.
    BinHex,
    /// `5` binary archive.
    BinArchive,
    /// `6` uuencoded file.
    UuEncoded,
    /// `7` full text search, answered with a menu.
    Query,
    /// `8` telnet session.
    Telnet,
    /// `9` generic binary.
    Binary,
    /// `+` redundant server for the previous item.
    DuplicateServer,
    /// `.` a dot alone on a line, ends the menu.
    EndOfPage,
    /// `g` GIF image.
    Gif,
    /// `I` image of some kind, usually jpeg.
    Image,
    /// `T` tn3270 session.
    Tn3270,
    /// `h` html file or external url.
    Html,
    /// `i` informational text, not a link.
    Info,
    /// `s` sound file.
    Sound,
    /// `d` PDF (non-standard).
    PdfAlt,
    /// `p` PNG image (non-standard).
    Png,
    /// `M` MIME multipart.
    Mime,
    /// `P` PDF (non-standard).
    Pdf,
    /// `:` bitmap image (gopher+).
    Bitmap,
    /// `;` movie or sound (gopher+).
    Movie,
    /// `c` calendar.
    Calendar,
    /// `e` calendar event.
    Event,
    /// `m` mbox file.
    Mbox,
    /// Anything else.
    Unknown(u8),
}

impl ItemType {
    pub fn tag(&self) -> u8 {
        use ItemType::*;
        match self {
            Text => b'0',
            Directory => b'1',
            CsoSearch => b'2',
            Error => b'3',
            BinHex => b'4',
            BinArchive => b'5',
            UuEncoded => b'6',
            Query => b'7',
            Telnet => b'8',
            Binary => b'9',
            DuplicateServer => b'+',
            EndOfPage => b'.',
            Gif => b'g',
            Image => b'I',
            Tn3270 => b'T',
            Html => b'h',
            Info => b'i',
            Sound => b's',
            PdfAlt => b'd',
            Png => b'p',
            Mime => b'M',
            Pdf => b'P',
            Bitmap => b':',
            Movie => b';',
            Calendar => b'c',
            Event => b'e',
            Mbox => b'm',
            Unknown(b) => *b,
        }
    }

    /// The MIME type of the resource, when it is a well known format.
    pub fn mime(&self) -> Option<&'static str> {
        use ItemType::*;
        let m = match self {
            Text => "text/plain",
            // The menu types are turned into html by the transcoder.
            Directory | Query => "text/html;charset=UTF-8",
            Gif => "image/gif",
            Html => "text/html",
            PdfAlt | Pdf => "application/pdf",
            Png => "image/png",
            _ => return None,
        };
        Some(m)
    }

    /// Whether the resource is a menu that must be transcoded to html.
    pub fn needs_transcode(&self) -> bool {
        matches!(self, ItemType::Directory | ItemType::Query)
    }
}

impl From<u8> for ItemType {
    fn from(value: u8) -> Self {
        use ItemType::*;
        match value {
            b'0' => Text,
            b'1' => Directory,
            b'2' => CsoSearch,
            b'3' => Error,
            b'4' => BinHex,
            b'5' => BinArchive,
            b'6' => UuEncoded,
            b'7' => Query,
            b'8' => Telnet,
            b'9' => Binary,
            b'+' => DuplicateServer,
            b'.' => EndOfPage,
            b'g' => Gif,
            b'I' => Image,
            b'T' => Tn3270,
            b'h' => Html,
            b'i' => Info,
            b's' => Sound,
            b'd' => PdfAlt,
            b'p' => Png,
            b'M' => Mime,
            b'P' => Pdf,
            b':' => Bitmap,
            b';' => Movie,
            b'c' => Calendar,
            b'e' => Event,
            b'm' => Mbox,
            v => Unknown(v),
        }
    }
}

/// MIME type for a raw item type byte.
pub fn mime_for(tag: u8) -> Option<&'static str> {
    ItemType::from(tag).mime()
}

/// Whether a raw item type byte denotes a menu to transcode.
pub fn needs_transcode(tag: u8) -> bool {
    ItemType::from(tag).needs_transcode()
}

/// Guess a MIME type from the file extension of a selector.
pub fn mime_from_extension(selector: &[u8]) -> Option<&'static str> {
    let dot = selector.iter().rposition(|c| *c == b'.')?;
    let ext = &selector[dot + 1..];

    // Not an extension if it spans a path separator.
    if ext.is_empty() || ext.len() > 5 || ext.contains(&b'/') {
        return None;
    }

    let ext = ext.to_ascii_lowercase();

    let m = match &ext[..] {
        b"txt" => "text/plain",
        b"html" | b"htm" => "text/html",
        b"css" => "text/css",
        b"gif" => "image/gif",
        b"png" => "image/png",
        b"jpg" | b"jpeg" => "image/jpeg",
        b"svg" => "image/svg+xml",
        b"pdf" => "application/pdf",
        b"zip" => "application/zip",
        b"mp3" => "audio/mpeg",
        b"ogg" | b"oga" => "audio/ogg",
        b"wav" => "audio/wav",
        b"mp4" | b"m4v" => "video/mp4",
        b"webm" => "video/webm",
        b"ogv" => "video/ogg",
        b"mov" => "video/quicktime",
        b"avi" => "video/x-msvideo",
        b"mkv" => "video/x-matroska",
        b"mpg" | b"mpeg" => "video/mpeg",
        _ => return None,
    };

    Some(m)
}

impl fmt::Debug for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag();
        if tag.is_ascii_graphic() {
            write!(f, "ItemType('{}')", tag as char)
        } else {
            write!(f, "ItemType(0x{:02x})", tag)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tag_roundtrips_for_every_byte() {
        for b in 0..=255_u8 {
            assert_eq!(ItemType::from(b).tag(), b);
        }
    }

    #[test]
    fn mime_table() {
        assert_eq!(mime_for(b'0'), Some("text/plain"));
        assert_eq!(mime_for(b'1'), Some("text/html;charset=UTF-8"));
        assert_eq!(mime_for(b'7'), Some("text/html;charset=UTF-8"));
        assert_eq!(mime_for(b'g'), Some("image/gif"));
        assert_eq!(mime_for(b'h'), Some("text/html"));
        assert_eq!(mime_for(b'd'), Some("application/pdf"));
        assert_eq!(mime_for(b'P'), Some("application/pdf"));
        assert_eq!(mime_for(b'p'), Some("image/png"));

        for b in [b'2', b'3', b'4', b'5', b'6', b'8', b'9', b'I', b'i', b's', b';', b'x'] {
            assert_eq!(mime_for(b), None, "{:?}", ItemType::from(b));
        }
    }

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_from_extension(b"/pics/cat.PNG"), Some("image/png"));
        assert_eq!(mime_from_extension(b"/movies/trailer.webm"), Some("video/webm"));
        assert_eq!(mime_from_extension(b"/v1.2/README"), None);
        assert_eq!(mime_from_extension(b"/README"), None);
        assert_eq!(mime_from_extension(b"/file."), None);
    }

    #[test]
    fn only_menus_are_transcoded() {
        let transcoded: Vec<u8> = (0..=255_u8).filter(|b| needs_transcode(*b)).collect();
        assert_eq!(transcoded, b"17");
    }
}
