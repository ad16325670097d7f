use core::fmt;

use crate::item::ItemType;

/// Name, selector, host, port and gopher+ flag.
pub(crate) const FIELD_COUNT: usize = 5;

const NAME: usize = 0;
const SELECTOR: usize = 1;
const HOST: usize = 2;
const PORT: usize = 3;
const GOPHER_PLUS: usize = 4;

/// One parsed menu line. The fields borrow from the input.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    item_type: ItemType,
    fields: [Option<&'a [u8]>; FIELD_COUNT],
}

impl<'a> Line<'a> {
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn name(&self) -> &'a [u8] {
        self.fields[NAME].unwrap_or_default()
    }

    pub fn selector(&self) -> &'a [u8] {
        self.fields[SELECTOR].unwrap_or_default()
    }

    pub fn host(&self) -> &'a [u8] {
        self.fields[HOST].unwrap_or_default()
    }

    pub fn port(&self) -> &'a [u8] {
        self.fields[PORT].unwrap_or_default()
    }

    pub fn gopher_plus(&self) -> Option<&'a [u8]> {
        self.fields[GOPHER_PLUS]
    }

    /// Number of fields found before the line terminator.
    pub fn field_count(&self) -> usize {
        self.fields.iter().take_while(|f| f.is_some()).count()
    }
}

impl fmt::Debug for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lossy = |v: &[u8]| String::from_utf8_lossy(v).into_owned();
        f.debug_struct("Line")
            .field("item_type", &self.item_type)
            .field("name", &lossy(self.name()))
            .field("selector", &lossy(self.selector()))
            .field("host", &lossy(self.host()))
            .field("port", &lossy(self.port()))
            .field("gopher_plus", &self.gopher_plus().map(lossy))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    ReadType,
    ReadField,
    LineEnd,
    Ended,
}

#[derive(Debug)]
struct Pos {
    index: usize,
    field: usize,
    field_start: usize,
}

/// Try to parse one menu line from the start of `src`.
///
/// Returns the number of bytes consumed together with the line, or `None` if
/// `src` does not yet hold a complete line. Nothing is consumed on `None`, the
/// caller is expected to come back with more input prepended by the same bytes.
///
/// With `at_eof` set there is no more input coming, and an unterminated line,
/// or one ending in a lone CR, is taken as complete.
pub(crate) fn parse_line(src: &[u8], at_eof: bool) -> Option<(usize, Line<'_>)> {
    let mut state = LineState::ReadType;
    let mut item_type = ItemType::Unknown(0);
    let mut fields = [None; FIELD_COUNT];
    let mut pos = Pos {
        index: 0,
        field: 0,
        field_start: 0,
    };

    while state != LineState::Ended {
        state = match state {
            LineState::ReadType => {
                let b = *src.get(pos.index)?;
                pos.index += 1;

                if matches!(b, b'\r' | b'\n' | 0) {
                    warn!("Invalid gopher item type: 0x{:02x}", b);
                    continue;
                }

                item_type = ItemType::from(b);
                pos.field_start = pos.index;

                LineState::ReadField
            }

            LineState::ReadField => {
                let rest = &src[pos.index..];

                let Some(i) = rest.iter().position(|c| matches!(c, b'\t' | b'\r' | b'\n')) else {
                    if !at_eof {
                        return None;
                    }
                    warn!("Unterminated gopher item at end of stream: {:?}", item_type);
                    close_field(&mut fields, src, &pos, src.len());
                    pos.index = src.len();
                    break;
                };

                let at = pos.index + i;
                close_field(&mut fields, src, &pos, at);

                if src[at] == b'\t' {
                    if pos.field == GOPHER_PLUS {
                        warn!("Extra tab in gopher item: {:?}", item_type);
                    }
                    pos.field += 1;
                    pos.field_start = at + 1;
                    pos.index = at + 1;
                    LineState::ReadField
                } else {
                    pos.index = at;
                    LineState::LineEnd
                }
            }

            LineState::LineEnd => {
                if src[pos.index] == b'\r' {
                    match src.get(pos.index + 1) {
                        Some(b'\n') => pos.index += 2,
                        Some(_) => {
                            warn!("CR without LF in gopher item: {:?}", item_type);
                            pos.index += 1;
                        }
                        // The LF might be in the next chunk.
                        None if !at_eof => return None,
                        None => pos.index += 1,
                    }
                } else {
                    pos.index += 1;
                }
                LineState::Ended
            }

            LineState::Ended => unreachable!(),
        };
    }

    let line = Line { item_type, fields };

    if pos.field < PORT && item_type != ItemType::EndOfPage {
        warn!("Malformed gopher item with {} fields: {:?}", line.field_count(), item_type);
    }

    trace!("Parsed line ({} bytes): {:?}", pos.index, line);

    Some((pos.index, line))
}

fn close_field<'a>(
    fields: &mut [Option<&'a [u8]>; FIELD_COUNT],
    src: &'a [u8],
    pos: &Pos,
    end: usize,
) {
    // Fields past the gopher+ flag are dropped.
    if pos.field < FIELD_COUNT {
        fields[pos.field] = Some(&src[pos.field_start..end]);
    }
}
