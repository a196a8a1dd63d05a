use std::io::{self, BufRead, ErrorKind};

/// What terminated a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEnd {
    /// An unquoted `,`; more fields follow on this record.
    Comma,
    /// An unquoted `\n`.
    EndOfRecord,
    /// Input ran out after at least one byte of this field.
    EndOfStream,
}

impl FieldEnd {
    /// True when no further field belongs to the current record.
    pub fn closes_record(self) -> bool {
        !matches!(self, FieldEnd::Comma)
    }
}

/// A single CSV field with quotes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub text: String,
    pub end: FieldEnd,
    /// Bytes consumed before the delimiter, including quotes and
    /// anything dropped by truncation.
    raw_len: usize,
}

impl Field {
    /// The field began directly with its delimiter (`,,` or an empty line).
    pub fn is_blank(&self) -> bool {
        self.raw_len == 0
    }
}

/// Streaming field reader over a byte source.
///
/// A `"` toggles quoted mode and is never copied into the field. In quoted
/// mode `,` and `\n` are literal content. A `\r` outside quotes is dropped
/// so CRLF files parse like LF files. Bytes past `max_len` are discarded,
/// backing off to the last whole UTF-8 character.
pub struct FieldReader<R> {
    inner: R,
    max_len: usize,
}

impl<R: BufRead> FieldReader<R> {
    pub fn new(inner: R, max_len: usize) -> Self {
        Self { inner, max_len }
    }

    /// Read the next field.
    ///
    /// Returns `Ok(None)` when the stream ends before a single byte of the
    /// field was read. A partial field at end of stream is returned with
    /// [`FieldEnd::EndOfStream`].
    pub fn next_field(&mut self) -> io::Result<Option<Field>> {
        let mut buf: Vec<u8> = Vec::with_capacity(self.max_len.min(64));
        let mut quoted = false;
        let mut raw_len = 0usize;
        let mut truncated = false;

        let end = loop {
            let Some(byte) = self.next_byte()? else {
                if raw_len == 0 {
                    return Ok(None);
                }
                break FieldEnd::EndOfStream;
            };

            match byte {
                b'"' => {
                    quoted = !quoted;
                    raw_len += 1;
                    continue;
                }
                b',' if !quoted => break FieldEnd::Comma,
                b'\n' if !quoted => break FieldEnd::EndOfRecord,
                b'\r' if !quoted => continue,
                _ => {}
            }

            raw_len += 1;
            if buf.len() < self.max_len {
                buf.push(byte);
            } else {
                truncated = true;
            }
        };

        if truncated {
            trim_partial_char(&mut buf);
        }

        Ok(Some(Field {
            text: String::from_utf8_lossy(&buf).into_owned(),
            end,
            raw_len,
        }))
    }

    /// Discard everything up to and including the next `\n`.
    ///
    /// Returns false if the stream was already exhausted.
    pub fn skip_line(&mut self) -> io::Result<bool> {
        let mut scratch = Vec::new();
        let n = self.inner.read_until(b'\n', &mut scratch)?;
        Ok(n > 0)
    }

    /// Consume the remaining fields of the current record.
    pub fn skip_rest_of_record(&mut self) -> io::Result<()> {
        while let Some(field) = self.next_field()? {
            if field.end.closes_record() {
                break;
            }
        }
        Ok(())
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let Some(&byte) = buf.first() else {
                return Ok(None);
            };
            self.inner.consume(1);
            return Ok(Some(byte));
        }
    }
}

/// Drop a UTF-8 sequence left incomplete by truncation.
fn trim_partial_char(buf: &mut Vec<u8>) {
    let valid = match std::str::from_utf8(buf) {
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        _ => return,
    };
    buf.truncate(valid);
}
