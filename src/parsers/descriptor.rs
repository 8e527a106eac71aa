//! Type descriptor and generic signature parsing
//!
//! Recovers every class name mentioned by a field descriptor, method
//! descriptor or generic signature. Array wrappers, primitives and type
//! variables are dropped; the class names nested inside generic bounds are
//! recovered recursively.

use thiserror::Error;

/// Errors raised while scanning a descriptor or signature
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("unterminated class type starting at offset {0}")]
    UnterminatedClassType(usize),

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unexpected end of descriptor at offset {0}")]
    UnexpectedEnd(usize),
}

type ParseResult<T> = std::result::Result<T, DescriptorError>;

/// Byte cursor over a descriptor string
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn next(&mut self) -> ParseResult<u8> {
        let byte = self.peek().ok_or(DescriptorError::UnexpectedEnd(self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, wanted: u8) -> ParseResult<()> {
        let offset = self.pos;
        match self.next()? {
            byte if byte == wanted => Ok(()),
            byte => Err(unexpected(byte, offset)),
        }
    }

    /// Consume bytes up to (not including) the first of `stops`.
    ///
    /// Delimiters are ASCII, so the returned slice always falls on UTF-8
    /// boundaries.
    fn take_until(&mut self, stops: &[u8]) -> Option<&'a str> {
        let rest = &self.input.as_bytes()[self.pos..];
        let len = rest.iter().position(|b| stops.contains(b))?;
        let start = self.pos;
        self.pos += len;
        Some(&self.input[start..start + len])
    }
}

fn unexpected(byte: u8, offset: usize) -> DescriptorError {
    DescriptorError::UnexpectedChar {
        found: byte as char,
        offset,
    }
}

/// Parse a descriptor or signature and return every referenced class name
///
/// `None` and empty input yield no names. Names are returned in the order
/// they appear and may repeat.
pub fn parse_type_names(input: Option<&str>) -> ParseResult<Vec<String>> {
    let mut names = Vec::new();
    if let Some(input) = input {
        collect_type_names(input, &mut names)?;
    }
    Ok(names)
}

/// Like [`parse_type_names`] but appends into an existing buffer
pub fn collect_type_names(input: &str, out: &mut Vec<String>) -> ParseResult<()> {
    let mut cursor = Cursor::new(input);

    while let Some(byte) = cursor.peek() {
        match byte {
            b'<' => {
                cursor.pos += 1;
                formal_type_parameters(&mut cursor, out)?;
            }
            // method shape punctuation and the throws marker
            b'(' | b')' | b'^' => cursor.pos += 1,
            _ => field_type(&mut cursor, out)?,
        }
    }

    Ok(())
}

/// Filter a bare internal name taken from an instruction or header operand
///
/// Array class names (`[Lpkg/Foo;`) are not tracked as dependencies here.
pub fn name_from_internal(name: &str) -> Option<&str> {
    if name.is_empty() || name.starts_with('[') {
        None
    } else {
        Some(name)
    }
}

fn field_type(cursor: &mut Cursor<'_>, out: &mut Vec<String>) -> ParseResult<()> {
    let offset = cursor.pos;
    match cursor.next()? {
        b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' | b'V' => Ok(()),
        b'[' => field_type(cursor, out),
        b'L' => class_type(cursor, offset, out),
        b'T' => {
            cursor
                .take_until(b";")
                .ok_or(DescriptorError::UnexpectedEnd(cursor.input.len()))?;
            cursor.expect(b';')
        }
        byte => Err(unexpected(byte, offset)),
    }
}

fn class_type(cursor: &mut Cursor<'_>, start: usize, out: &mut Vec<String>) -> ParseResult<()> {
    let outer = cursor
        .take_until(b";<.")
        .ok_or(DescriptorError::UnterminatedClassType(start))?;
    if outer.is_empty() {
        return Err(DescriptorError::UnterminatedClassType(start));
    }
    let mut name = outer.to_string();
    out.push(name.clone());

    loop {
        let offset = cursor.pos;
        match cursor.next().map_err(|_| DescriptorError::UnterminatedClassType(start))? {
            b';' => return Ok(()),
            b'<' => type_arguments(cursor, out)?,
            b'.' => {
                let inner = cursor
                    .take_until(b";<.")
                    .ok_or(DescriptorError::UnterminatedClassType(start))?;
                name = format!("{}${}", name, inner);
                out.push(name.clone());
            }
            byte => return Err(unexpected(byte, offset)),
        }
    }
}

fn type_arguments(cursor: &mut Cursor<'_>, out: &mut Vec<String>) -> ParseResult<()> {
    loop {
        match cursor.peek() {
            None => return Err(DescriptorError::UnexpectedEnd(cursor.pos)),
            Some(b'>') => {
                cursor.pos += 1;
                return Ok(());
            }
            Some(b'*') => cursor.pos += 1,
            Some(b'+') | Some(b'-') => {
                cursor.pos += 1;
                field_type(cursor, out)?;
            }
            Some(_) => field_type(cursor, out)?,
        }
    }
}

fn formal_type_parameters(cursor: &mut Cursor<'_>, out: &mut Vec<String>) -> ParseResult<()> {
    loop {
        match cursor.peek() {
            None => return Err(DescriptorError::UnexpectedEnd(cursor.pos)),
            Some(b'>') => {
                cursor.pos += 1;
                return Ok(());
            }
            Some(_) => {
                let offset = cursor.pos;
                let identifier = cursor
                    .take_until(b":")
                    .ok_or(DescriptorError::UnexpectedEnd(cursor.input.len()))?;
                if identifier.is_empty() || identifier.contains(['>', ';', '<']) {
                    return Err(unexpected(cursor.input.as_bytes()[offset], offset));
                }
                // class bound may be empty, interface bounds follow
                while cursor.peek() == Some(b':') {
                    cursor.pos += 1;
                    if matches!(cursor.peek(), Some(b'L') | Some(b'[') | Some(b'T')) {
                        field_type(cursor, out)?;
                    }
                }
            }
        }
    }
}
