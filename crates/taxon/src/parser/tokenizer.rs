//! The tokenizer: a UTF-8 byte stream in, one token at a time out.
//!
//! The tokenizer keeps a one-scalar lookahead. Advancing it decodes exactly
//! one UTF-8 sequence from the source with strict validation: continuation
//! bytes cannot lead, sequences must be complete and shortest-form, and
//! surrogates and code points above U+10FFFF are rejected.

use crate::source::Source;

/// Reading from the source failed below the syntax layer.
const SOURCE_FAILURE: &str = "source read failure";

/// One lexical token. String contents are fully decoded; the quotes are
/// gone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    /// End of input at a token boundary.
    Eof,
    /// One of `[ ] { } : ,`.
    Punct(u8),
    /// A number, kept as its source spelling.
    Number(String),
    /// A bare identifier such as `null`, `true` or `false`.
    Ident(String),
    /// A double-quoted string, decoded.
    Str(String),
}

/// The current lookahead scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Peeked {
    /// Nothing read yet, or the last token consumed its trailing scalar.
    Empty,
    /// One decoded scalar.
    Char(char),
    /// The source is exhausted.
    End,
}

#[derive(Debug)]
pub(crate) struct Tokenizer {
    peeked: Peeked,
    saved_offset: i64,
}

impl Tokenizer {
    pub(crate) fn new() -> Self {
        Self {
            peeked: Peeked::Empty,
            saved_offset: 0,
        }
    }

    /// Byte offset of the source at entry of the most recent
    /// [`next_token`](Self::next_token) call. Errors raised while that token
    /// is current are reported at this offset.
    pub(crate) fn saved_offset(&self) -> i64 {
        self.saved_offset
    }

    /// Decodes the next scalar from the source into the lookahead.
    fn refill<S: Source>(&mut self, source: &mut S) -> Result<(), &'static str> {
        let Some(lead) = source.get_byte().map_err(|_| SOURCE_FAILURE)? else {
            self.peeked = Peeked::End;
            return Ok(());
        };
        if lead < 0x80 {
            self.peeked = Peeked::Char(lead as char);
            return Ok(());
        }
        if (0x80..=0xBF).contains(&lead) {
            return Err("invalid UTF-8 byte");
        }
        let (extra, min, mut acc) = match lead {
            0xC0..=0xDF => (1, 0x80u32, u32::from(lead & 0x1F)),
            0xE0..=0xEF => (2, 0x800, u32::from(lead & 0x0F)),
            0xF0..=0xF7 => (3, 0x1_0000, u32::from(lead & 0x07)),
            _ => return Err("invalid UTF-8 sequence"),
        };
        for _ in 0..extra {
            match source.get_byte().map_err(|_| SOURCE_FAILURE)? {
                Some(byte) if (0x80..=0xBF).contains(&byte) => {
                    acc = acc << 6 | u32::from(byte & 0x3F);
                }
                _ => return Err("invalid UTF-8 sequence"),
            }
        }
        if acc < min {
            return Err("invalid UTF character");
        }
        match char::from_u32(acc) {
            Some(scalar) => {
                self.peeked = Peeked::Char(scalar);
                Ok(())
            }
            // Surrogates and values above U+10FFFF.
            None => Err("invalid UTF character"),
        }
    }

    fn current(&self) -> Option<char> {
        match self.peeked {
            Peeked::Char(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Moves the current scalar into `text` and refills the lookahead.
    fn bump<S: Source>(&mut self, text: &mut String, source: &mut S) -> Result<(), &'static str> {
        if let Peeked::Char(scalar) = self.peeked {
            text.push(scalar);
        }
        self.refill(source)
    }

    /// Skips whitespace and reads the next token. [`Token::Eof`] marks a
    /// clean end of input; end of input inside a token is an error.
    pub(crate) fn next_token<S: Source>(&mut self, source: &mut S) -> Result<Token, &'static str> {
        self.saved_offset = source.offset();

        let scalar = loop {
            match self.peeked {
                Peeked::Empty => self.refill(source)?,
                Peeked::Char('\t' | '\n' | '\r' | ' ') => self.refill(source)?,
                Peeked::Char(scalar) => break scalar,
                Peeked::End => return Ok(Token::Eof),
            }
        };

        match scalar {
            // Single-character tokens terminate without reading ahead; the
            // stream may be blocking and there may be no more data.
            '[' | ']' | '{' | '}' | ':' | ',' => {
                self.peeked = Peeked::Empty;
                Ok(Token::Punct(scalar as u8))
            }
            '0'..='9' | '+' | '-' => self.take_number(source),
            'A'..='Z' | 'a'..='z' | '_' | '$' => self.take_identifier(source),
            '"' => self.take_string(source),
            _ => Err("invalid character"),
        }
    }

    /// Takes a number token. Strictly, JSON allows neither plus signs nor
    /// redundant leading zeroes, but we accept them as extensions.
    fn take_number<S: Source>(&mut self, source: &mut S) -> Result<Token, &'static str> {
        let mut text = String::new();
        if matches!(self.current(), Some('+' | '-')) {
            self.bump(&mut text, source)?;
        }
        if !matches!(self.current(), Some('0'..='9')) {
            return Err("invalid number");
        }
        while matches!(self.current(), Some('0'..='9')) {
            self.bump(&mut text, source)?;
        }
        if self.current() == Some('.') {
            self.bump(&mut text, source)?;
            if !matches!(self.current(), Some('0'..='9')) {
                return Err("invalid number");
            }
            while matches!(self.current(), Some('0'..='9')) {
                self.bump(&mut text, source)?;
            }
        }
        if matches!(self.current(), Some('e' | 'E')) {
            self.bump(&mut text, source)?;
            if matches!(self.current(), Some('+' | '-')) {
                self.bump(&mut text, source)?;
            }
            if !matches!(self.current(), Some('0'..='9')) {
                return Err("invalid number");
            }
            while matches!(self.current(), Some('0'..='9')) {
                self.bump(&mut text, source)?;
            }
        }
        Ok(Token::Number(text))
    }

    /// Takes an identifier. As in JavaScript, dollar signs are accepted as
    /// an extension.
    fn take_identifier<S: Source>(&mut self, source: &mut S) -> Result<Token, &'static str> {
        let mut text = String::new();
        while matches!(
            self.current(),
            Some('A'..='Z' | 'a'..='z' | '0'..='9' | '_' | '$')
        ) {
            self.bump(&mut text, source)?;
        }
        Ok(Token::Ident(text))
    }

    /// Takes a double-quoted string, decoding escapes. The terminating
    /// quote is consumed without reading ahead.
    fn take_string<S: Source>(&mut self, source: &mut S) -> Result<Token, &'static str> {
        let mut text = String::new();
        self.refill(source)?;
        loop {
            match self.peeked {
                Peeked::End => return Err("string not terminated properly"),
                Peeked::Empty => self.refill(source)?,
                Peeked::Char('"') => {
                    self.peeked = Peeked::Empty;
                    return Ok(Token::Str(text));
                }
                Peeked::Char(scalar) if scalar <= '\u{1F}' || scalar == '\u{7F}' => {
                    return Err("control character not allowed in string");
                }
                Peeked::Char('\\') => {
                    text.push(self.take_escape(source)?);
                    self.refill(source)?;
                }
                Peeked::Char(scalar) => {
                    text.push(scalar);
                    self.refill(source)?;
                }
            }
        }
    }

    /// Decodes one backslash escape. The backslash itself is the current
    /// scalar; everything after it is read as raw bytes, since all escape
    /// material is ASCII.
    fn take_escape<S: Source>(&mut self, source: &mut S) -> Result<char, &'static str> {
        let Some(introducer) = source.get_byte().map_err(|_| SOURCE_FAILURE)? else {
            return Err("incomplete escape sequence");
        };
        match introducer {
            b'\\' | b'"' | b'/' => Ok(introducer as char),
            b'b' => Ok('\u{8}'),
            b'f' => Ok('\u{C}'),
            b'n' => Ok('\n'),
            b'r' => Ok('\r'),
            b't' => Ok('\t'),
            b'u' => {
                let mut digits = [0u8; 4];
                if source.get_bytes(&mut digits).map_err(|_| SOURCE_FAILURE)? != 4 {
                    return Err("invalid escape sequence");
                }
                let high = parse_hex4(&digits)?;
                if (0xDC00..=0xDFFF).contains(&high) {
                    return Err("dangling UTF-16 trailing surrogate");
                }
                if (0xD800..=0xDBFF).contains(&high) {
                    // A leading surrogate must be followed by a trailing one;
                    // the pair combines to a single code point above U+FFFF.
                    let mut follow = [0u8; 6];
                    if source.get_bytes(&mut follow).map_err(|_| SOURCE_FAILURE)? != 6
                        || &follow[..2] != b"\\u"
                    {
                        return Err("missing UTF-16 trailing surrogate");
                    }
                    let low = parse_hex4(&follow[2..])?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err("missing UTF-16 trailing surrogate");
                    }
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(combined).ok_or("invalid escape sequence")
                } else {
                    char::from_u32(high).ok_or("invalid escape sequence")
                }
            }
            _ => Err("invalid escape sequence"),
        }
    }
}

fn parse_hex4(digits: &[u8]) -> Result<u32, &'static str> {
    let mut acc = 0u32;
    for &digit in &digits[..4] {
        let nibble = match digit {
            b'0'..=b'9' => digit - b'0',
            b'A'..=b'F' => digit - b'A' + 10,
            b'a'..=b'f' => digit - b'a' + 10,
            _ => return Err("invalid hexadecimal digit"),
        };
        acc = acc << 4 | u32::from(nibble);
    }
    Ok(acc)
}
