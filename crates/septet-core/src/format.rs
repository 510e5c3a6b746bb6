//! Token grammar of the compressed stream.
//!
//! Input bytes are 7-bit literals, so the high bit of every byte is free and
//! serves as the run marker:
//!
//! ```text
//!  Token     Bytes  Layout
//!  Literal   1      0vvvvvvv                 (run of length 1)
//!  Run       2      1vvvvvvv  llllllll       (l in 2..=255)
//! ```
//!
//! A stream is a plain concatenation of tokens. There is no header, no
//! padding and no terminator; the stream length travels out-of-band.

use crate::error::{CodecError, Result};

/// Tag bit marking a run header.
pub const RUN_FLAG: u8 = 0x80;

/// Mask selecting the 7-bit literal value.
pub const LITERAL_MASK: u8 = 0x7F;

/// Largest literal the codec accepts.
pub const MAX_LITERAL: u8 = 0x7F;

/// Shortest run encoded as a run token.
pub const MIN_RUN_LEN: usize = 2;

/// Longest run a single token can describe. Longer runs are split.
pub const MAX_RUN_LEN: usize = u8::MAX as usize;

/// Size of a literal token in bytes.
pub const LITERAL_TOKEN_SIZE: usize = 1;

/// Size of a run token in bytes.
pub const RUN_TOKEN_SIZE: usize = 2;

/// Returns true if `byte` is a literal token (high bit clear).
#[inline]
#[must_use]
pub const fn is_literal(byte: u8) -> bool {
    byte & RUN_FLAG == 0
}

/// Returns true if `byte` is an acceptable input literal.
#[inline]
#[must_use]
pub const fn is_valid_literal(byte: u8) -> bool {
    byte <= MAX_LITERAL
}

/// Pack a 7-bit value into a run header byte.
#[inline]
#[must_use]
pub const fn pack_run_header(value: u8) -> u8 {
    (value & LITERAL_MASK) | RUN_FLAG
}

/// Extract the 7-bit value from a literal or run header byte.
#[inline]
#[must_use]
pub const fn unpack_value(byte: u8) -> u8 {
    byte & LITERAL_MASK
}

/// A single encoded token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// One literal byte, high bit clear.
    Literal(u8),
    /// `len` repetitions of `value`.
    Run {
        /// 7-bit repeated value
        value: u8,
        /// Repetition count as carried on the wire
        len: u8,
    },
}

impl Token {
    /// Build the token describing a run of `len` copies of `value`.
    ///
    /// Runs of length 1 become literal tokens.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `len` is 0 or above [`MAX_RUN_LEN`], or if
    /// `value` is not a 7-bit literal.
    #[inline]
    #[must_use]
    pub fn from_run(value: u8, len: usize) -> Self {
        debug_assert!((1..=MAX_RUN_LEN).contains(&len), "run length {len}");
        debug_assert!(is_valid_literal(value), "literal 0x{value:02X}");

        if len == 1 {
            Self::Literal(value)
        } else {
            Self::Run {
                value,
                len: len as u8,
            }
        }
    }

    /// Number of bytes this token occupies in the stream.
    #[inline]
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        match self {
            Self::Literal(_) => LITERAL_TOKEN_SIZE,
            Self::Run { .. } => RUN_TOKEN_SIZE,
        }
    }

    /// Number of bytes this token expands to.
    #[inline]
    #[must_use]
    pub const fn run_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Run { len, .. } => *len as usize,
        }
    }

    /// The 7-bit value this token repeats.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u8 {
        match self {
            Self::Literal(value) | Self::Run { value, .. } => *value,
        }
    }

    /// Whether the encoder could have produced this token.
    ///
    /// Run tokens shorter than [`MIN_RUN_LEN`] are representable on the wire
    /// but never emitted.
    #[inline]
    #[must_use]
    pub const fn is_canonical(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::Run { len, .. } => *len as usize >= MIN_RUN_LEN,
        }
    }

    /// Encode the token at the front of `buf`, returning the bytes written.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`Self::encoded_len`]. Debug builds
    /// also panic on a literal above [`MAX_LITERAL`].
    #[inline]
    pub fn encode_into(&self, buf: &mut [u8]) -> usize {
        match *self {
            Self::Literal(value) => {
                debug_assert!(is_valid_literal(value), "literal 0x{value:02X}");
                buf[0] = value;
                LITERAL_TOKEN_SIZE
            }
            Self::Run { value, len } => {
                buf[0] = pack_run_header(value);
                buf[1] = len;
                RUN_TOKEN_SIZE
            }
        }
    }

    /// Decode the token starting at `offset` in `buf`.
    ///
    /// Returns the token and the number of bytes it occupies.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::MalformedStream` if `offset` is past the end of
    /// `buf` or a run header has no length byte after it.
    #[inline]
    pub fn decode_at(buf: &[u8], offset: usize) -> Result<(Self, usize)> {
        let header = *buf
            .get(offset)
            .ok_or(CodecError::MalformedStream { offset })?;

        if is_literal(header) {
            return Ok((Self::Literal(header), LITERAL_TOKEN_SIZE));
        }

        let len = *buf
            .get(offset + 1)
            .ok_or(CodecError::MalformedStream { offset })?;

        Ok((
            Self::Run {
                value: unpack_value(header),
                len,
            },
            RUN_TOKEN_SIZE,
        ))
    }
}

/// Iterator over the tokens of a compressed stream.
///
/// Yields each token with its byte offset. After the first error the
/// iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Tokens<'a> {
    /// Iterate the tokens in `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Offset of the next token to be decoded.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<(usize, Token)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.buf.len() {
            return None;
        }

        let offset = self.offset;
        match Token::decode_at(self.buf, offset) {
            Ok((token, consumed)) => {
                self.offset += consumed;
                Some(Ok((offset, token)))
            }
            Err(e) => {
                self.offset = self.buf.len();
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}
