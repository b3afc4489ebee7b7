//! Splits a pattern into charset, meta, bound and end tokens.
//!
//! The lexer owns its cursor and a single pushback slot, so every
//! compilation runs against its own lexer value.

use parcel::parsers::character::{alphabetic, digit, expect_character};
use parcel::prelude::v1::*;
use regcc_routines::{Annotation, Bound, ByteSet};

/// Bytes that lex as a `Meta` token. `{` is listed for completeness but always
/// begins a bound.
const META_CHARS: &[u8] = b"^$*+?(){}|";

const DIGITS: (u8, u8) = (b'0', b'9');
const WHITESPACE: &[u8] = b" \x0c\n\r\t\x0b";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrKind {
    TrailingBackslash,
    MalformedHexEscape,
    UnterminatedBracket,
    UnknownClass(String),
    MalformedClass,
    MalformedBound,
    InvertedBound { min: u32, max: u32 },
    BoundOverflow,
}

impl std::fmt::Display for LexErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrailingBackslash => write!(f, "pattern should not end with '\\'"),
            Self::MalformedHexEscape => write!(f, "'\\x' escape needs two hex digits"),
            Self::UnterminatedBracket => write!(f, "bracket expression should end with ']'"),
            Self::UnknownClass(name) => write!(f, "unknown character class '{}'", name),
            Self::MalformedClass => write!(f, "character class should end with ':]'"),
            Self::MalformedBound => write!(f, "illegal bound"),
            Self::InvertedBound { min, max } => {
                write!(f, "bound minimum {} exceeds maximum {}", min, max)
            }
            Self::BoundOverflow => write!(f, "bound does not fit in 32 bits"),
        }
    }
}

/// A lexical error and the byte offset of the construct that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexErr {
    offset: usize,
    kind: LexErrKind,
}

impl LexErr {
    pub fn new(offset: usize, kind: LexErrKind) -> Self {
        Self { offset, kind }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> &LexErrKind {
        &self.kind
    }
}

impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for LexErr {}

/// The source slice a token was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Charset(ByteSet),
    Meta(u8),
    Bound(Bound),
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn is_meta(&self, c: u8) -> bool {
        self.kind == TokenKind::Meta(c)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }
}

/// The named classes accepted inside a bracket expression as `[:name:]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosixClass {
    Ascii,
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Word,
    Xdigit,
}

impl PosixClass {
    pub fn from_name(name: &str) -> Option<Self> {
        let class = match name {
            "ascii" => Self::Ascii,
            "alnum" => Self::Alnum,
            "alpha" => Self::Alpha,
            "blank" => Self::Blank,
            "cntrl" => Self::Cntrl,
            "digit" => Self::Digit,
            "graph" => Self::Graph,
            "lower" => Self::Lower,
            "print" => Self::Print,
            "punct" => Self::Punct,
            "space" => Self::Space,
            "upper" => Self::Upper,
            "word" => Self::Word,
            "xdigit" => Self::Xdigit,
            _ => return None,
        };

        Some(class)
    }

    /// Sets the membership of every byte in the class.
    pub fn fill(self, set: &mut ByteSet, member: bool) {
        match self {
            Self::Ascii => set.fill_range(0x00, 0xff, member),
            Self::Alnum => {
                set.fill_range(b'a', b'z', member);
                set.fill_range(b'A', b'Z', member);
                set.fill_range(b'0', b'9', member);
            }
            Self::Alpha => {
                set.fill_range(b'a', b'z', member);
                set.fill_range(b'A', b'Z', member);
            }
            Self::Blank => set.fill_bytes(b" \t", member),
            Self::Cntrl => {
                set.fill_range(0x01, 0x1f, member);
                set.set(0x7f, member);
            }
            Self::Digit => set.fill_range(b'0', b'9', member),
            Self::Graph => set.fill_range(0x21, 0x7e, member),
            Self::Lower => set.fill_range(b'a', b'z', member),
            Self::Print => set.fill_range(0x20, 0x7e, member),
            Self::Punct => set.fill_bytes(b"][!\"#$%&'()*+,./:;<=>?@\\^_`{|}~-", member),
            Self::Space => set.fill_bytes(WHITESPACE, member),
            Self::Upper => set.fill_range(b'A', b'Z', member),
            Self::Word => {
                Self::Alnum.fill(set, member);
                set.set(b'-', member);
            }
            Self::Xdigit => {
                set.fill_range(b'a', b'f', member);
                set.fill_range(b'A', b'F', member);
                set.fill_range(b'0', b'9', member);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundState {
    Start,
    ReadLeftBegin,
    ReadLeft,
    ReadRight,
    End,
}

/// Returns every byte but NUL, the base of all complemented sets.
fn non_nul() -> ByteSet {
    ByteSet::from_range(0x01, 0xff)
}

/// Matches the `[:name:]` form of a named class, yielding the name.
fn class_expression<'a>() -> impl Parser<'a, &'a [(usize, char)], String> {
    parcel::right(parcel::join(
        parcel::join(expect_character('['), expect_character(':')),
        parcel::left(parcel::join(
            parcel::one_or_more(alphabetic().predicate(|c| c.is_ascii_lowercase())),
            parcel::join(expect_character(':'), expect_character(']')),
        )),
    ))
    .map(|name| name.into_iter().collect::<String>())
}

/// Matches the two hex digits following `\x`.
fn hex_pair<'a>() -> impl Parser<'a, &'a [(usize, char)], u8> {
    parcel::join(digit(16), digit(16)).map(|(high, low)| {
        let high = high.to_digit(16).unwrap_or(0);
        let low = low.to_digit(16).unwrap_or(0);

        (high * 16 + low) as u8
    })
}

#[derive(Debug, Default)]
pub struct Lexer {
    bytes: Vec<u8>,
    cursor: usize,
    pushback: Option<Token>,
}

impl Lexer {
    pub fn new(pattern: &[u8]) -> Self {
        let mut lexer = Self::default();
        lexer.set_source(pattern);
        lexer
    }

    /// Restarts lexing at the beginning of `pattern`, discarding any pushed
    /// back token.
    pub fn set_source(&mut self, pattern: &[u8]) {
        self.bytes = pattern.to_vec();
        self.cursor = 0;
        self.pushback = None;
    }

    /// Returns the next token, replaying a pushed back token first.
    pub fn next_token(&mut self) -> Result<Token, LexErr> {
        match self.pushback.take() {
            Some(token) => Ok(token),
            None => self.lex(),
        }
    }

    /// Queues `token` to be returned by the next call to `next_token`.
    ///
    /// # Panics
    /// Only one token can be pushed back at a time.
    pub fn push_back(&mut self, token: Token) {
        assert!(
            self.pushback.is_none(),
            "a token was pushed back twice without being consumed"
        );
        self.pushback = Some(token);
    }

    /// Returns the source text a token was read from.
    pub fn annotation(&self, token: &Token) -> Annotation {
        self.bytes
            .get(token.span.start..token.span.end())
            .map(Annotation::from)
            .unwrap_or_default()
    }

    /// Returns the input from `start` onward in the form parcel parsers
    /// consume, one char per byte and indexed by byte offset.
    fn chars_from(&self, start: usize) -> Vec<(usize, char)> {
        self.bytes
            .iter()
            .enumerate()
            .skip(start)
            .map(|(offset, byte)| (offset, char::from(*byte)))
            .collect()
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    fn lex(&mut self) -> Result<Token, LexErr> {
        let start = self.cursor;

        let kind = match self.peek() {
            None => TokenKind::End,
            Some(b'\\') => TokenKind::Charset(self.escaped()?),
            Some(b'{') => TokenKind::Bound(self.bound()?),
            Some(c) if META_CHARS.contains(&c) => {
                self.cursor += 1;
                TokenKind::Meta(c)
            }
            Some(b'.') => {
                self.cursor += 1;
                TokenKind::Charset(non_nul())
            }
            Some(b'[') => TokenKind::Charset(self.bracket()?),
            Some(c) => {
                self.cursor += 1;
                TokenKind::Charset(ByteSet::single(c))
            }
        };

        Ok(Token {
            kind,
            span: Span {
                start,
                len: self.cursor - start,
            },
        })
    }

    fn escaped(&mut self) -> Result<ByteSet, LexErr> {
        let start = self.cursor;
        self.cursor += 1;

        let escaped = self
            .peek()
            .ok_or_else(|| LexErr::new(start, LexErrKind::TrailingBackslash))?;
        self.cursor += 1;

        let set = match escaped {
            b'd' => ByteSet::from_range(DIGITS.0, DIGITS.1),
            b'D' => {
                let mut set = non_nul();
                set.fill_range(DIGITS.0, DIGITS.1, false);
                set
            }
            b's' => WHITESPACE.iter().copied().collect(),
            b'S' => {
                let mut set = non_nul();
                set.fill_bytes(WHITESPACE, false);
                set
            }
            b'w' => {
                let mut set = ByteSet::new();
                PosixClass::Word.fill(&mut set, true);
                set
            }
            b'W' => {
                let mut set = non_nul();
                PosixClass::Word.fill(&mut set, false);
                set
            }
            b'f' => ByteSet::single(0x0c),
            b'n' => ByteSet::single(b'\n'),
            b'r' => ByteSet::single(b'\r'),
            b't' => ByteSet::single(b'\t'),
            b'v' => ByteSet::single(0x0b),
            b'x' => ByteSet::single(self.hex_escape(start)?),
            literal => ByteSet::single(literal),
        };

        Ok(set)
    }

    fn hex_escape(&mut self, escape_start: usize) -> Result<u8, LexErr> {
        let digits = self.chars_from(self.cursor);
        let byte = match hex_pair().parse(&digits[..]) {
            Ok(MatchStatus::Match { inner, .. }) => Some(inner),
            _ => None,
        }
        .ok_or_else(|| LexErr::new(escape_start, LexErrKind::MalformedHexEscape))?;

        self.cursor += 2;
        Ok(byte)
    }

    /// Scans `{m}`, `{m,}` or `{m,n}`. Once the opening brace is seen the
    /// remainder must form a valid bound.
    fn bound(&mut self) -> Result<Bound, LexErr> {
        let open = self.cursor;
        let malformed = || LexErr::new(open, LexErrKind::MalformedBound);
        let push_digit = |value: u32, d: u8| {
            value
                .checked_mul(10)
                .and_then(|value| value.checked_add(u32::from(d - b'0')))
                .ok_or_else(|| LexErr::new(open, LexErrKind::BoundOverflow))
        };

        let mut state = BoundState::Start;
        let mut min = 0;
        let mut max = None;

        while state != BoundState::End {
            state = match (state, self.peek()) {
                (BoundState::Start, Some(b'{')) => BoundState::ReadLeftBegin,
                (BoundState::ReadLeftBegin, Some(d @ b'0'..=b'9')) => {
                    min = push_digit(0, d)?;
                    BoundState::ReadLeft
                }
                (BoundState::ReadLeft, Some(d @ b'0'..=b'9')) => {
                    min = push_digit(min, d)?;
                    BoundState::ReadLeft
                }
                (BoundState::ReadLeft, Some(b',')) => BoundState::ReadRight,
                (BoundState::ReadLeft, Some(b'}')) => {
                    max = Some(min);
                    BoundState::End
                }
                (BoundState::ReadRight, Some(d @ b'0'..=b'9')) => {
                    max = Some(push_digit(max.unwrap_or(0), d)?);
                    BoundState::ReadRight
                }
                (BoundState::ReadRight, Some(b'}')) => BoundState::End,
                _ => return Err(malformed()),
            };
            self.cursor += 1;
        }

        match max {
            Some(max) if min > max => {
                Err(LexErr::new(open, LexErrKind::InvertedBound { min, max }))
            }
            _ => Ok(Bound::new(min, max)),
        }
    }

    fn bracket(&mut self) -> Result<ByteSet, LexErr> {
        let open = self.cursor;
        let unterminated = || LexErr::new(open, LexErrKind::UnterminatedBracket);
        self.cursor += 1;

        let mut set = ByteSet::new();
        let mut member = true;

        if self.peek() == Some(b'^') {
            set = non_nul();
            member = false;
            self.cursor += 1;
        }

        // a leading `]` or `-` is a literal member.
        if let Some(c @ (b']' | b'-')) = self.peek() {
            set.set(c, member);
            self.cursor += 1;
        }

        loop {
            match self.peek() {
                None => return Err(unterminated()),
                Some(b']') => {
                    self.cursor += 1;
                    return Ok(set);
                }
                Some(b'-') => match self.peek_at(1) {
                    None => return Err(unterminated()),
                    Some(b']') => {
                        set.set(b'-', member);
                        self.cursor += 1;
                    }
                    Some(upper) => {
                        let lower = self.bytes[self.cursor - 1];
                        set.fill_range(lower, upper, member);
                        self.cursor += 2;
                    }
                },
                Some(b'[') if self.peek_at(1) == Some(b':') => {
                    self.posix_class()?.fill(&mut set, member);
                }
                Some(c) => {
                    set.set(c, member);
                    self.cursor += 1;
                }
            }
        }
    }

    fn posix_class(&mut self) -> Result<PosixClass, LexErr> {
        let start = self.cursor;
        let input = self.chars_from(start);

        let (name, consumed) = match class_expression().parse(&input[..]) {
            Ok(MatchStatus::Match {
                remainder, inner, ..
            }) => Some((inner, input.len() - remainder.len())),
            _ => None,
        }
        .ok_or_else(|| LexErr::new(start, LexErrKind::MalformedClass))?;

        let class = PosixClass::from_name(&name)
            .ok_or_else(|| LexErr::new(start, LexErrKind::UnknownClass(name)))?;

        self.cursor += consumed;
        Ok(class)
    }
}
