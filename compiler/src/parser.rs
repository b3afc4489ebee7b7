use crate::ast;
use crate::lexer::{LexErr, LexErrKind, Lexer, Token, TokenKind};
use regcc_routines::{Annotation, Bound};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrKind {
    Lex(LexErrKind),
    IllegalAtom,
    EmptyBranch,
    UnclosedGroup,
    UnmatchedParen,
}

impl std::fmt::Display for ParseErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lex(kind) => write!(f, "{}", kind),
            Self::IllegalAtom => write!(f, "illegal regex, expected a character or group"),
            Self::EmptyBranch => write!(f, "alternative should not be empty"),
            Self::UnclosedGroup => write!(f, "group should be closed by ')'"),
            Self::UnmatchedParen => write!(f, "unmatched ')'"),
        }
    }
}

/// A syntax error and the byte offset of the construct that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErr {
    offset: usize,
    kind: ParseErrKind,
}

impl ParseErr {
    pub fn new(offset: usize, kind: ParseErrKind) -> Self {
        Self { offset, kind }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> &ParseErrKind {
        &self.kind
    }
}

impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for ParseErr {}

impl From<LexErr> for ParseErr {
    fn from(src: LexErr) -> Self {
        Self::new(src.offset(), ParseErrKind::Lex(src.kind().clone()))
    }
}

/// Parses a complete pattern into its syntax tree.
pub fn parse(pattern: &[u8]) -> Result<ast::Regex, ParseErr> {
    let mut lexer = Lexer::new(pattern);
    Parser::new(&mut lexer).parse()
}

/// A recursive-descent parser over a borrowed lexer.
pub struct Parser<'a> {
    lexer: &'a mut Lexer,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: &'a mut Lexer) -> Self {
        Self { lexer }
    }

    pub fn parse(&mut self) -> Result<ast::Regex, ParseErr> {
        self.regex(None)
    }

    /// Returns the next token without consuming it.
    fn peek(&mut self) -> Result<Token, ParseErr> {
        let token = self.lexer.next_token()?;
        self.lexer.push_back(token.clone());
        Ok(token)
    }

    /// Parses alternatives until the end of input, or for a group opened at
    /// `open`, until its closing parenthesis.
    fn regex(&mut self, open: Option<usize>) -> Result<ast::Regex, ParseErr> {
        let mut branches = vec![];
        let mut annotation = Annotation::new();

        loop {
            let branch = self.branch()?;
            annotation.append(&branch.annotation);
            branches.push(branch);

            let token = self.lexer.next_token()?;
            match (&token.kind, open) {
                (TokenKind::Meta(b'|'), _) => annotation.push(b'|'),
                (TokenKind::Meta(b')'), Some(_)) | (TokenKind::End, None) => break,
                (TokenKind::Meta(b')'), None) => {
                    return Err(ParseErr::new(token.span.start, ParseErrKind::UnmatchedParen))
                }
                (TokenKind::End, Some(open)) => {
                    return Err(ParseErr::new(open, ParseErrKind::UnclosedGroup))
                }
                _ => return Err(ParseErr::new(token.span.start, ParseErrKind::IllegalAtom)),
            }
        }

        Ok(ast::Regex::new(branches, annotation))
    }

    fn branch(&mut self) -> Result<ast::Branch, ParseErr> {
        let mut pieces = vec![];
        let mut annotation = Annotation::new();

        loop {
            let next = self.peek()?;
            if next.is_end() || next.is_meta(b')') || next.is_meta(b'|') {
                if pieces.is_empty() {
                    return Err(ParseErr::new(next.span.start, ParseErrKind::EmptyBranch));
                }
                break;
            }

            let piece = self.piece()?;
            annotation.append(&piece.annotation);
            pieces.push(piece);
        }

        Ok(ast::Branch::new(pieces, annotation))
    }

    fn piece(&mut self) -> Result<ast::Piece, ParseErr> {
        let atom = self.atom()?;
        let mut annotation = atom.annotation().clone();

        let token = self.lexer.next_token()?;
        let bound = match token.kind {
            TokenKind::Meta(b'*') => Some(Bound::new(0, None)),
            TokenKind::Meta(b'+') => Some(Bound::new(1, None)),
            TokenKind::Meta(b'?') => Some(Bound::new(0, Some(1))),
            TokenKind::Bound(bound) => Some(bound),
            _ => None,
        };

        let bound = match bound {
            Some(bound) => {
                annotation.append(&self.lexer.annotation(&token));
                bound
            }
            None => {
                self.lexer.push_back(token);
                Bound::ONCE
            }
        };

        Ok(ast::Piece::new(atom, bound, annotation))
    }

    fn atom(&mut self) -> Result<ast::Atom, ParseErr> {
        let token = self.lexer.next_token()?;

        match token.kind {
            TokenKind::Charset(set) => Ok(ast::Atom::charset(set, self.lexer.annotation(&token))),
            TokenKind::Meta(b'(') => {
                let regex = self.regex(Some(token.span.start))?;

                let mut annotation = Annotation::from("(");
                annotation.append(&regex.annotation);
                annotation.push(b')');

                Ok(ast::Atom::group(regex, annotation))
            }
            _ => Err(ParseErr::new(token.span.start, ParseErrKind::IllegalAtom)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regcc_routines::ByteSet;

    fn charset(byte: u8) -> ast::Atom {
        ast::Atom::charset(ByteSet::single(byte), Annotation::from(&[byte][..]))
    }

    fn piece(atom: ast::Atom, bound: Bound, annotation: &str) -> ast::Piece {
        ast::Piece::new(atom, bound, Annotation::from(annotation))
    }

    #[test]
    fn should_parse_concatenation() {
        assert_eq!(
            Ok(ast::Regex::new(
                vec![ast::Branch::new(
                    vec![
                        piece(charset(b'a'), Bound::ONCE, "a"),
                        piece(charset(b'b'), Bound::ONCE, "b"),
                    ],
                    Annotation::from("ab")
                )],
                Annotation::from("ab")
            )),
            parse(b"ab")
        );
    }

    #[test]
    fn should_parse_alternation_into_branches() {
        let regex = parse(b"a|bc|d").expect("valid pattern");

        assert_eq!(Annotation::from("a|bc|d"), regex.annotation);
        assert_eq!(
            vec!["a", "bc", "d"],
            regex
                .branches
                .iter()
                .map(|branch| branch.annotation.to_string())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn should_parse_quantifiers() {
        let input_output = [
            ("a", Bound::ONCE, "a"),
            ("a*", Bound::new(0, None), "a*"),
            ("a+", Bound::new(1, None), "a+"),
            ("a?", Bound::new(0, Some(1)), "a?"),
            ("a{2}", Bound::new(2, Some(2)), "a{2}"),
            ("a{2,}", Bound::new(2, None), "a{2,}"),
            ("a{2,5}", Bound::new(2, Some(5)), "a{2,5}"),
        ];

        for (pattern, bound, annotation) in input_output {
            let expected = ast::Regex::new(
                vec![ast::Branch::new(
                    vec![piece(charset(b'a'), bound, annotation)],
                    Annotation::from(annotation),
                )],
                Annotation::from(annotation),
            );

            assert_eq!((pattern, Ok(expected)), (pattern, parse(pattern.as_bytes())));
        }
    }

    #[test]
    fn should_parse_nested_groups() {
        let regex = parse(b"x(a|b)*").expect("valid pattern");
        let pieces = &regex.branches[0].pieces;

        assert_eq!(2, pieces.len());
        assert_eq!(Annotation::from("(a|b)*"), pieces[1].annotation);
        assert_eq!(Bound::new(0, None), pieces[1].bound);

        match &pieces[1].atom {
            ast::Atom::Group { regex, annotation } => {
                assert_eq!(Annotation::from("(a|b)"), *annotation);
                assert_eq!(Annotation::from("a|b"), regex.annotation);
                assert_eq!(2, regex.branches.len());
            }
            other => panic!("expected a group, got {:?}", other),
        }
    }

    #[test]
    fn should_keep_pattern_text_as_root_annotation() {
        let patterns = ["a|b", "(a*)*", "[^a-c]{1,2}x", "\\x41\\d.", "((a)|b+)?c"];

        for pattern in patterns {
            let regex = parse(pattern.as_bytes()).expect("valid pattern");
            assert_eq!((pattern, pattern.to_string()), (pattern, regex.annotation.to_string()));
        }
    }

    #[test]
    fn should_reject_malformed_patterns() {
        let input_output = [
            ("(a", ParseErr::new(0, ParseErrKind::UnclosedGroup)),
            ("b(a|c", ParseErr::new(1, ParseErrKind::UnclosedGroup)),
            ("a)", ParseErr::new(1, ParseErrKind::UnmatchedParen)),
            ("a|", ParseErr::new(2, ParseErrKind::EmptyBranch)),
            ("|a", ParseErr::new(0, ParseErrKind::EmptyBranch)),
            ("()", ParseErr::new(1, ParseErrKind::EmptyBranch)),
            ("", ParseErr::new(0, ParseErrKind::EmptyBranch)),
            ("*a", ParseErr::new(0, ParseErrKind::IllegalAtom)),
            ("a**", ParseErr::new(2, ParseErrKind::IllegalAtom)),
            ("^a", ParseErr::new(0, ParseErrKind::IllegalAtom)),
            (
                "a{3,1}",
                ParseErr::new(1, ParseErrKind::Lex(LexErrKind::InvertedBound { min: 3, max: 1 })),
            ),
            ("a\\", ParseErr::new(1, ParseErrKind::Lex(LexErrKind::TrailingBackslash))),
            ("[ab", ParseErr::new(0, ParseErrKind::Lex(LexErrKind::UnterminatedBracket))),
        ];

        for (pattern, expected) in input_output {
            assert_eq!((pattern, Err(expected)), (pattern, parse(pattern.as_bytes())));
        }
    }

    #[test]
    fn should_format_errors_with_offset() {
        let err = parse(b"ab)").expect_err("unmatched paren");

        assert_eq!("unmatched ')' at offset 2", err.to_string());
    }
}
