use regcc::lexer::{Lexer, TokenKind};
use regcc::{compile_pattern, parse};

fn token_kinds(pattern: &[u8]) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(pattern);
    let mut kinds = vec![];

    loop {
        match lexer.next_token() {
            Ok(token) if token.is_end() => return kinds,
            Ok(token) => kinds.push(token.kind),
            Err(e) => panic!("failed to lex {:?}: {}", String::from_utf8_lossy(pattern), e),
        }
    }
}

const PATTERNS: &[&str] = &[
    "a",
    "a|b|c",
    "(a|b)*c{2,3}",
    "((a))",
    "[]a-c[:digit:]-]+",
    "[^-x]?\\.",
    "\\d\\D\\s\\S\\w\\W\\f\\n\\r\\t\\v\\x7f",
    "x{0,0}y{7}z{1,}",
    "(a*)*|.+",
    "\t\x01\x7f",
];

#[test]
fn should_relex_root_annotation_to_the_same_tokens() {
    for pattern in PATTERNS {
        let regex = parse(pattern.as_bytes()).expect("valid pattern");
        let annotation = regex.annotation.as_bytes();

        assert_eq!(
            (pattern, token_kinds(pattern.as_bytes())),
            (pattern, token_kinds(annotation))
        );
    }
}

#[test]
fn should_annotate_every_routine_with_a_valid_pattern() {
    for pattern in PATTERNS {
        let routines = compile_pattern(pattern.as_bytes()).expect("valid pattern");

        for routine in routines.iter() {
            let annotation = routine.annotation();

            assert!(!annotation.is_empty(), "{}: empty annotation", pattern);
            assert!(
                parse(annotation.as_bytes()).is_ok(),
                "{}: annotation {:?} does not parse",
                pattern,
                annotation
            );
        }
    }
}

#[test]
fn should_escape_non_printable_bytes_in_rendered_comments() {
    let source = regcc::compile_to_source(b"\t\x01\x7f", "matches").expect("valid pattern");

    assert!(source.starts_with("// \\x09\nfn atom_000"));
    assert!(source.contains("// \\x09\\x01\\x7f\n"));
    assert!(source.lines().all(|line| !line.contains('\t')));
}
