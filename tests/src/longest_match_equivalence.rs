use regcc::ast::{Atom, Branch, Piece, Regex};
use regcc::{compile, parse};
use regcc_routines::run;

/// Evaluates a syntax tree directly, without lowering it to routines.
fn eval_regex(regex: &Regex, input: &[u8]) -> Option<usize> {
    regex
        .branches
        .iter()
        .filter_map(|branch| eval_branch(branch, input))
        .max()
}

fn eval_branch(branch: &Branch, input: &[u8]) -> Option<usize> {
    let mut consumed = 0;
    for piece in branch.pieces.iter() {
        consumed += eval_piece(piece, &input[consumed..])?;
    }
    Some(consumed)
}

fn eval_piece(piece: &Piece, input: &[u8]) -> Option<usize> {
    let mut consumed = 0;
    let mut repetitions = 0u32;
    let mut consecutive_empty = 0;

    loop {
        let below_max = piece.bound.max.map_or(true, |max| repetitions < max);
        if !below_max {
            return Some(consumed);
        }

        match eval_atom(&piece.atom, &input[consumed..]) {
            Some(step) => {
                repetitions += 1;
                consumed += step;

                consecutive_empty = if step == 0 { consecutive_empty + 1 } else { 0 };
                let past_min = repetitions > piece.bound.min;
                if piece.bound.max.is_none() && past_min && consecutive_empty >= 2 {
                    return Some(consumed);
                }
            }
            None if repetitions < piece.bound.min => return None,
            None => return Some(consumed),
        }
    }
}

fn eval_atom(atom: &Atom, input: &[u8]) -> Option<usize> {
    match atom {
        Atom::Charset { set, .. } => input.first().filter(|byte| set.contains(**byte)).map(|_| 1),
        Atom::Group { regex, .. } => eval_regex(regex, input),
    }
}

/// Every string over `alphabet` of at most `max_len` bytes.
pub(crate) fn inputs_over(alphabet: &[u8], max_len: usize) -> Vec<Vec<u8>> {
    let mut inputs = vec![vec![]];
    let mut frontier = vec![vec![]];

    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|prefix: &Vec<u8>| {
                alphabet.iter().map(move |byte| {
                    let mut input = prefix.clone();
                    input.push(*byte);
                    input
                })
            })
            .collect();
        inputs.extend(frontier.iter().cloned());
    }

    inputs
}

const PATTERNS: &[&str] = &[
    "a",
    "abc",
    "a|ab",
    "ab|a",
    "a*",
    "a+b",
    "a?b?c?",
    "(a|b)*c",
    "(a|ab)(c|bcd)",
    "(a*)*",
    "(a*|b)+",
    "(a?)*b",
    "a{2}",
    "a{0,0}b",
    "a{2,}",
    "(ab){1,2}",
    "[ab]{2,3}c?",
    "[^a]*",
    "[^a-b]|a(b|c)*",
    "((a|b)c)*|a.b",
    "\\x61+|[[:lower:]]{3}",
];

#[test]
fn should_agree_with_direct_tree_evaluation() {
    let inputs = inputs_over(b"abc", 5);

    for pattern in PATTERNS {
        let regex = parse(pattern.as_bytes()).expect("valid pattern");
        let routines = compile(&regex);

        for input in inputs.iter() {
            let expected = eval_regex(&regex, input);
            let actual = run(&routines, input);

            assert_eq!(
                ((pattern, String::from_utf8_lossy(input)), expected),
                ((pattern, String::from_utf8_lossy(input)), actual)
            );
        }
    }
}

#[test]
fn should_match_documented_examples() {
    let input_output = [
        ("a{0,0}", "", Some(0)),
        ("a{0,0}", "a", Some(0)),
        ("a{0,0}", "ba", Some(0)),
        ("a{2,}", "a", None),
        ("a{2,}", "aa", Some(2)),
        ("a{2,}", "aaaaa", Some(5)),
        ("(a*)*", "", Some(0)),
        ("[^a-c]", "a", None),
        ("[^a-c]", "b", None),
        ("[^a-c]", "c", None),
        ("[^a-c]", "d", Some(1)),
        ("a|ab", "ab", Some(2)),
    ];

    for (pattern, input, expected) in input_output {
        let routines = regcc::compile_pattern(pattern.as_bytes()).expect("valid pattern");

        assert_eq!(
            ((pattern, input), expected),
            ((pattern, input), run(&routines, input.as_bytes()))
        );
    }
}

#[test]
fn should_reject_documented_malformed_patterns() {
    use regcc::{LexErrKind, ParseErrKind};

    let input_output = [
        ("a{3,1}", ParseErrKind::Lex(LexErrKind::InvertedBound { min: 3, max: 1 })),
        ("(a", ParseErrKind::UnclosedGroup),
        ("a\\", ParseErrKind::Lex(LexErrKind::TrailingBackslash)),
    ];

    for (pattern, expected) in input_output {
        let actual = parse(pattern.as_bytes()).map_err(|e| e.kind().clone());

        assert_eq!((pattern, Err(expected)), (pattern, actual.map(|_| ())));
    }
}
