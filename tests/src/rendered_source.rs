use crate::longest_match_equivalence::inputs_over;
use regcc::compile_pattern;
use regcc_routines::run;

include!(concat!(env!("OUT_DIR"), "/generated.rs"));

#[test]
fn should_agree_with_routine_evaluation_when_compiled() {
    let inputs = inputs_over(b"abc", 5);

    for (pattern, matches) in GENERATED {
        let routines = compile_pattern(pattern.as_bytes()).expect("valid pattern");

        for input in inputs.iter() {
            assert_eq!(
                ((pattern, String::from_utf8_lossy(input)), run(&routines, input)),
                ((pattern, String::from_utf8_lossy(input)), matches(input.as_slice()))
            );
        }
    }
}

#[test]
fn should_match_documented_examples_when_compiled() {
    let input_output = [
        ("a|ab", "ab", Some(2)),
        ("a{0,0}b", "b", Some(1)),
        ("a{0,0}b", "ab", None),
        ("a{2,}", "a", None),
        ("a{2,}", "aaaaa", Some(5)),
        ("(a*)*", "", Some(0)),
        ("[^[:ascii:]]|c", "a", None),
    ];

    for (pattern, input, expected) in input_output {
        let matches = GENERATED
            .iter()
            .find(|(compiled, _)| *compiled == pattern)
            .map(|(_, matches)| *matches)
            .expect("pattern is compiled by the build script");

        assert_eq!(((pattern, input), expected), ((pattern, input), matches(input.as_bytes())));
    }
}
