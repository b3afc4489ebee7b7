use regcc::compile_to_source;

const PATTERNS: &[&str] = &["(a|b)*c", "[[:alpha:]_][[:alnum:]_]*", "a{2,5}|b+", "((x|y)z?)+"];

#[test]
fn should_render_identically_across_repeated_compilations() {
    for pattern in PATTERNS {
        let first = compile_to_source(pattern.as_bytes(), "matches");
        let second = compile_to_source(pattern.as_bytes(), "matches");

        assert_eq!((pattern, first), (pattern, second));
    }
}

#[test]
fn should_compile_independent_patterns_concurrently() {
    let sequential = PATTERNS
        .iter()
        .map(|pattern| compile_to_source(pattern.as_bytes(), "matches"))
        .collect::<Vec<_>>();

    let concurrent = std::thread::scope(|s| {
        let handles = PATTERNS
            .iter()
            .map(|pattern| s.spawn(move || compile_to_source(pattern.as_bytes(), "matches")))
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().expect("compilation thread panicked"))
            .collect::<Vec<_>>()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn should_not_leak_state_from_a_failed_compilation() {
    let before = compile_to_source(b"a|b", "matches");

    assert!(compile_to_source(b"(a|", "matches").is_err());
    assert!(compile_to_source(b"a{", "matches").is_err());

    assert_eq!(before, compile_to_source(b"a|b", "matches"));
}
