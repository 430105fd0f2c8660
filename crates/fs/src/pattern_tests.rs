use super::*;

fn exclude(raw: &str) -> Pattern {
    Pattern::exclude(raw)
        .expect("valid pattern")
        .expect("non-empty pattern")
}

#[test]
fn clean_normalizes_segments() {
    let cases: &[(&str, &str)] = &[
        ("a/b", "a/b"),
        ("./a/b/", "a/b"),
        ("/a//b", "a/b"),
        ("a/./b", "a/b"),
        ("a/../b", "b"),
        ("../a", "../a"),
        ("a/b/../../..", ".."),
        (".", "."),
        ("./", "."),
    ];

    for (input, expected) in cases {
        assert_eq!(clean(input), *expected, "clean({input:?})");
    }
}

#[test]
fn blank_patterns_are_ignored() {
    assert!(Pattern::exclude("").unwrap().is_none());
    assert!(Pattern::include("   ").unwrap().is_none());
}

#[test]
fn lone_bang_is_rejected() {
    match Pattern::exclude("!") {
        Err(WalkError::Pattern { pattern, .. }) => assert_eq!(pattern, "!"),
        other => panic!("expected pattern error, got {other:?}"),
    }
}

#[test]
fn unclosed_class_is_rejected() {
    assert!(matches!(
        Pattern::include("a/[bc"),
        Err(WalkError::Pattern { .. })
    ));
}

#[test]
fn bang_is_literal_in_include_patterns() {
    let p = Pattern::include("!keep").unwrap().unwrap();
    assert!(!p.negated());
    assert!(p.is_match("!keep"));
}

#[test]
fn negation_is_parsed_and_cleaned() {
    let p = exclude("!./secrets/readme.txt");
    assert!(p.negated());
    assert!(p.is_match("secrets/readme.txt"));
    assert_eq!(p.prefix(), "secrets/readme.txt");
}

#[test]
fn star_does_not_cross_separators() {
    let p = exclude("a/*");
    assert!(p.is_match("a/b.txt"));
    assert!(p.is_match("a/c"));
    assert!(!p.is_match("a/c/d.txt"));
    assert!(!p.is_match("a"));
}

#[test]
fn shell_glob_features() {
    let cases: &[(&str, &str, bool)] = &[
        ("?.txt", "a.txt", true),
        ("?.txt", "ab.txt", false),
        ("[ab].rs", "b.rs", true),
        ("[!ab].rs", "c.rs", true),
        ("[!ab].rs", "a.rs", false),
        ("\\*.md", "*.md", true),
        ("\\*.md", "x.md", false),
        ("**/node_modules", "web/app/node_modules", true),
        ("*.log", ".hidden.log", true),
    ];

    for (pattern, path, expected) in cases {
        assert_eq!(
            exclude(pattern).is_match(path),
            *expected,
            "{pattern:?} vs {path:?}"
        );
    }
}

#[test]
fn wildcards_match_whole_characters() {
    let cases: &[(&str, &str, bool)] = &[
        ("?.txt", "é.txt", true),
        ("caf?", "café", true),
        ("caf?", "cafée", false),
        ("[é].txt", "é.txt", true),
        ("[!é].txt", "é.txt", false),
        ("[!é].txt", "e.txt", true),
        ("日本/*", "日本/語.md", true),
        ("??", "日本", true),
        ("?", "😀", true),
    ];

    for (pattern, path, expected) in cases {
        assert_eq!(
            exclude(pattern).is_match(path),
            *expected,
            "{pattern:?} vs {path:?}"
        );
        assert_eq!(
            Pattern::include(pattern).unwrap().unwrap().is_match(path),
            *expected,
            "include {pattern:?} vs {path:?}"
        );
    }
}

#[test]
fn escapes_and_classes_follow_shell_rules() {
    let cases: &[(&str, &str, bool)] = &[
        ("a\\?", "a?", true),
        ("a\\?", "ab", false),
        ("\\[x]", "[x]", true),
        ("\\[x]", "x", false),
        ("[^ab].rs", "c.rs", true),
        ("[^ab].rs", "a.rs", false),
        ("[\\]x]", "]", true),
        ("[\\]x]", "x", true),
        ("[]x]", "]", true),
        ("[a\\-]", "-", true),
        ("[a\\-]", "b", false),
        ("[a-c]", "b", true),
        ("[\\!a]", "!", true),
        ("[\\!a]", "b", false),
        ("x]", "x]", true),
        ("a{b,c}", "a{b,c}", true),
        ("a{b,c}", "ab", false),
        ("[a]", "/", false),
        ("a**b", "axyb", true),
        ("a**b", "a/b", false),
        ("a/**", "a/b/c", true),
    ];

    for (pattern, path, expected) in cases {
        assert_eq!(
            exclude(pattern).is_match(path),
            *expected,
            "{pattern:?} vs {path:?}"
        );
    }
}

#[test]
fn to_glob_rewrites_shell_syntax() {
    let cases: &[(&str, &str)] = &[
        ("plain/path", "plain/path"),
        ("a\\*b", "a[*]b"),
        ("[^ab]", "[!ab]"),
        ("[\\]a]", "[]a]"),
        ("x]", "x[]]"),
        ("a***", "a*"),
        ("**/x/**", "**/x/**"),
    ];

    for (input, expected) in cases {
        assert_eq!(to_glob(input).as_deref(), Ok(*expected), "to_glob({input:?})");
    }
}

#[test]
fn trailing_backslash_is_rejected() {
    assert!(matches!(
        Pattern::exclude("dir\\"),
        Err(WalkError::Pattern { .. })
    ));
}

#[test]
fn prefix_stops_at_first_wildcard() {
    let cases: &[(&str, &str)] = &[
        ("src/*.rs", "src/"),
        ("*.txt", ""),
        ("docs/ap?/x", "docs/ap"),
        ("a/[bc]/d", "a/"),
        ("a/{b,c}", "a/"),
        ("plain/path", "plain/path"),
    ];

    for (pattern, expected) in cases {
        assert_eq!(exclude(pattern).prefix(), *expected, "prefix of {pattern:?}");
    }
}

#[test]
fn ancestor_matching_uses_pattern_depth() {
    let p = exclude("secrets");
    assert!(p.matches_path_or_ancestor("secrets"));
    assert!(p.matches_path_or_ancestor("secrets/key"));
    assert!(p.matches_path_or_ancestor("secrets/deep/key"));
    assert!(!p.matches_path_or_ancestor("other/secrets"));

    let p = exclude("a/*");
    assert!(p.matches_path_or_ancestor("a/c/d.txt"));
    assert!(!p.matches_path_or_ancestor("a"));
    assert!(!p.matches_path_or_ancestor("b/c/d"));
}

#[test]
fn ancestor_with_segments_picks_leading_segments() {
    assert_eq!(ancestor_with_segments("a/b/c", 1), Some("a"));
    assert_eq!(ancestor_with_segments("a/b/c", 2), Some("a/b"));
    assert_eq!(ancestor_with_segments("a/b/c", 3), None);
    assert_eq!(ancestor_with_segments("a", 1), None);
}

#[test]
fn prefix_compatible_compares_against_descendants() {
    let cases: &[(&str, &str, bool)] = &[
        ("", "anything", true),
        ("a/", "a", true),
        ("a/b/c", "a", true),
        ("a/b/c", "a/b", true),
        ("a", "a", true),
        ("ab", "a", false),
        ("a/", "ab", false),
        ("b/", "a", false),
        ("a/b", "a/bc", true),
        ("a/b/", "a/bc", false),
        ("a/bc/", "a/b", false),
        ("a/b", "a/b/c/d", true),
    ];

    for (prefix, dir, expected) in cases {
        assert_eq!(
            prefix_compatible(prefix, dir),
            *expected,
            "prefix {prefix:?} under dir {dir:?}"
        );
    }
}
