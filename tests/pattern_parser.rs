use pathglob_rs::pattern::{CommandNode, ParserOptions, PatternError, parse_pattern};

fn parse(pattern: &str) -> CommandNode {
    parse_pattern(pattern, &ParserOptions { case_sensitive: true }).expect("pattern should parse")
}

#[test]
fn parses_sequence_with_group_alternation() {
    let root = parse("a(b|c)d");
    let CommandNode::Sequence(seq) = &root else {
        panic!("expected sequence, got {root:?}");
    };
    assert_eq!(seq.children.len(), 3);
    match &seq.children[0] {
        CommandNode::Literal(lit) => assert_eq!(lit.text, "a"),
        other => panic!("expected literal node, got {other:?}"),
    }
    match &seq.children[1] {
        CommandNode::Or(node) => {
            assert_eq!(node.children.len(), 2);
            assert!(!node.inverse);
        }
        other => panic!("expected or node, got {other:?}"),
    }
}

#[test]
fn operator_precedence_puts_or_above_and() {
    // a|b&c parses as a | (b & c)
    let root = parse("a|b&c");
    let CommandNode::Or(or) = &root else {
        panic!("expected or at the top, got {root:?}");
    };
    assert_eq!(or.children.len(), 2);
    match &or.children[1] {
        CommandNode::And(and) => assert_eq!(and.children.len(), 2),
        other => panic!("expected and node, got {other:?}"),
    }
}

#[test]
fn single_child_sequence_collapses() {
    match parse("abc") {
        CommandNode::Literal(lit) => {
            assert_eq!(lit.text, "abc");
            assert!(!lit.inverse);
        }
        other => panic!("expected literal node, got {other:?}"),
    }
}

#[test]
fn empty_pattern_is_an_empty_literal() {
    match parse("") {
        CommandNode::Literal(lit) => assert!(lit.text.is_empty()),
        other => panic!("expected literal node, got {other:?}"),
    }
}

#[test]
fn consecutive_stars_collapse() {
    let root = parse("a**b");
    let CommandNode::Sequence(seq) = &root else {
        panic!("expected sequence, got {root:?}");
    };
    assert_eq!(seq.children.len(), 3);
    assert!(matches!(&seq.children[1], CommandNode::Any(any) if any.except.is_none()));
}

#[test]
fn consecutive_anypath_collapse() {
    let root = parse("**/**/x");
    let CommandNode::Sequence(seq) = &root else {
        panic!("expected sequence, got {root:?}");
    };
    assert_eq!(seq.children.len(), 2);
    assert!(matches!(&seq.children[0], CommandNode::AnyPath(node) if !node.inverse));
}

#[test]
fn inverted_literal_becomes_an_except() {
    match parse("!(tmp)") {
        CommandNode::Any(any) => {
            assert_eq!(any.except.as_deref(), Some("tmp"));
            assert!(!any.inverse);
        }
        other => panic!("expected any node, got {other:?}"),
    }
}

#[test]
fn except_attaches_to_a_preceding_star() {
    let root = parse("a*!(b)c");
    let CommandNode::Sequence(seq) = &root else {
        panic!("expected sequence, got {root:?}");
    };
    assert_eq!(seq.children.len(), 3);
    match &seq.children[1] {
        CommandNode::Any(any) => assert_eq!(any.except.as_deref(), Some("b")),
        other => panic!("expected any node, got {other:?}"),
    }
}

#[test]
fn inverted_match_anything_is_dropped() {
    let root = parse("a!(*)b");
    let CommandNode::Sequence(seq) = &root else {
        panic!("expected sequence, got {root:?}");
    };
    assert_eq!(seq.children.len(), 2);
    assert!(matches!(&seq.children[0], CommandNode::Literal(lit) if lit.text == "a"));
    assert!(matches!(&seq.children[1], CommandNode::Literal(lit) if lit.text == "b"));
}

#[test]
fn empty_group_is_a_no_op() {
    let root = parse("a()b");
    let CommandNode::Sequence(seq) = &root else {
        panic!("expected sequence, got {root:?}");
    };
    assert_eq!(seq.children.len(), 2);
}

#[test]
fn repeated_not_toggles() {
    match parse("!abc") {
        CommandNode::Literal(lit) => assert!(lit.inverse),
        other => panic!("expected literal node, got {other:?}"),
    }
    match parse("!!abc") {
        CommandNode::Literal(lit) => assert!(!lit.inverse),
        other => panic!("expected literal node, got {other:?}"),
    }
}

#[test]
fn escaped_specials_are_plain_text() {
    match parse("`*`(x`)") {
        CommandNode::Literal(lit) => assert_eq!(lit.text, "*(x)"),
        other => panic!("expected literal node, got {other:?}"),
    }
}

#[test]
fn literals_fold_case_when_insensitive() {
    let root = parse_pattern("AbC", &ParserOptions::default()).expect("pattern should parse");
    match root {
        CommandNode::Literal(lit) => assert_eq!(lit.text, "abc"),
        other => panic!("expected literal node, got {other:?}"),
    }
}

#[test]
fn literals_fold_backslash_to_slash() {
    match parse("a\\b") {
        CommandNode::Literal(lit) => assert_eq!(lit.text, "a/b"),
        other => panic!("expected literal node, got {other:?}"),
    }
}

#[test]
fn rejects_trailing_close_parenthesis() {
    let err = parse_pattern("ab)", &ParserOptions::default()).expect_err("should fail");
    match err {
        PatternError::BadFormat { index, .. } => assert_eq!(index, 2),
        other => panic!("expected BadFormat, got {other:?}"),
    }
}

#[test]
fn rejects_unterminated_group() {
    let err = parse_pattern("a(b|c", &ParserOptions::default()).expect_err("should fail");
    assert!(matches!(err, PatternError::UnexpectedEof { .. }));
}

#[test]
fn rejects_dangling_binary_operator() {
    for pattern in ["a|", "a&", "a&|b"] {
        let err = parse_pattern(pattern, &ParserOptions::default()).expect_err("should fail");
        assert!(
            matches!(err, PatternError::BadFormat { .. }),
            "pattern {pattern:?} gave {err:?}"
        );
    }
}

#[test]
fn rejects_leading_binary_operator() {
    for pattern in ["|a", "&a", "!|a", "(|a)"] {
        let err = parse_pattern(pattern, &ParserOptions::default()).expect_err("should fail");
        assert!(
            matches!(err, PatternError::BadFormat { .. }),
            "pattern {pattern:?} gave {err:?}"
        );
    }
}

#[test]
fn rejects_bare_not_in_the_middle_of_a_sequence() {
    let err = parse_pattern("a!b", &ParserOptions::default()).expect_err("should fail");
    assert!(matches!(err, PatternError::BadFormat { .. }));
}

#[test]
fn parsing_is_deterministic() {
    let options = ParserOptions::default();
    let first = parse_pattern("src/**/t*`?.rs|!(legacy)", &options).expect("pattern should parse");
    let second = parse_pattern("src/**/t*`?.rs|!(legacy)", &options).expect("pattern should parse");
    assert_eq!(first, second);
}
