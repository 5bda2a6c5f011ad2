/// Expression tree produced by the parser. Immutable once built; a compiled
/// pattern keeps its root alive across `test()` calls.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandNode {
    Literal(LiteralNode),
    Any(AnyNode),
    AnyPath(AnyPathNode),
    And(BoolNode),
    Or(BoolNode),
    Sequence(SequenceNode),
}

impl CommandNode {
    pub fn invert(&mut self) {
        match self {
            CommandNode::Literal(node) => node.inverse = !node.inverse,
            CommandNode::Any(node) => node.inverse = !node.inverse,
            CommandNode::AnyPath(node) => node.inverse = !node.inverse,
            CommandNode::And(node) | CommandNode::Or(node) => node.inverse = !node.inverse,
            CommandNode::Sequence(node) => node.inverse = !node.inverse,
        }
    }

    pub fn is_inverse(&self) -> bool {
        match self {
            CommandNode::Literal(node) => node.inverse,
            CommandNode::Any(node) => node.inverse,
            CommandNode::AnyPath(node) => node.inverse,
            CommandNode::And(node) | CommandNode::Or(node) => node.inverse,
            CommandNode::Sequence(node) => node.inverse,
        }
    }

    /// Exact number of bytes this node consumes, or `None` when unbounded.
    /// Inverted nodes are unbounded: they accept slices of any width that
    /// fail the underlying match.
    pub fn width(&self) -> Option<usize> {
        match self {
            CommandNode::Literal(node) => (!node.inverse).then_some(node.text.len()),
            CommandNode::Any(_) | CommandNode::AnyPath(_) => None,
            CommandNode::And(node) | CommandNode::Or(node) => {
                if node.inverse {
                    return None;
                }
                let mut width = None;
                for child in &node.children {
                    let w = child.width()?;
                    match width {
                        None => width = Some(w),
                        Some(prev) if prev == w => {}
                        Some(_) => return None,
                    }
                }
                width
            }
            CommandNode::Sequence(node) => {
                if node.inverse {
                    return None;
                }
                let mut total = 0usize;
                for child in &node.children {
                    total += child.width()?;
                }
                Some(total)
            }
        }
    }
}

/// A run of literal text matched verbatim (escapes already resolved).
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub text: String,
    pub inverse: bool,
}

impl LiteralNode {
    pub fn new(text: String, inverse: bool) -> Self {
        Self { text, inverse }
    }

    pub fn empty() -> Self {
        Self::new(String::new(), false)
    }
}

/// A `*` wildcard: one separator-free fragment, optionally excluding a
/// literal substring.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyNode {
    pub except: Option<String>,
    pub inverse: bool,
}

impl AnyNode {
    pub fn new(except: Option<String>, inverse: bool) -> Self {
        Self { except, inverse }
    }
}

/// A `**/` wildcard: zero or more whole path segments.
#[derive(Debug, Clone, PartialEq)]
pub struct AnyPathNode {
    pub inverse: bool,
}

impl AnyPathNode {
    pub fn new(inverse: bool) -> Self {
        Self { inverse }
    }
}

/// Shared payload of `And` and `Or` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolNode {
    pub children: Vec<CommandNode>,
    pub inverse: bool,
}

impl BoolNode {
    pub fn new(children: Vec<CommandNode>, inverse: bool) -> Self {
        Self { children, inverse }
    }
}

/// Concatenation: children consume the candidate range contiguously and
/// exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNode {
    pub children: Vec<CommandNode>,
    pub inverse: bool,
}

impl SequenceNode {
    pub fn new(children: Vec<CommandNode>, inverse: bool) -> Self {
        Self { children, inverse }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_width_is_exact() {
        let node = CommandNode::Literal(LiteralNode::new("abc".into(), false));
        assert_eq!(node.width(), Some(3));
    }

    #[test]
    fn inverted_literal_is_unbounded() {
        let node = CommandNode::Literal(LiteralNode::new("abc".into(), true));
        assert_eq!(node.width(), None);
    }

    #[test]
    fn or_width_requires_equal_children() {
        let same = CommandNode::Or(BoolNode::new(
            vec![
                CommandNode::Literal(LiteralNode::new("ab".into(), false)),
                CommandNode::Literal(LiteralNode::new("cd".into(), false)),
            ],
            false,
        ));
        assert_eq!(same.width(), Some(2));

        let mixed = CommandNode::Or(BoolNode::new(
            vec![
                CommandNode::Literal(LiteralNode::new("ab".into(), false)),
                CommandNode::Literal(LiteralNode::new("c".into(), false)),
            ],
            false,
        ));
        assert_eq!(mixed.width(), None);
    }

    #[test]
    fn sequence_width_sums_children() {
        let seq = CommandNode::Sequence(SequenceNode::new(
            vec![
                CommandNode::Literal(LiteralNode::new("a".into(), false)),
                CommandNode::Literal(LiteralNode::new("bc".into(), false)),
            ],
            false,
        ));
        assert_eq!(seq.width(), Some(3));

        let open = CommandNode::Sequence(SequenceNode::new(
            vec![
                CommandNode::Literal(LiteralNode::new("a".into(), false)),
                CommandNode::Any(AnyNode::new(None, false)),
            ],
            false,
        ));
        assert_eq!(open.width(), None);
    }
}
