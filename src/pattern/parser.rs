use crate::path::fold_path;
use crate::pattern::ast::{AnyNode, AnyPathNode, BoolNode, CommandNode, LiteralNode, SequenceNode};
use crate::pattern::lexer::{Lexer, Token};
use crate::pattern::{PatternError, PatternResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub case_sensitive: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { case_sensitive: false }
    }
}

/// Parses a pattern into its command tree.
///
/// Grammar, tightest-binding first: sequence, `!`, `&`, `|`. Literal text is
/// folded here (separator unification, optional lower-casing) so that the
/// matcher can compare raw bytes.
#[tracing::instrument(level = "trace", skip(options), fields(pattern = %pattern))]
pub fn parse_pattern(pattern: &str, options: &ParserOptions) -> PatternResult<CommandNode> {
    let mut lexer = Lexer::new(pattern);
    let node = parse_or(&mut lexer, pattern, options)?;
    let index = lexer.byte_index();
    match lexer.next_token() {
        Token::Eof => Ok(node),
        _ => Err(PatternError::BadFormat {
            pattern: pattern.to_string(),
            index,
        }),
    }
}

fn parse_or(lexer: &mut Lexer, pattern: &str, options: &ParserOptions) -> PatternResult<CommandNode> {
    let mut children = vec![parse_and(lexer, pattern, options)?];
    loop {
        match lexer.next_token() {
            Token::Or => {
                ensure_operand(lexer, pattern)?;
                children.push(parse_and(lexer, pattern, options)?);
            }
            token => {
                lexer.unget(token);
                break;
            }
        }
    }
    if children.len() == 1 {
        Ok(children.remove(0))
    } else {
        Ok(CommandNode::Or(BoolNode::new(children, false)))
    }
}

fn parse_and(lexer: &mut Lexer, pattern: &str, options: &ParserOptions) -> PatternResult<CommandNode> {
    let mut children = vec![parse_not(lexer, pattern, options)?];
    loop {
        match lexer.next_token() {
            Token::And => {
                ensure_operand(lexer, pattern)?;
                children.push(parse_not(lexer, pattern, options)?);
            }
            token => {
                lexer.unget(token);
                break;
            }
        }
    }
    if children.len() == 1 {
        Ok(children.remove(0))
    } else {
        Ok(CommandNode::And(BoolNode::new(children, false)))
    }
}

fn parse_not(lexer: &mut Lexer, pattern: &str, options: &ParserOptions) -> PatternResult<CommandNode> {
    // Leading '!' tokens XOR together into a single toggle.
    let mut inverted = false;
    loop {
        match lexer.next_token() {
            Token::Not => inverted = !inverted,
            token => {
                lexer.unget(token);
                break;
            }
        }
    }

    let mut node = parse_sequence(lexer, pattern, options)?;
    if inverted {
        node.invert();
    }
    Ok(node)
}

fn parse_sequence(
    lexer: &mut Lexer,
    pattern: &str,
    options: &ParserOptions,
) -> PatternResult<CommandNode> {
    // A sequence may be empty, but it cannot begin at a binary operator:
    // that would be an operand-less '&' or '|' (as in "|a" or "!&b").
    let token = lexer.next_token();
    let leading_operator = matches!(token, Token::And | Token::Or);
    lexer.unget(token);
    if leading_operator {
        return Err(PatternError::BadFormat {
            pattern: pattern.to_string(),
            index: lexer.byte_index(),
        });
    }

    let mut children: Vec<CommandNode> = Vec::new();
    loop {
        match lexer.next_token() {
            Token::Text(text) => {
                let folded = fold_path(&text, options.case_sensitive);
                push_child(&mut children, CommandNode::Literal(LiteralNode::new(folded, false)));
            }
            Token::Any => {
                push_child(&mut children, CommandNode::Any(AnyNode::new(None, false)));
            }
            Token::AnyPath => {
                push_child(&mut children, CommandNode::AnyPath(AnyPathNode::new(false)));
            }
            Token::GroupStart => {
                let inner = parse_or(lexer, pattern, options)?;
                expect_group_end(lexer, pattern)?;
                push_child(&mut children, inner);
            }
            Token::InvertedGroupStart => {
                let mut inner = parse_or(lexer, pattern, options)?;
                expect_group_end(lexer, pattern)?;
                inner.invert();
                push_child(&mut children, inner);
            }
            token => {
                lexer.unget(token);
                break;
            }
        }
    }

    Ok(match children.len() {
        0 => CommandNode::Literal(LiteralNode::empty()),
        1 => children.remove(0),
        _ => CommandNode::Sequence(SequenceNode::new(children, false)),
    })
}

/// Appends a child to a sequence under construction, applying the local
/// rewrites that keep the tree small:
/// - an empty literal is a no-op;
/// - an inverted literal becomes an "except" on a `*`, attaching to an
///   immediately preceding bare `*` when one is there;
/// - an inverted bare `*` contributes nothing;
/// - runs of `*` collapse, as do runs of `**/`.
fn push_child(children: &mut Vec<CommandNode>, node: CommandNode) {
    match node {
        CommandNode::Literal(lit) if !lit.inverse && lit.text.is_empty() => {}
        CommandNode::Literal(lit) if lit.inverse => {
            if let Some(CommandNode::Any(prev)) = children.last_mut()
                && !prev.inverse
                && prev.except.is_none()
            {
                prev.except = Some(lit.text);
            } else {
                children.push(CommandNode::Any(AnyNode::new(Some(lit.text), false)));
            }
        }
        CommandNode::Any(any) if any.inverse && any.except.is_none() => {}
        CommandNode::Any(any) if !any.inverse && any.except.is_none() => {
            if !matches!(children.last(), Some(CommandNode::Any(prev)) if !prev.inverse) {
                children.push(CommandNode::Any(any));
            }
        }
        CommandNode::AnyPath(path) if !path.inverse => {
            if !matches!(children.last(), Some(CommandNode::AnyPath(prev)) if !prev.inverse) {
                children.push(CommandNode::AnyPath(path));
            }
        }
        other => children.push(other),
    }
}

fn expect_group_end(lexer: &mut Lexer, pattern: &str) -> PatternResult<()> {
    let index = lexer.byte_index();
    match lexer.next_token() {
        Token::GroupEnd => Ok(()),
        Token::Eof => Err(PatternError::UnexpectedEof {
            pattern: pattern.to_string(),
        }),
        _ => Err(PatternError::BadFormat {
            pattern: pattern.to_string(),
            index,
        }),
    }
}

/// Rejects a dangling `&` or `|` by requiring that something which can start
/// a sequence comes next.
fn ensure_operand(lexer: &mut Lexer, pattern: &str) -> PatternResult<()> {
    let token = lexer.next_token();
    let ok = matches!(
        token,
        Token::Text(_)
            | Token::Any
            | Token::AnyPath
            | Token::GroupStart
            | Token::InvertedGroupStart
            | Token::Not
    );
    lexer.unget(token);
    let index = lexer.byte_index();
    if ok {
        Ok(())
    } else {
        Err(PatternError::BadFormat {
            pattern: pattern.to_string(),
            index,
        })
    }
}
