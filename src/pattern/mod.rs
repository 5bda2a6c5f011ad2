mod ast;
mod error;
mod lexer;
mod matcher;
mod parser;

pub use ast::{AnyNode, AnyPathNode, BoolNode, CommandNode, LiteralNode, SequenceNode};
pub use error::{PatternError, PatternResult};
pub use lexer::{Lexer, Token};
pub use matcher::match_pattern;
pub use parser::{ParserOptions, parse_pattern};
