//! Chain expression parser.
//!
//! A chain is a one-line description of a path through the graph. Each `.`
//! introduces an edge from every node of the previous segment to every node of
//! the next one, and an optional leading integer gives the multiplicity of a
//! node on its side of the relation.
//!
//! # Grammar
//!
//! ```text
//! chain     = segment { '.' segment }
//! segment   = token { [','] token }
//! token     = [ digit+ ] name
//! name      = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! The ideographic full stop `。` and fullwidth `．` are read as `.`, and the
//! fullwidth comma `，` as `,`. Whitespace between tokens is ignored.
//!
//! # Example
//!
//! ```text
//! 2a.3b        a→b with ratio 2:3
//! a.b,c        a→b and a→c
//! a.b.c,d      a→b, b→c, b→d
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a chain expression.
pub fn parse(input: &str) -> Result<Chain> {
    let mut parser = Parser::new(input)?;
    parser.parse()
}
