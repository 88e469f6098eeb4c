//! Parser for chain expressions.

use super::ast::{Chain, ChainLink, Segment};
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{RatioGraphError, Result};

/// Parser for a single chain expression.
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given input.
    pub fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            input,
            lexer,
            current,
        })
    }

    /// Parse the whole expression.
    pub fn parse(&mut self) -> Result<Chain> {
        if self.current.kind == TokenKind::Eof {
            return Err(self.error("empty chain"));
        }

        let mut chain = Chain::default();
        loop {
            chain.segments.push(self.parse_segment()?);

            match self.current.kind {
                TokenKind::Dot => self.advance()?,
                TokenKind::Eof => break,
                _ => {
                    return Err(self.error(format!(
                        "unexpected '{}' at column {}",
                        self.current.text, self.current.column
                    )));
                }
            }
        }

        if chain.link_count() < 2 {
            return Err(self.error("expected at least two nodes, e.g. a.b"));
        }
        if chain.segments.len() < 2 {
            return Err(self.error("expected at least two segments separated by '.'"));
        }

        Ok(chain)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> RatioGraphError {
        RatioGraphError::parse(self.input, message)
    }

    fn parse_segment(&mut self) -> Result<Segment> {
        let mut segment = Segment::default();
        loop {
            segment.links.push(self.parse_link()?);

            match self.current.kind {
                TokenKind::Comma => self.advance()?,
                // Concatenated tokens such as `2a 3b` stay in the same segment
                TokenKind::Number | TokenKind::Name => {}
                _ => break,
            }
        }
        Ok(segment)
    }

    fn parse_link(&mut self) -> Result<ChainLink> {
        let mut multiplicity = 1;
        if self.current.kind == TokenKind::Number {
            multiplicity = self.parse_multiplicity()?;
            self.advance()?;
        }

        if self.current.kind != TokenKind::Name {
            return Err(self.error(format!(
                "empty node name at column {}",
                self.current.column
            )));
        }

        let name = std::mem::take(&mut self.current.text);
        self.advance()?;
        Ok(ChainLink { name, multiplicity })
    }

    fn parse_multiplicity(&self) -> Result<u32> {
        let text = &self.current.text;
        let value: u32 = text.parse().map_err(|_| {
            self.error(format!(
                "multiplicity '{}' at column {} is too large",
                text, self.current.column
            ))
        })?;
        if value == 0 {
            return Err(self.error(format!(
                "multiplicity at column {} must be at least 1",
                self.current.column
            )));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    fn names(chain: &Chain) -> Vec<(&str, u32)> {
        chain
            .links()
            .map(|l| (l.name.as_str(), l.multiplicity))
            .collect()
    }

    #[test]
    fn test_parse_simple_pair() {
        let chain = parse("a.b").unwrap();
        assert_eq!(names(&chain), vec![("a", 1), ("b", 1)]);
        assert_eq!(chain.segments.len(), 2);
    }

    #[test]
    fn test_parse_multiplicities() {
        let chain = parse("2a.3b").unwrap();
        assert_eq!(names(&chain), vec![("a", 2), ("b", 3)]);
    }

    #[test]
    fn test_parse_fan_out() {
        let chain = parse("a.b,c").unwrap();
        assert_eq!(chain.segments[1].links.len(), 2);
        let pairs: Vec<_> = chain
            .edge_pairs()
            .into_iter()
            .map(|(s, t)| (s.name.as_str(), t.name.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("a", "c")]);
    }

    #[test]
    fn test_parse_concatenated_tokens() {
        let chain = parse("2a 3b.4c").unwrap();
        assert_eq!(chain.segments[0].links.len(), 2);
        assert_eq!(names(&chain), vec![("a", 2), ("b", 3), ("c", 4)]);
    }

    #[test]
    fn test_parse_whitespace_and_full_stop() {
        let chain = parse(" a \u{3002} b . c ").unwrap();
        assert_eq!(names(&chain), vec![("a", 1), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn test_parse_single_token_fails() {
        let err = parse("a").unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("at least two nodes"));
    }

    #[test]
    fn test_parse_single_segment_fails() {
        assert!(parse("a,b").unwrap_err().is_parse_error());
    }

    #[test]
    fn test_parse_empty_names_fail() {
        for input in ["", "a..b", ".a.b", "a.b.", "a.,b", "3.b", "a.b,"] {
            assert!(parse(input).is_err(), "expected failure for {:?}", input);
        }
    }

    #[test]
    fn test_parse_zero_multiplicity_fails() {
        assert!(parse("0a.b").is_err());
        assert!(parse("a.99999999999b").is_err());
    }

    #[test]
    fn test_chain_display_round_trip() {
        let chain = parse("2a.b,3c").unwrap();
        assert_eq!(chain.to_string(), "2a.b,3c");
        assert_eq!(parse(&chain.to_string()).unwrap(), chain);
    }
}
