//! Filter-expression tokenizer/parser.
//!
//! Grammar (informal):
//!
//! ```text
//! expr     := part+
//! part     := negation* (nested | atom) binop?
//! nested   := '(' expr ')'
//! atom     := unop? (regex | literal | word)
//! negation := '~'
//! binop    := '&' | '|'
//! unop     := '<=' | '>=' | '<' | '>' | '='     (absent = field default)
//! word     := run of alphanumerics plus * / { } + - '
//! literal  := single- or double-quoted string, backslash-escaped
//! regex    := literal prefixed by r
//! ```
//!
//! Parsing produces a [`TokenTree`], the structural, not-yet-compiled
//! form of a filter expression. Trees are small and short-lived; nested
//! parenthesized expressions recurse into sub-trees.

use thiserror::Error;

/// Unary comparison operator prefixed to an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

/// Operator joining a group with the one after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
}

/// The payload of an atom: exactly one of word, quoted literal or
/// quoted regex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomValue {
    Word(String),
    Literal(String),
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupItem {
    Atom {
        op: Option<UnaryOp>,
        value: AtomValue,
    },
    Nested(TokenTree),
}

/// One group of an expression: leading negations, an atom or nested
/// sub-tree, and the operator joining it to the next group (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub negations: u32,
    pub item: GroupItem,
    pub binop: Option<BinaryOp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTree {
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unterminated quote starting at offset {0}")]
    UnterminatedQuote(usize),
    #[error("unbalanced parenthesis at offset {0}")]
    UnbalancedParen(usize),
    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("empty parenthesized group at offset {0}")]
    EmptyGroup(usize),
    #[error("dangling operator at end of input")]
    DanglingOperator,
}

/// Parse a filter string into a token tree. An empty or all-whitespace
/// string parses to an empty tree.
pub fn parse(input: &str) -> Result<TokenTree, SyntaxError> {
    let mut parser = Parser { src: input, pos: 0 };
    parser.parse_expr(false)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '*' | '/' | '{' | '}' | '+' | '-' | '\'')
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_expr(&mut self, nested: bool) -> Result<TokenTree, SyntaxError> {
        let start = self.pos;
        let mut groups = Vec::new();
        loop {
            self.skip_ws();

            let mut negations = 0u32;
            while self.peek() == Some('~') {
                self.bump();
                negations += 1;
                self.skip_ws();
            }

            match self.peek() {
                None => {
                    if negations > 0 {
                        return Err(SyntaxError::DanglingOperator);
                    }
                    if nested {
                        return Err(SyntaxError::UnbalancedParen(start));
                    }
                    break;
                }
                Some(')') => {
                    if negations > 0 {
                        return Err(SyntaxError::DanglingOperator);
                    }
                    if !nested {
                        return Err(SyntaxError::UnbalancedParen(self.pos));
                    }
                    if groups.is_empty() {
                        return Err(SyntaxError::EmptyGroup(self.pos));
                    }
                    self.bump();
                    break;
                }
                Some('(') => {
                    self.bump();
                    let sub = self.parse_expr(true)?;
                    let binop = self.parse_trailing_binop();
                    groups.push(Group {
                        negations,
                        item: GroupItem::Nested(sub),
                        binop,
                    });
                }
                Some(_) => {
                    let op = self.parse_unop();
                    self.skip_ws();
                    let value = self.parse_atom_value()?;
                    let binop = self.parse_trailing_binop();
                    groups.push(Group {
                        negations,
                        item: GroupItem::Atom { op, value },
                        binop,
                    });
                }
            }
        }
        Ok(TokenTree { groups })
    }

    fn parse_unop(&mut self) -> Option<UnaryOp> {
        match self.peek() {
            Some('<') => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    Some(UnaryOp::Lte)
                } else {
                    Some(UnaryOp::Lt)
                }
            }
            Some('>') => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    Some(UnaryOp::Gte)
                } else {
                    Some(UnaryOp::Gt)
                }
            }
            Some('=') => {
                self.bump();
                Some(UnaryOp::Eq)
            }
            _ => None,
        }
    }

    fn parse_atom_value(&mut self) -> Result<AtomValue, SyntaxError> {
        if self.rest().starts_with("r\"") || self.rest().starts_with("r'") {
            self.bump();
            return Ok(AtomValue::Regex(self.parse_quoted()?));
        }
        match self.peek() {
            Some('"') | Some('\'') => Ok(AtomValue::Literal(self.parse_quoted()?)),
            Some(c) if is_word_char(c) => Ok(AtomValue::Word(self.parse_word())),
            Some(c) => Err(SyntaxError::UnexpectedChar(c, self.pos)),
            None => Err(SyntaxError::DanglingOperator),
        }
    }

    fn parse_quoted(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        let quote = self.bump().expect("caller checked the quote");
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(SyntaxError::UnterminatedQuote(start)),
                Some('\\') => match self.bump() {
                    None => return Err(SyntaxError::UnterminatedQuote(start)),
                    Some(escaped) => out.push(escaped),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_word(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !is_word_char(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }

    fn parse_trailing_binop(&mut self) -> Option<BinaryOp> {
        self.skip_ws();
        match self.peek() {
            Some('&') => {
                self.bump();
                Some(BinaryOp::And)
            }
            Some('|') => {
                self.bump();
                Some(BinaryOp::Or)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(op: Option<UnaryOp>, value: AtomValue, binop: Option<BinaryOp>) -> Group {
        Group {
            negations: 0,
            item: GroupItem::Atom { op, value },
            binop,
        }
    }

    fn word(text: &str) -> AtomValue {
        AtomValue::Word(text.to_string())
    }

    #[test]
    fn test_parse_single_word() {
        let tree = parse("Sphinx").unwrap();
        assert_eq!(tree.groups, vec![atom(None, word("Sphinx"), None)]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse("").unwrap().groups, vec![]);
        assert_eq!(parse("   ").unwrap().groups, vec![]);
    }

    #[test]
    fn test_parse_unops() {
        let tree = parse("<=3 >=4 <5 >6 =7 8").unwrap();
        let ops: Vec<Option<UnaryOp>> = tree
            .groups
            .iter()
            .map(|g| match &g.item {
                GroupItem::Atom { op, .. } => *op,
                GroupItem::Nested(_) => panic!("expected atoms"),
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                Some(UnaryOp::Lte),
                Some(UnaryOp::Gte),
                Some(UnaryOp::Lt),
                Some(UnaryOp::Gt),
                Some(UnaryOp::Eq),
                None,
            ]
        );
    }

    #[test]
    fn test_parse_binops_attach_to_preceding_group() {
        let tree = parse("a & b | c").unwrap();
        assert_eq!(
            tree.groups,
            vec![
                atom(None, word("a"), Some(BinaryOp::And)),
                atom(None, word("b"), Some(BinaryOp::Or)),
                atom(None, word("c"), None),
            ]
        );
    }

    #[test]
    fn test_parse_literal_and_regex() {
        let tree = parse(r#""Sphinx of the" r'^Jace' 'single'"#).unwrap();
        assert_eq!(
            tree.groups,
            vec![
                atom(None, AtomValue::Literal("Sphinx of the".to_string()), None),
                atom(None, AtomValue::Regex("^Jace".to_string()), None),
                atom(None, AtomValue::Literal("single".to_string()), None),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_quote() {
        let tree = parse(r#""a \"quoted\" name""#).unwrap();
        assert_eq!(
            tree.groups,
            vec![atom(None, AtomValue::Literal(r#"a "quoted" name"#.to_string()), None)]
        );
    }

    #[test]
    fn test_word_with_symbol_chars() {
        // Mana notation, stat specials and apostrophes all lex as words.
        let tree = parse("XX{2/W}{BP} 1+* Yawgmoth's").unwrap();
        assert_eq!(
            tree.groups,
            vec![
                atom(None, word("XX{2/W}{BP}"), None),
                atom(None, word("1+*"), None),
                atom(None, word("Yawgmoth's"), None),
            ]
        );
    }

    #[test]
    fn test_parse_nested_with_negations() {
        let tree = parse(r#"Sphinx & ~ ~(>=Pro "Sphinx of the")"#).unwrap();
        assert_eq!(tree.groups.len(), 2);

        assert_eq!(
            tree.groups[0],
            atom(None, word("Sphinx"), Some(BinaryOp::And))
        );

        let Group {
            negations,
            item: GroupItem::Nested(sub),
            binop: None,
        } = &tree.groups[1]
        else {
            panic!("expected nested group, got {:?}", tree.groups[1]);
        };
        assert_eq!(*negations, 2);
        assert_eq!(
            sub.groups,
            vec![
                atom(Some(UnaryOp::Gte), word("Pro"), None),
                atom(None, AtomValue::Literal("Sphinx of the".to_string()), None),
            ]
        );
    }

    #[test]
    fn test_parse_deeply_nested() {
        let tree = parse("(a | (b & c)) & d").unwrap();
        assert_eq!(tree.groups.len(), 2);
        let GroupItem::Nested(outer) = &tree.groups[0].item else {
            panic!("expected nested group");
        };
        assert_eq!(outer.groups.len(), 2);
        assert!(matches!(outer.groups[1].item, GroupItem::Nested(_)));
    }

    #[test]
    fn test_syntax_error_unbalanced_paren() {
        assert!(matches!(
            parse("(a & b"),
            Err(SyntaxError::UnbalancedParen(_))
        ));
        assert!(matches!(
            parse("a) & b"),
            Err(SyntaxError::UnbalancedParen(_))
        ));
    }

    #[test]
    fn test_syntax_error_unterminated_quote() {
        assert!(matches!(
            parse(r#"name "unterminated"#),
            Err(SyntaxError::UnterminatedQuote(_))
        ));
        assert!(matches!(
            parse(r"r'half"),
            Err(SyntaxError::UnterminatedQuote(_))
        ));
    }

    #[test]
    fn test_syntax_error_invalid_character() {
        assert!(matches!(
            parse("a & & b"),
            Err(SyntaxError::UnexpectedChar('&', _))
        ));
        assert!(matches!(
            parse("!bad"),
            Err(SyntaxError::UnexpectedChar('!', _))
        ));
    }

    #[test]
    fn test_syntax_error_dangling_negation() {
        assert!(matches!(parse("a & ~"), Err(SyntaxError::DanglingOperator)));
        assert!(matches!(parse(">="), Err(SyntaxError::DanglingOperator)));
    }

    #[test]
    fn test_syntax_error_empty_group() {
        assert!(matches!(parse("()"), Err(SyntaxError::EmptyGroup(_))));
    }

    #[test]
    fn test_trailing_binop_tolerated() {
        // The permissive grammar allows a trailing operator with
        // nothing to bind to; the compiler ignores it.
        let tree = parse("a &").unwrap();
        assert_eq!(tree.groups, vec![atom(None, word("a"), Some(BinaryOp::And))]);
    }
}
