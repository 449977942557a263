//! Reaction rule tokenizer and parser.
//!
//! Grammar:
//! ```text
//! rule     := side "=>" side
//! side     := ( term ( "&" term )* )?
//! term     := "!"? IDENT
//! IDENT    := [A-Za-z0-9_]+
//! ```
//! Whitespace between tokens is ignored. Negation is only meaningful on the
//! reactant side.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleToken {
    Ident(String),
    Not,
    And,
    Arrow,
}

/// Why a rule string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule is empty")]
    Empty,
    #[error("missing reaction arrow '=>'")]
    MissingArrow,
    #[error("more than one reaction arrow")]
    MultipleArrows,
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("expected a species {0}")]
    ExpectedSpecies(&'static str),
    #[error("expected '&' or '=>' before species '{0}'")]
    MissingOperator(String),
    #[error("product '{0}' cannot be negated")]
    NegatedProduct(String),
}

/// A species reference inside a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTerm {
    pub species: String,
    pub negated: bool,
}

/// A rule split at its arrow, terms in textual order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRule {
    pub reactants: Vec<RuleTerm>,
    pub products: Vec<RuleTerm>,
}

impl ParsedRule {
    /// Every term, reactants first, in the order they appear in the text
    pub fn terms(&self) -> impl Iterator<Item = &RuleTerm> {
        self.reactants.iter().chain(self.products.iter())
    }
}

/// Split a rule string into tokens
pub fn tokenize(rule: &str) -> Result<Vec<RuleToken>, RuleError> {
    let bytes = rule.as_bytes();
    let mut idx = 0usize;
    let mut tokens = Vec::new();

    while idx < bytes.len() {
        let b = bytes[idx];
        if b.is_ascii_whitespace() {
            idx += 1;
            continue;
        }
        match b {
            b'!' => {
                tokens.push(RuleToken::Not);
                idx += 1;
            }
            b'&' => {
                tokens.push(RuleToken::And);
                idx += 1;
            }
            b'=' if bytes.get(idx + 1) == Some(&b'>') => {
                tokens.push(RuleToken::Arrow);
                idx += 2;
            }
            _ if b.is_ascii_alphanumeric() || b == b'_' => {
                let start = idx;
                while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_')
                {
                    idx += 1;
                }
                tokens.push(RuleToken::Ident(rule[start..idx].to_string()));
            }
            _ => {
                // Report the full character, not the byte
                let ch = rule[idx..].chars().next().unwrap_or('?');
                return Err(RuleError::UnexpectedChar { ch, pos: idx });
            }
        }
    }

    Ok(tokens)
}

/// Parse a rule string into reactant and product terms
pub fn parse_rule(rule: &str) -> Result<ParsedRule, RuleError> {
    let tokens = tokenize(rule)?;
    if tokens.is_empty() {
        return Err(RuleError::Empty);
    }

    let arrows = tokens.iter().filter(|t| **t == RuleToken::Arrow).count();
    match arrows {
        0 => return Err(RuleError::MissingArrow),
        1 => {}
        _ => return Err(RuleError::MultipleArrows),
    }

    let split = tokens
        .iter()
        .position(|t| *t == RuleToken::Arrow)
        .ok_or(RuleError::MissingArrow)?;

    let reactants = parse_side(&tokens[..split], "at start of rule")?;
    let products = parse_side(&tokens[split + 1..], "after '=>'")?;

    if let Some(term) = products.iter().find(|t| t.negated) {
        return Err(RuleError::NegatedProduct(term.species.clone()));
    }

    Ok(ParsedRule {
        reactants,
        products,
    })
}

/// Parse one side of the arrow: `!`? IDENT separated by `&`
fn parse_side(tokens: &[RuleToken], leading: &'static str) -> Result<Vec<RuleTerm>, RuleError> {
    let mut terms = Vec::new();
    let mut idx = 0usize;

    while idx < tokens.len() {
        if !terms.is_empty() {
            match &tokens[idx] {
                RuleToken::And => idx += 1,
                RuleToken::Ident(name) => return Err(RuleError::MissingOperator(name.clone())),
                _ => {
                    // only `!` can follow a term here
                    let next = match tokens.get(idx + 1) {
                        Some(RuleToken::Ident(name)) => format!("!{}", name),
                        _ => "!".to_string(),
                    };
                    return Err(RuleError::MissingOperator(next));
                }
            }
        }

        let negated = matches!(tokens.get(idx), Some(RuleToken::Not));
        if negated {
            idx += 1;
        }

        match tokens.get(idx) {
            Some(RuleToken::Ident(name)) => {
                terms.push(RuleTerm {
                    species: name.clone(),
                    negated,
                });
                idx += 1;
            }
            _ => {
                let context = if negated {
                    "after '!'"
                } else if terms.is_empty() {
                    leading
                } else {
                    "after '&'"
                };
                return Err(RuleError::ExpectedSpecies(context));
            }
        }
    }

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(species: &str, negated: bool) -> RuleTerm {
        RuleTerm {
            species: species.to_string(),
            negated,
        }
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("A & !B2 => C_x").unwrap();
        assert_eq!(
            tokens,
            vec![
                RuleToken::Ident("A".into()),
                RuleToken::And,
                RuleToken::Not,
                RuleToken::Ident("B2".into()),
                RuleToken::Arrow,
                RuleToken::Ident("C_x".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_without_spaces() {
        let tokens = tokenize("A&!B=>C").unwrap();
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_parse_and_rule() {
        let rule = parse_rule("A & !B => C").unwrap();
        assert_eq!(rule.reactants, vec![term("A", false), term("B", true)]);
        assert_eq!(rule.products, vec![term("C", false)]);
    }

    #[test]
    fn test_parse_input_rule() {
        let rule = parse_rule("=> A").unwrap();
        assert!(rule.reactants.is_empty());
        assert_eq!(rule.products, vec![term("A", false)]);
    }

    #[test]
    fn test_identifier_is_whole_token() {
        let rule = parse_rule("AB => B").unwrap();
        assert_eq!(rule.reactants, vec![term("AB", false)]);
    }

    #[test]
    fn test_malformed_rules() {
        assert_eq!(parse_rule("A B"), Err(RuleError::MissingArrow));
        assert_eq!(parse_rule(""), Err(RuleError::Empty));
        assert_eq!(parse_rule("A => B => C"), Err(RuleError::MultipleArrows));
        assert_eq!(
            parse_rule("A + B => C"),
            Err(RuleError::UnexpectedChar { ch: '+', pos: 2 })
        );
        assert_eq!(
            parse_rule("A & => C"),
            Err(RuleError::ExpectedSpecies("after '&'"))
        );
        assert_eq!(
            parse_rule("A B => C"),
            Err(RuleError::MissingOperator("B".into()))
        );
        assert_eq!(
            parse_rule("A !B => C"),
            Err(RuleError::MissingOperator("!B".into()))
        );
        assert_eq!(
            parse_rule("A => !C"),
            Err(RuleError::NegatedProduct("C".into()))
        );
        assert_eq!(parse_rule("! => C"), Err(RuleError::ExpectedSpecies("after '!'")));
        assert_eq!(
            parse_rule("& A => C"),
            Err(RuleError::ExpectedSpecies("at start of rule"))
        );
    }
}
