//! The configuration formula mini-language.
//!
//! Infix expressions over numbers and named skill references, e.g.
//! `value(MaxHp) / 2 + 100` or `value(Depth) >= 20 && value(ResPois)`.
//! Comparisons and boolean operators evaluate to 0/1. The parser produces a
//! tagged expression tree; evaluation happens separately against a skill
//! table so both halves are testable without file I/O.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snapshot::skills::{Skill, SkillTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("unexpected character '{0}' in formula")]
    BadChar(char),
    #[error("unknown skill reference '{0}'")]
    UnknownSkill(String),
    #[error("unbalanced parentheses")]
    Parens,
    #[error("malformed expression near token {0}")]
    Malformed(usize),
    #[error("empty formula")]
    Empty,
}

/// Binary operators in precedence groups (low to high: or, and, comparison,
/// additive, multiplicative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 0,
            BinOp::And => 1,
            BinOp::Eq | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 2,
            BinOp::Add | BinOp::Sub => 3,
            BinOp::Mul | BinOp::Div => 4,
        }
    }
}

/// A parsed expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number(i64),
    /// `value(SkillName)` reference, resolved at evaluation time.
    Var(Skill),
    Not(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate against a skill table. Total: division by zero yields 0,
    /// matching the original engine's tolerate-and-continue behavior.
    pub fn eval(&self, skills: &SkillTable) -> i64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Var(skill) => skills.get(*skill) as i64,
            Expr::Not(inner) => (inner.eval(skills) == 0) as i64,
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval(skills);
                let r = rhs.eval(skills);
                match op {
                    BinOp::Or => (l != 0 || r != 0) as i64,
                    BinOp::And => (l != 0 && r != 0) as i64,
                    BinOp::Eq => (l == r) as i64,
                    BinOp::Lt => (l < r) as i64,
                    BinOp::Gt => (l > r) as i64,
                    BinOp::Le => (l <= r) as i64,
                    BinOp::Ge => (l >= r) as i64,
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => {
                        if r == 0 {
                            0
                        } else {
                            l / r
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(i64),
    Var(Skill),
    Op(BinOp),
    Not,
    Open,
    Close,
}

fn lookup_skill(name: &str) -> Result<Skill, FormulaError> {
    use strum::IntoEnumIterator;
    Skill::iter()
        .find(|s| s.to_string().eq_ignore_ascii_case(name))
        .ok_or_else(|| FormulaError::UnknownSkill(name.to_string()))
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' => i += 1,
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            '+' => {
                tokens.push(Token::Op(BinOp::Add));
                i += 1;
            }
            '*' => {
                tokens.push(Token::Op(BinOp::Mul));
                i += 1;
            }
            '/' => {
                tokens.push(Token::Op(BinOp::Div));
                i += 1;
            }
            '=' => {
                tokens.push(Token::Op(BinOp::Eq));
                i += 1;
                if i < bytes.len() && bytes[i] == b'=' {
                    i += 1;
                }
            }
            '<' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(Token::Op(BinOp::Le));
                    i += 2;
                } else {
                    tokens.push(Token::Op(BinOp::Lt));
                    i += 1;
                }
            }
            '>' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(Token::Op(BinOp::Ge));
                    i += 2;
                } else {
                    tokens.push(Token::Op(BinOp::Gt));
                    i += 1;
                }
            }
            '&' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'&' {
                    tokens.push(Token::Op(BinOp::And));
                    i += 2;
                } else {
                    return Err(FormulaError::BadChar('&'));
                }
            }
            '|' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'|' {
                    tokens.push(Token::Op(BinOp::Or));
                    i += 2;
                } else {
                    return Err(FormulaError::BadChar('|'));
                }
            }
            '!' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '-' => {
                // A minus directly before a digit is a negative literal,
                // otherwise subtraction.
                if i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
                    let (n, len) = read_number(&input[i + 1..]);
                    tokens.push(Token::Number(-n));
                    i += 1 + len;
                } else {
                    tokens.push(Token::Op(BinOp::Sub));
                    i += 1;
                }
            }
            '0'..='9' => {
                let (n, len) = read_number(&input[i..]);
                tokens.push(Token::Number(n));
                i += len;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < bytes.len()
                    && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                let word = &input[start..i];
                match word.to_ascii_lowercase().as_str() {
                    "and" => tokens.push(Token::Op(BinOp::And)),
                    "or" => tokens.push(Token::Op(BinOp::Or)),
                    "value" => {
                        // value(Name)
                        if i < bytes.len() && bytes[i] == b'(' {
                            let close = input[i..]
                                .find(')')
                                .ok_or(FormulaError::Parens)?;
                            let name = input[i + 1..i + close].trim();
                            tokens.push(Token::Var(lookup_skill(name)?));
                            i += close + 1;
                        } else {
                            return Err(FormulaError::Malformed(tokens.len()));
                        }
                    }
                    _ => tokens.push(Token::Var(lookup_skill(word)?)),
                }
            }
            other => return Err(FormulaError::BadChar(other)),
        }
    }
    Ok(tokens)
}

fn read_number(s: &str) -> (i64, usize) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    (s[..len].parse().unwrap_or(0), len)
}

/// Precedence-climbing parser over the token stream.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, FormulaError> {
        let mut lhs = self.parse_atom()?;
        while let Some(Token::Op(op)) = self.peek().cloned() {
            if op.precedence() < min_prec {
                break;
            }
            self.next();
            let rhs = self.parse_expr(op.precedence() + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_atom(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Var(skill)) => Ok(Expr::Var(skill)),
            Some(Token::Not) => Ok(Expr::Not(Box::new(self.parse_atom()?))),
            Some(Token::Open) => {
                let inner = self.parse_expr(0)?;
                match self.next() {
                    Some(Token::Close) => Ok(inner),
                    _ => Err(FormulaError::Parens),
                }
            }
            _ => Err(FormulaError::Malformed(self.pos)),
        }
    }
}

impl FromStr for Expr {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_expr(0)?;
        if parser.pos != parser.tokens.len() {
            return Err(FormulaError::Malformed(parser.pos));
        }
        Ok(expr)
    }
}
