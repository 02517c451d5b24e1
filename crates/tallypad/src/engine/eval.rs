//! Safe evaluation of accumulated formula text.
//!
//! The formula arrives as display text: `×`/`÷` glyphs and whatever
//! consecutive-operator quirks the keypad allowed through. Evaluation
//! normalizes the glyphs, collapses operator runs, then parses with a small
//! recursive-descent grammar over `+ - * /`, unary sign, and finite decimal
//! literals. Nothing is ever executed as code.

use thiserror::Error;
use tracing::debug;

use crate::engine::keys::Op;

/// Errors from formula evaluation.
///
/// These never cross the machine boundary; `Calculator::press_equals`
/// absorbs them into the `"Error"` display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Formula was empty after normalization.
    #[error("empty formula")]
    Empty,
    /// A character outside the keypad alphabet.
    #[error("invalid character '{0}'")]
    InvalidChar(char),
    /// Structurally malformed expression.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Division (or accumulation) produced a non-finite value.
    #[error("non-finite result")]
    NonFinite,
}

/// ASCII operator characters after glyph normalization.
const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Evaluates an accumulated formula and renders the result as the canonical
/// decimal string.
///
/// # Errors
///
/// Returns [`EvalError`] when the formula is empty, contains characters
/// outside the keypad alphabet, is structurally malformed (e.g. a trailing
/// operator), or produces a non-finite value.
pub fn evaluate_formula(expr: &str) -> Result<String, EvalError> {
    let normalized = collapse_operator_runs(&normalize_glyphs(expr));
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Err(EvalError::Empty);
    }

    let tokens = Tokenizer::new(trimmed).tokenize()?;
    if tokens.is_empty() {
        return Err(EvalError::Empty);
    }

    let value = Parser::new(tokens).parse()?;
    let rounded = round_result(value);
    debug!(formula = expr, result = rounded, "formula evaluated");
    Ok(render(rounded))
}

/// Replaces display glyphs with their ASCII operator forms.
fn normalize_glyphs(expr: &str) -> String {
    expr.chars()
        .map(|c| match c {
            '×' => Op::Multiply.ascii(),
            '÷' => Op::Divide.ascii(),
            other => other,
        })
        .collect()
}

/// Collapses each run of two or more consecutive operators to the run's
/// last character.
///
/// A run of exactly two characters containing `-` is kept verbatim so a
/// trailing negative operand survives (`5*-3`). Longer runs always collapse
/// (`5*+-3` becomes `5-3`).
fn collapse_operator_runs(expr: &str) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0;
    while i < chars.len() {
        if !OPERATORS.contains(&chars[i]) {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let mut j = i;
        while j < chars.len() && OPERATORS.contains(&chars[j]) {
            j += 1;
        }
        let run = &chars[i..j];
        if run.len() == 1 || (run.len() == 2 && run.contains(&'-')) {
            out.extend(run);
        } else {
            out.push(run[run.len() - 1]);
        }
        i = j;
    }
    out
}

/// Rounds to 10 decimal places to absorb float representation error.
///
/// Values too large to scale are returned untouched rather than turned
/// into infinity.
fn round_result(value: f64) -> f64 {
    let scaled = value * 1e10;
    if scaled.is_finite() {
        scaled.round() / 1e10
    } else {
        value
    }
}

/// Renders a finite result as its canonical decimal string.
///
/// `f64`'s `Display` already prints the shortest round-trip form with no
/// trailing zeros; only negative zero needs normalizing.
fn render(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Token types from lexical analysis
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    /// Finite decimal literal
    Number(f64),
    /// Binary (or sign) operator
    Op(Op),
}

/// Tokenizer for normalized formula text
#[derive(Debug)]
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, EvalError> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => self.read_number()?,
            '+' => {
                self.advance();
                Token::Op(Op::Add)
            }
            '-' => {
                self.advance();
                Token::Op(Op::Subtract)
            }
            '*' => {
                self.advance();
                Token::Op(Op::Multiply)
            }
            '/' => {
                self.advance();
                Token::Op(Op::Divide)
            }
            other => return Err(EvalError::InvalidChar(other)),
        };

        Ok(Some(token))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, EvalError> {
        let start = self.pos;
        let mut has_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let literal = &self.input[start..self.pos];
        let value: f64 = literal
            .parse()
            .map_err(|_| EvalError::Syntax(format!("invalid number '{literal}'")))?;

        Ok(Token::Number(value))
    }
}

/// Recursive descent evaluator.
///
/// Grammar:
/// ```text
/// expression ::= term (('+' | '-') term)*
/// term       ::= unary (('*' | '/') unary)*
/// unary      ::= ('-' | '+') unary | NUMBER
/// ```
///
/// Values are folded during the descent, so precedence and left
/// associativity fall out of the grammar shape.
#[derive(Debug)]
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(mut self) -> Result<f64, EvalError> {
        let value = self.expression()?;
        if self.pos < self.tokens.len() {
            return Err(EvalError::Syntax(format!(
                "unexpected token at position {}",
                self.pos
            )));
        }
        Ok(value)
    }

    fn current(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.term()?;
        while let Some(Token::Op(op @ (Op::Add | Op::Subtract))) = self.current() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = apply(acc, op, rhs)?;
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.unary()?;
        while let Some(Token::Op(op @ (Op::Multiply | Op::Divide))) = self.current() {
            self.pos += 1;
            let rhs = self.unary()?;
            acc = apply(acc, op, rhs)?;
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.current() {
            Some(Token::Op(Op::Subtract)) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            // Unary plus is accepted and ignored, matching how a bare
            // leading operator behaves on the keypad.
            Some(Token::Op(Op::Add)) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.number(),
        }
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        match self.current() {
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(n)
            }
            Some(token) => Err(EvalError::Syntax(format!(
                "expected a number, found {token:?}"
            ))),
            None => Err(EvalError::Syntax("unexpected end of formula".into())),
        }
    }
}

/// Applies one binary step, rejecting non-finite intermediates.
fn apply(lhs: f64, op: Op, rhs: f64) -> Result<f64, EvalError> {
    let value = match op {
        Op::Add => lhs + rhs,
        Op::Subtract => lhs - rhs,
        Op::Multiply => lhs * rhs,
        Op::Divide => lhs / rhs,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Normalization tests =====

    #[test]
    fn test_normalize_glyphs() {
        assert_eq!(normalize_glyphs("5×3÷2"), "5*3/2");
        assert_eq!(normalize_glyphs("1+2-3"), "1+2-3");
    }

    #[test]
    fn test_normalize_glyphs_matches_op_ascii() {
        for op in [Op::Add, Op::Subtract, Op::Multiply, Op::Divide] {
            assert_eq!(
                normalize_glyphs(&op.glyph().to_string()),
                op.ascii().to_string()
            );
        }
    }

    #[test]
    fn test_collapse_single_operators_untouched() {
        assert_eq!(collapse_operator_runs("5+3"), "5+3");
        assert_eq!(collapse_operator_runs("1*2/3"), "1*2/3");
    }

    #[test]
    fn test_collapse_pair_with_minus_preserved() {
        assert_eq!(collapse_operator_runs("5*-3"), "5*-3");
        assert_eq!(collapse_operator_runs("5+-3"), "5+-3");
        assert_eq!(collapse_operator_runs("5--3"), "5--3");
    }

    #[test]
    fn test_collapse_pair_without_minus() {
        assert_eq!(collapse_operator_runs("5+*3"), "5*3");
        assert_eq!(collapse_operator_runs("5*/3"), "5/3");
    }

    #[test]
    fn test_collapse_long_runs_take_last() {
        assert_eq!(collapse_operator_runs("5*+-3"), "5-3");
        assert_eq!(collapse_operator_runs("5+++3"), "5+3");
        assert_eq!(collapse_operator_runs("5*--3"), "5-3");
    }

    #[test]
    fn test_collapse_leading_and_trailing_runs() {
        assert_eq!(collapse_operator_runs("+-5"), "+-5");
        assert_eq!(collapse_operator_runs("5+-"), "5+-");
        assert_eq!(collapse_operator_runs("*+/5"), "/5");
    }

    // ===== Tokenizer tests =====

    #[test]
    fn test_tokenize_number() {
        let tokens = Tokenizer::new("42").tokenize().unwrap();
        assert_eq!(tokens, vec![Token::Number(42.0)]);
    }

    #[test]
    fn test_tokenize_decimal_number() {
        let tokens = Tokenizer::new("3.14").tokenize().unwrap();
        assert_eq!(tokens, vec![Token::Number(3.14)]);
    }

    #[test]
    fn test_tokenize_leading_dot() {
        let tokens = Tokenizer::new(".5").tokenize().unwrap();
        assert_eq!(tokens, vec![Token::Number(0.5)]);
    }

    #[test]
    fn test_tokenize_expression() {
        let tokens = Tokenizer::new("1+2*3").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(1.0),
                Token::Op(Op::Add),
                Token::Number(2.0),
                Token::Op(Op::Multiply),
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_invalid_char() {
        let result = Tokenizer::new("2=4").tokenize();
        assert_eq!(result, Err(EvalError::InvalidChar('=')));
    }

    #[test]
    fn test_tokenize_second_dot_splits_number() {
        // "1.2.3" reads as 1.2 then .3 with no operator between; the parser
        // rejects the adjacency.
        let tokens = Tokenizer::new("1.2.3").tokenize().unwrap();
        assert_eq!(tokens.len(), 2);
    }

    // ===== Evaluation tests =====

    #[test]
    fn test_evaluate_addition() {
        assert_eq!(evaluate_formula("2+2").unwrap(), "4");
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(evaluate_formula("2+3×4").unwrap(), "14");
        assert_eq!(evaluate_formula("20-6÷2").unwrap(), "17");
    }

    #[test]
    fn test_evaluate_left_associativity() {
        assert_eq!(evaluate_formula("10-3-2").unwrap(), "5");
        assert_eq!(evaluate_formula("100÷10÷2").unwrap(), "5");
    }

    #[test]
    fn test_evaluate_negative_operand() {
        assert_eq!(evaluate_formula("5×-3").unwrap(), "-15");
        assert_eq!(evaluate_formula("5--3").unwrap(), "8");
    }

    #[test]
    fn test_evaluate_collapsed_run() {
        assert_eq!(evaluate_formula("5×+-3").unwrap(), "2");
    }

    #[test]
    fn test_evaluate_repeating_decimal_rounds_to_ten_places() {
        assert_eq!(evaluate_formula("10÷3").unwrap(), "3.3333333333");
        assert_eq!(evaluate_formula("2÷3").unwrap(), "0.6666666667");
    }

    #[test]
    fn test_evaluate_float_representation_error_absorbed() {
        assert_eq!(evaluate_formula("0.1+0.2").unwrap(), "0.3");
    }

    #[test]
    fn test_evaluate_decimal_result() {
        assert_eq!(evaluate_formula("7÷2").unwrap(), "3.5");
    }

    #[test]
    fn test_evaluate_leading_sign() {
        assert_eq!(evaluate_formula("-5+10").unwrap(), "5");
        assert_eq!(evaluate_formula("+3").unwrap(), "3");
    }

    #[test]
    fn test_evaluate_negative_zero_renders_as_zero() {
        assert_eq!(evaluate_formula("0×-1").unwrap(), "0");
    }

    #[test]
    fn test_evaluate_trailing_operator_fails() {
        assert!(matches!(evaluate_formula("5+"), Err(EvalError::Syntax(_))));
    }

    #[test]
    fn test_evaluate_empty_fails() {
        assert_eq!(evaluate_formula(""), Err(EvalError::Empty));
        assert_eq!(evaluate_formula("   "), Err(EvalError::Empty));
    }

    #[test]
    fn test_evaluate_division_by_zero_fails() {
        assert_eq!(evaluate_formula("7÷0"), Err(EvalError::NonFinite));
        assert_eq!(evaluate_formula("0÷0"), Err(EvalError::NonFinite));
    }

    #[test]
    fn test_evaluate_invalid_char_fails() {
        assert_eq!(evaluate_formula("2^3"), Err(EvalError::InvalidChar('^')));
        assert_eq!(
            evaluate_formula("5+3=8"),
            Err(EvalError::InvalidChar('='))
        );
    }

    #[test]
    fn test_evaluate_adjacent_numbers_fail() {
        assert!(matches!(
            evaluate_formula("1.2.3"),
            Err(EvalError::Syntax(_))
        ));
    }

    #[test]
    fn test_evaluate_single_operand() {
        assert_eq!(evaluate_formula("42").unwrap(), "42");
        assert_eq!(evaluate_formula("0.5").unwrap(), "0.5");
        assert_eq!(evaluate_formula(".5").unwrap(), "0.5");
    }

    #[test]
    fn test_evaluate_division_by_nonzero_near_zero() {
        assert_eq!(evaluate_formula("1÷0.5").unwrap(), "2");
    }

    // ===== Rendering tests =====

    #[test]
    fn test_render_integer() {
        assert_eq!(render(42.0), "42");
        assert_eq!(render(-5.0), "-5");
    }

    #[test]
    fn test_render_decimal() {
        assert_eq!(render(3.5), "3.5");
        assert_eq!(render(0.125), "0.125");
    }

    #[test]
    fn test_render_negative_zero() {
        assert_eq!(render(-0.0), "0");
    }

    #[test]
    fn test_round_result_huge_value_not_inflated() {
        let value = 1e300;
        assert!(round_result(value).is_finite());
        assert_eq!(round_result(value), value);
    }

    // ===== Error display tests =====

    #[test]
    fn test_eval_error_display() {
        assert_eq!(EvalError::Empty.to_string(), "empty formula");
        assert_eq!(
            EvalError::InvalidChar('=').to_string(),
            "invalid character '='"
        );
        assert_eq!(EvalError::NonFinite.to_string(), "non-finite result");
        assert!(EvalError::Syntax("x".into()).to_string().contains("syntax"));
    }
}
