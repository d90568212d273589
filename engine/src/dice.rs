//! Damage dice expressions (`2d6 + 4`) and their level-based rescaling.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::Dice;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub count: u32,
    pub sides: u32,
    pub constant: i32,
}

impl DiceExpression {
    pub fn new(count: u32, sides: u32, constant: i32) -> Self {
        Self {
            count,
            sides,
            constant,
        }
    }

    /// Parse a whole string such as `2d6+4` or `1d8 - 1`.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let trimmed = text.trim();
        match find_expression(trimmed) {
            Some((span, expr)) if span == (0..trimmed.len()) => Ok(expr),
            _ => Err(EngineError::InvalidDiceExpression(text.to_string())),
        }
    }

    /// Rescale for a level delta: the constant moves by half the delta and
    /// every full ten levels add or remove a die (never below one).
    pub fn adjust(self, delta: i32) -> Self {
        let count = (self.count as i32 + delta / 10).max(1) as u32;
        Self {
            count,
            sides: self.sides,
            constant: self.constant + delta / 2,
        }
    }

    pub fn roll(&self, dice: &mut Dice) -> i32 {
        dice.roll(self.count, self.sides) + self.constant
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.constant {
            0 => Ok(()),
            c if c > 0 => write!(f, " + {c}"),
            c => write!(f, " - {}", -c),
        }
    }
}

/// Replace the first dice expression inside `text` with its adjusted form.
/// Text without a recognisable expression comes back unchanged.
pub fn adjust_embedded(text: &str, delta: i32) -> String {
    if delta == 0 {
        return text.to_string();
    }
    match find_expression(text) {
        Some((span, expr)) => {
            let mut out = String::with_capacity(text.len() + 4);
            out.push_str(&text[..span.start]);
            out.push_str(&expr.adjust(delta).to_string());
            out.push_str(&text[span.end..]);
            out
        }
        None => text.to_string(),
    }
}

fn digits(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn skip_spaces(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() && bytes[end] == b' ' {
        end += 1;
    }
    end
}

/// Locate the first `NdS[ +/- C]` in `text`.
fn find_expression(text: &str) -> Option<(Range<usize>, DiceExpression)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let at_word_start = i == 0 || !bytes[i - 1].is_ascii_alphanumeric();
        if !(bytes[i].is_ascii_digit() && at_word_start) {
            i += 1;
            continue;
        }
        let count_end = digits(bytes, i);
        let is_d = matches!(bytes.get(count_end), Some(b'd') | Some(b'D'));
        let sides_end = if is_d { digits(bytes, count_end + 1) } else { count_end };
        if !is_d || sides_end == count_end + 1 {
            i = count_end.max(i + 1);
            continue;
        }
        let (Ok(count), Ok(sides)) = (
            text[i..count_end].parse::<u32>(),
            text[count_end + 1..sides_end].parse::<u32>(),
        ) else {
            i = sides_end;
            continue;
        };

        let mut end = sides_end;
        let mut constant = 0;
        let sign_at = skip_spaces(bytes, sides_end);
        if let Some(sign) = bytes.get(sign_at).filter(|b| **b == b'+' || **b == b'-') {
            let num_start = skip_spaces(bytes, sign_at + 1);
            let num_end = digits(bytes, num_start);
            if num_end > num_start {
                if let Ok(n) = text[num_start..num_end].parse::<i32>() {
                    constant = if *sign == b'-' { -n } else { n };
                    end = num_end;
                }
            }
        }
        return Some((i..end, DiceExpression::new(count, sides, constant)));
    }
    None
}
