use std::fmt;

use crate::error::CalcError;

/// Consumption tax applied by [`Key::TaxIncluded`] and removed by [`Key::TaxExcluded`].
pub const TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(lhs + rhs),
            Operator::Subtract => Ok(lhs - rhs),
            Operator::Multiply => Ok(lhs * rhs),
            Operator::Divide if rhs == 0.0 => Err(CalcError::DivisionByZero),
            Operator::Divide => Ok(lhs / rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        };
        f.write_str(symbol)
    }
}

/// One keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    Operator(Operator),
    Equals,
    /// AC
    Clear,
    /// DEL
    Delete,
    /// +/-
    Negate,
    TaxIncluded,
    TaxExcluded,
}

impl Key {
    /// Keyboard shortcut for a single character.
    pub fn from_char(c: char) -> Option<Key> {
        let key = match c {
            '0'..='9' => Key::Digit(c as u8 - b'0'),
            '.' => Key::Point,
            '+' => Key::Operator(Operator::Add),
            '-' => Key::Operator(Operator::Subtract),
            '*' | '×' => Key::Operator(Operator::Multiply),
            '/' | '÷' => Key::Operator(Operator::Divide),
            '=' => Key::Equals,
            's' | 'S' => Key::Negate,
            _ => return None,
        };
        Some(key)
    }

    /// Button labels and named keys (`AC`, `DEL`, `+/-`, `Enter`, ...).
    pub fn from_label(label: &str) -> Option<Key> {
        let key = match label.to_ascii_lowercase().as_str() {
            "ac" | "escape" | "delete" => Key::Clear,
            "del" | "backspace" => Key::Delete,
            "+/-" | "neg" => Key::Negate,
            "enter" => Key::Equals,
            "x" => Key::Operator(Operator::Multiply),
            "tax-in" | "税込" => Key::TaxIncluded,
            "tax-out" | "税抜" => Key::TaxExcluded,
            _ => {
                let mut chars = label.chars();
                let c = chars.next()?;
                return if chars.next().is_none() {
                    Key::from_char(c)
                } else {
                    None
                };
            }
        };
        Some(key)
    }
}

/// Keypad calculator with left-to-right chained operators.
///
/// `12 + 3 × 4 =` is `(12 + 3) × 4`: pressing an operator while another is
/// pending evaluates the pending one first.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    current: String,
    operator: Option<Operator>,
    previous: Option<String>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self {
            current: "0".to_string(),
            operator: None,
            previous: None,
        }
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Raw input being edited.
    pub fn input(&self) -> &str {
        &self.current
    }

    /// Input with thousands separators, as shown on the display.
    pub fn display(&self) -> String {
        format_with_commas(&self.current)
    }

    /// Pending left operand and operator, e.g. `"12 +"`.
    pub fn history(&self) -> Option<String> {
        match (&self.previous, self.operator) {
            (Some(previous), Some(op)) => Some(format!("{} {op}", format_with_commas(previous))),
            _ => None,
        }
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.operator
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Press one key.
    ///
    /// # Errors
    ///
    /// [`CalcError::DivisionByZero`] when evaluation would divide by zero.
    /// State is left exactly as it was.
    pub fn press(&mut self, key: Key) -> Result<(), CalcError> {
        match key {
            Key::Digit(d) => self.push_char(char::from(b'0' + d.min(9))),
            Key::Point => self.push_char('.'),
            Key::Operator(op) => self.set_operator(op)?,
            Key::Equals => self.evaluate()?,
            Key::Clear => *self = Self::default(),
            Key::Delete => {
                self.current.pop();
                if self.current.is_empty() {
                    self.current.push('0');
                }
            }
            Key::Negate => {
                if self.current != "0" {
                    self.current = number_to_string(-parse_number(&self.current));
                }
            }
            Key::TaxIncluded => {
                self.current = number_to_string(parse_number(&self.current) * (1.0 + TAX_RATE));
            }
            Key::TaxExcluded => {
                self.current = number_to_string(parse_number(&self.current) / (1.0 + TAX_RATE));
            }
        }
        Ok(())
    }

    /// Press every key in order, stopping at the first error.
    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) -> Result<(), CalcError> {
        keys.into_iter().try_for_each(|key| self.press(key))
    }

    fn push_char(&mut self, c: char) {
        if c == '.' {
            if !self.current.contains('.') {
                self.current.push('.');
            }
        } else if self.current == "0" {
            self.current = c.to_string();
        } else {
            self.current.push(c);
        }
    }

    fn set_operator(&mut self, op: Operator) -> Result<(), CalcError> {
        if self.operator.is_some() {
            self.evaluate()?;
        }
        self.previous = Some(std::mem::replace(&mut self.current, "0".to_string()));
        self.operator = Some(op);
        Ok(())
    }

    fn evaluate(&mut self) -> Result<(), CalcError> {
        let (Some(previous), Some(op)) = (&self.previous, self.operator) else {
            return Ok(());
        };
        let result = op.apply(parse_number(previous), parse_number(&self.current))?;
        self.current = number_to_string(result);
        self.previous = None;
        self.operator = None;
        Ok(())
    }
}

/// Incomplete input such as a lone `-` is not a number.
fn parse_number(s: &str) -> f64 {
    s.parse().unwrap_or(f64::NAN)
}

/// Shortest round-trip decimal form, with `-0` shown as `0`.
fn number_to_string(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        value.to_string()
    }
}

/// Insert `,` every three digits of the integer part. Text that is not a
/// plain decimal number is returned unchanged.
pub fn format_with_commas(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return number.to_string();
    }

    let mut out = String::with_capacity(number.len() + int_part.len() / 3);
    out.push_str(sign);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(s: &str) -> Vec<Key> {
        s.chars().filter_map(Key::from_char).collect()
    }

    fn calc(s: &str) -> Calculator {
        let mut calc = Calculator::new();
        calc.press_all(keys(s)).unwrap();
        calc
    }

    #[test]
    fn operators_chain_left_to_right() {
        assert_eq!(calc("12+3*4=").input(), "60");
        assert_eq!(calc("10-4/3=").input(), "2");
    }

    #[test]
    fn pending_operator_shows_in_history() {
        let calc = calc("1234+5");
        assert_eq!(calc.history().as_deref(), Some("1,234 +"));
        assert_eq!(calc.input(), "5");
        assert_eq!(calc.pending_operator(), Some(Operator::Add));
    }

    #[test]
    fn equals_without_operator_is_a_no_op() {
        assert_eq!(calc("42=").input(), "42");
    }

    #[test]
    fn float_results_keep_full_precision() {
        assert_eq!(calc(".1+.2=").input(), "0.30000000000000004");
        assert_eq!(calc("7/2=").input(), "3.5");
    }

    #[test]
    fn leading_zero_is_replaced_and_second_point_ignored() {
        assert_eq!(calc("007").input(), "7");
        assert_eq!(calc("0.5.2").input(), "0.52");
        assert_eq!(calc(".").input(), "0.");
    }

    #[test]
    fn division_by_zero_changes_nothing() {
        let mut calc = calc("10/0");
        let before = calc.clone();
        assert_eq!(calc.press(Key::Equals), Err(CalcError::DivisionByZero));
        assert_eq!(calc, before);
        assert_eq!(calc.press(Key::Operator(Operator::Add)), Err(CalcError::DivisionByZero));
        assert_eq!(calc, before);
        assert_eq!(calc.history().as_deref(), Some("10 ÷"));

        // The user can correct the divisor and carry on.
        calc.press_all(keys("2=")).unwrap();
        assert_eq!(calc.input(), "5");
    }

    #[test]
    fn negate_skips_zero() {
        let mut calc = Calculator::new();
        calc.press(Key::Negate).unwrap();
        assert_eq!(calc.input(), "0");
        calc.press_all(keys("5s")).unwrap();
        assert_eq!(calc.input(), "-5");
        calc.press(Key::Negate).unwrap();
        assert_eq!(calc.input(), "5");
    }

    #[test]
    fn delete_drops_last_char_down_to_zero() {
        let mut calc = calc("123");
        calc.press(Key::Delete).unwrap();
        assert_eq!(calc.input(), "12");
        calc.press(Key::Delete).unwrap();
        calc.press(Key::Delete).unwrap();
        assert_eq!(calc.input(), "0");
        calc.press(Key::Delete).unwrap();
        assert_eq!(calc.input(), "0");
    }

    #[test]
    fn clear_resets_everything() {
        let mut calc = calc("9*8");
        calc.press(Key::Clear).unwrap();
        assert_eq!(calc, Calculator::new());
        assert_eq!(calc.history(), None);
    }

    #[test]
    fn tax_in_and_out_use_ten_percent() {
        let mut calc = calc("1000");
        calc.press(Key::TaxIncluded).unwrap();
        assert_eq!(calc.input(), "1100");

        let mut calc = Calculator::new();
        calc.press_all(keys("2200")).unwrap();
        calc.press(Key::TaxExcluded).unwrap();
        assert_eq!(calc.input(), "1999.9999999999998");
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(calc("1234567.5").display(), "1,234,567.5");
        assert_eq!(format_with_commas("-1234"), "-1,234");
        assert_eq!(format_with_commas("999"), "999");
        assert_eq!(format_with_commas("100000"), "100,000");
        assert_eq!(format_with_commas("0.0001"), "0.0001");
        assert_eq!(format_with_commas("NaN"), "NaN");
    }

    #[test]
    fn key_labels() {
        assert_eq!(Key::from_label("AC"), Some(Key::Clear));
        assert_eq!(Key::from_label("Backspace"), Some(Key::Delete));
        assert_eq!(Key::from_label("+/-"), Some(Key::Negate));
        assert_eq!(Key::from_label("÷"), Some(Key::Operator(Operator::Divide)));
        assert_eq!(Key::from_label("x"), Some(Key::Operator(Operator::Multiply)));
        assert_eq!(Key::from_label("税込"), Some(Key::TaxIncluded));
        assert_eq!(Key::from_label("7"), Some(Key::Digit(7)));
        assert_eq!(Key::from_label("77"), None);
        assert_eq!(Key::from_label("%"), None);
    }
}
