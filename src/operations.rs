use std::f64::consts::{E, PI};

/// Something a calculator key can do to the brain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Constant(Constant),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Equals,
    Clear,
    Percent,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Cos,
    Sin,
    Tan,
    Sqrt,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

/// Grouping strength of a binary operator in the running description.
/// Ordered from loosest to tightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Additive,
    Multiplicative,
}

/// Symbols shown on the keypad, in row order.
pub const KEYPAD_SYMBOLS: &[&str] = &[
    "C", "±", "%", "÷", //
    "sin", "cos", "tan", "×", //
    "√", "π", "e", "-", //
    "rand", "mod", "=", "+",
];

impl Operation {
    /// Resolve a key symbol. Unknown symbols give `None`.
    pub fn lookup(symbol: &str) -> Option<Operation> {
        let op = match symbol {
            "π" | "pi" => Operation::Constant(Constant::Pi),
            "e" => Operation::Constant(Constant::E),
            "cos" => Operation::Unary(UnaryOp::Cos),
            "sin" => Operation::Unary(UnaryOp::Sin),
            "tan" => Operation::Unary(UnaryOp::Tan),
            "√" | "sqrt" => Operation::Unary(UnaryOp::Sqrt),
            "±" | "neg" => Operation::Unary(UnaryOp::Negate),
            "+" => Operation::Binary(BinaryOp::Add),
            "-" | "−" => Operation::Binary(BinaryOp::Subtract),
            "×" | "*" => Operation::Binary(BinaryOp::Multiply),
            "÷" | "/" => Operation::Binary(BinaryOp::Divide),
            "mod" | "≡" => Operation::Binary(BinaryOp::Modulo),
            "C" => Operation::Clear,
            "=" => Operation::Equals,
            "%" => Operation::Percent,
            "rand" => Operation::Random,
            _ => return None,
        };
        Some(op)
    }
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => PI,
            Constant::E => E,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
        }
    }
}

impl UnaryOp {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            UnaryOp::Cos => value.cos(),
            UnaryOp::Sin => value.sin(),
            UnaryOp::Tan => value.tan(),
            UnaryOp::Sqrt => value.sqrt(),
            UnaryOp::Negate => -value,
        }
    }

    /// Text written in front of the parenthesised operand, e.g. `√(9)`.
    pub fn prefix(self) -> &'static str {
        match self {
            UnaryOp::Cos => "cos",
            UnaryOp::Sin => "sin",
            UnaryOp::Tan => "tan",
            UnaryOp::Sqrt => "√",
            UnaryOp::Negate => "-",
        }
    }
}

impl BinaryOp {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Subtract => lhs - rhs,
            BinaryOp::Multiply => lhs * rhs,
            BinaryOp::Divide => lhs / rhs,
            // Truncated remainder, NaN for a zero divisor.
            BinaryOp::Modulo => lhs % rhs,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "×",
            BinaryOp::Divide => "÷",
            BinaryOp::Modulo => "mod",
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => Precedence::Additive,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => Precedence::Multiplicative,
        }
    }
}
