//! Operator table
//!
//! Every operator carries a descriptor with its precedence, associativity,
//! arity and class, and a matcher over source text. Exactly one matcher
//! accepts any valid operator string.

use serde::Serialize;
use std::fmt;

/// Operator associativity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Associativity {
    /// Groups left to right
    Left,
    /// Groups right to left
    Right,
}

/// Operand domain of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorClass {
    /// Arithmetic
    Numeric,
    /// Comparison and logic
    Binary,
}

/// Static operator data
#[derive(Debug, Clone, Copy)]
pub struct OperatorDescriptor {
    /// Binding strength, higher binds tighter
    pub precedence: u8,
    /// Associativity
    pub associativity: Associativity,
    /// Number of operands (1 or 2)
    pub arity: u8,
    /// Operand domain
    pub class: OperatorClass,
    /// Accepts the operator's source text
    pub matcher: fn(&str) -> bool,
}

/// Operators of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `mod`
    Modulo,
    /// `^` or `**`
    Exponent,
    /// postfix `!`
    Factorial,
    /// `==`
    Equals,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `and`
    And,
    /// `or`
    Or,
    /// prefix `not`
    Not,
}

const fn descriptor(
    precedence: u8,
    associativity: Associativity,
    arity: u8,
    class: OperatorClass,
    matcher: fn(&str) -> bool,
) -> OperatorDescriptor {
    OperatorDescriptor {
        precedence,
        associativity,
        arity,
        class,
        matcher,
    }
}

use Associativity::{Left, Right};
use OperatorClass::{Binary, Numeric};

static OPERATOR_TABLE: [(Operator, OperatorDescriptor); 13] = [
    (Operator::Add, descriptor(3, Left, 2, Numeric, |s| s == "+")),
    (Operator::Subtract, descriptor(3, Left, 2, Numeric, |s| s == "-")),
    (Operator::Multiply, descriptor(4, Left, 2, Numeric, |s| s == "*")),
    (Operator::Divide, descriptor(4, Left, 2, Numeric, |s| s == "/")),
    (Operator::Modulo, descriptor(4, Left, 2, Numeric, |s| s == "mod")),
    (Operator::Exponent, descriptor(5, Right, 2, Numeric, |s| s == "^" || s == "**")),
    (Operator::Factorial, descriptor(5, Left, 1, Numeric, |s| s == "!")),
    (Operator::Equals, descriptor(2, Left, 2, Binary, |s| s == "==")),
    (Operator::LessThan, descriptor(2, Left, 2, Binary, |s| s == "<")),
    (Operator::GreaterThan, descriptor(2, Left, 2, Binary, |s| s == ">")),
    (Operator::And, descriptor(1, Left, 2, Binary, |s| s == "and")),
    (Operator::Or, descriptor(1, Left, 2, Binary, |s| s == "or")),
    (Operator::Not, descriptor(1, Right, 1, Binary, |s| s == "not")),
];

impl Operator {
    /// Every operator, in table order
    pub fn all() -> impl Iterator<Item = Operator> {
        OPERATOR_TABLE.iter().map(|(op, _)| *op)
    }

    /// Map source text to the operator whose matcher accepts it
    pub fn identify(text: &str) -> Option<Operator> {
        OPERATOR_TABLE
            .iter()
            .find(|(_, desc)| (desc.matcher)(text))
            .map(|(op, _)| *op)
    }

    /// Static descriptor of this operator
    pub fn descriptor(&self) -> &'static OperatorDescriptor {
        // Table order matches declaration order
        &OPERATOR_TABLE[*self as usize].1
    }

    /// Binding strength
    pub fn precedence(&self) -> u8 {
        self.descriptor().precedence
    }

    /// Associativity
    pub fn associativity(&self) -> Associativity {
        self.descriptor().associativity
    }

    /// Operand count
    pub fn arity(&self) -> u8 {
        self.descriptor().arity
    }

    /// Unary operator written before its operand
    pub fn is_prefix(&self) -> bool {
        self.arity() == 1 && self.associativity() == Associativity::Right
    }

    /// Unary operator written after its operand
    pub fn is_postfix(&self) -> bool {
        self.arity() == 1 && self.associativity() == Associativity::Left
    }

    /// Canonical source text
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "mod",
            Operator::Exponent => "^",
            Operator::Factorial => "!",
            Operator::Equals => "==",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: [&str; 14] = [
        "+", "-", "*", "/", "mod", "^", "**", "!", "==", "<", ">", "and", "or", "not",
    ];

    #[test]
    fn test_table_is_mutually_exclusive() {
        for text in VALID {
            let matching = OPERATOR_TABLE
                .iter()
                .filter(|(_, desc)| (desc.matcher)(text))
                .count();
            assert_eq!(matching, 1, "operator text `{}` matched {} descriptors", text, matching);
        }
    }

    #[test]
    fn test_table_order_matches_variants() {
        for (index, (op, _)) in OPERATOR_TABLE.iter().enumerate() {
            assert_eq!(*op as usize, index);
        }
    }

    #[test]
    fn test_identify() {
        assert_eq!(Operator::identify("**"), Some(Operator::Exponent));
        assert_eq!(Operator::identify("^"), Some(Operator::Exponent));
        assert_eq!(Operator::identify("mod"), Some(Operator::Modulo));
        assert_eq!(Operator::identify("="), None);
        assert_eq!(Operator::identify("modulo"), None);
    }

    #[test]
    fn test_unary_forms() {
        assert!(Operator::Not.is_prefix());
        assert!(Operator::Factorial.is_postfix());
        assert!(!Operator::Subtract.is_prefix());
    }

    #[test]
    fn test_descriptor_values() {
        assert_eq!(Operator::Exponent.precedence(), 5);
        assert_eq!(Operator::Exponent.associativity(), Associativity::Right);
        assert_eq!(Operator::And.descriptor().class, OperatorClass::Binary);
        assert_eq!(Operator::Multiply.precedence(), 4);
    }

    #[test]
    fn test_symbols_identify_themselves() {
        for op in Operator::all() {
            assert_eq!(Operator::identify(op.symbol()), Some(op));
        }
    }
}
