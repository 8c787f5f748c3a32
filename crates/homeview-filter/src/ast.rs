//! Abstract Syntax Tree for filter expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Every row (constant true)
    All,

    /// No row (constant false)
    None,

    /// Logical AND of two expressions
    And(Box<FilterExpr>, Box<FilterExpr>),

    /// Logical OR of two expressions
    Or(Box<FilterExpr>, Box<FilterExpr>),

    /// Logical NOT of an expression
    Not(Box<FilterExpr>),

    /// Field value is one of the listed literals
    In { field: String, values: Vec<Literal> },

    /// Field compared against a literal
    Compare {
        field: String,
        op: ComparisonOp,
        value: Literal,
    },
}

impl FilterExpr {
    /// Create an AND expression
    pub fn and(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::And(Box::new(left), Box::new(right))
    }

    /// Create an OR expression
    pub fn or(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Or(Box::new(left), Box::new(right))
    }

    /// Create a NOT expression
    pub fn not(expr: FilterExpr) -> Self {
        FilterExpr::Not(Box::new(expr))
    }

    /// Create a membership test over integer values
    pub fn in_ints(field: &str, values: impl IntoIterator<Item = i64>) -> Self {
        FilterExpr::In {
            field: field.to_string(),
            values: values.into_iter().map(|v| Literal::Number(v as f64)).collect(),
        }
    }

    /// Create a field/value comparison
    pub fn compare(field: &str, op: ComparisonOp, value: impl Into<Literal>) -> Self {
        FilterExpr::Compare {
            field: field.to_string(),
            op,
            value: value.into(),
        }
    }

    /// Check if this is an atomic expression (no operators)
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            FilterExpr::All | FilterExpr::None | FilterExpr::In { .. } | FilterExpr::Compare { .. }
        )
    }

    /// Names of all fields referenced by the expression, in order of appearance
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpr::All | FilterExpr::None => {}
            FilterExpr::And(a, b) | FilterExpr::Or(a, b) => {
                a.collect_fields(out);
                b.collect_fields(out);
            }
            FilterExpr::Not(inner) => inner.collect_fields(out),
            FilterExpr::In { field, .. } | FilterExpr::Compare { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wrap = |f: &mut fmt::Formatter<'_>, e: &FilterExpr| {
            if e.is_atomic() || matches!(e, FilterExpr::Not(_)) {
                write!(f, "{}", e)
            } else {
                write!(f, "({})", e)
            }
        };

        match self {
            FilterExpr::All => f.write_str("all"),
            FilterExpr::None => f.write_str("none"),
            FilterExpr::And(a, b) => {
                wrap(f, a)?;
                f.write_str(" && ")?;
                wrap(f, b)
            }
            FilterExpr::Or(a, b) => {
                wrap(f, a)?;
                f.write_str(" || ")?;
                wrap(f, b)
            }
            FilterExpr::Not(inner) => match inner.as_ref() {
                FilterExpr::All | FilterExpr::None => write!(f, "!{}", inner),
                _ => write!(f, "!({})", inner),
            },
            FilterExpr::In { field, values } => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{} in [{}]", field, items.join(", "))
            }
            FilterExpr::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.as_str(), value)
            }
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
}

impl ComparisonOp {
    /// Evaluate the comparison for two f64 values
    pub fn evaluate(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Eq => (lhs - rhs).abs() < 1e-10,
            ComparisonOp::Ne => (lhs - rhs).abs() >= 1e-10,
        }
    }

    /// Evaluate the comparison for two strings (lexicographic)
    pub fn evaluate_str(&self, lhs: &str, rhs: &str) -> bool {
        match self {
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Eq => lhs == rhs,
            ComparisonOp::Ne => lhs != rhs,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        }
    }
}

/// A literal on the right-hand side of a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Number(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Number(v as f64)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Text(v.to_string())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}
