//! Boolean conditions over a state vector.
//!
//! The grammar is deliberately flat: a conjunction of comparisons,
//!
//! ```text
//! condition  := comparison ( "&&" comparison )*
//! comparison := name ( "==" | "!=" ) ( "true" | "false" )
//! ```
//!
//! There is no `||`, no negation, and no grouping. A name that has no entry
//! in the state vector reads as `false`, so conditions on undeclared
//! variables are accepted rather than rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::SyntaxError;
use crate::state::{parse_bool, StateVector};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Ne => write!(f, "!="),
        }
    }
}

/// One `name op literal` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Variable being tested; unknown names read as false.
    pub name: String,
    /// Equality or inequality.
    pub op: CompareOp,
    /// Literal compared against.
    pub value: bool,
}

impl Comparison {
    pub fn new(name: impl Into<String>, op: CompareOp, value: bool) -> Self {
        Self {
            name: name.into(),
            op,
            value,
        }
    }

    /// Evaluate against `state`.
    pub fn holds(&self, state: &StateVector) -> bool {
        let actual = state.get(&self.name);
        match self.op {
            CompareOp::Eq => actual == self.value,
            CompareOp::Ne => actual != self.value,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.op, self.value)
    }
}

impl FromStr for Comparison {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clause = s.trim();
        let (name, op, literal) = if let Some((l, r)) = clause.split_once("!=") {
            (l, CompareOp::Ne, r)
        } else if let Some((l, r)) = clause.split_once("==") {
            (l, CompareOp::Eq, r)
        } else {
            return Err(SyntaxError::MissingOperator(clause.to_string()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(SyntaxError::EmptyName(clause.to_string()));
        }
        Ok(Self::new(name, op, parse_bool(literal)?))
    }
}

/// A conjunction of comparisons. An empty conjunction always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    /// Comparisons joined by `&&`. Empty means always true.
    pub clauses: Vec<Comparison>,
}

impl Condition {
    /// The condition that always holds.
    pub fn always() -> Self {
        Self::default()
    }

    /// Parse condition text; blank text yields [`Condition::always`].
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        text.parse()
    }

    /// Builder: add `name == value`.
    pub fn is(mut self, name: impl Into<String>, value: bool) -> Self {
        self.clauses.push(Comparison::new(name, CompareOp::Eq, value));
        self
    }

    /// Builder: add `name != value`.
    pub fn is_not(mut self, name: impl Into<String>, value: bool) -> Self {
        self.clauses.push(Comparison::new(name, CompareOp::Ne, value));
        self
    }

    pub fn is_always(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate left to right, stopping at the first failing clause.
    pub fn evaluate(&self, state: &StateVector) -> bool {
        self.clauses.iter().all(|c| c.holds(state))
    }

    /// Names referenced by this condition.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().map(|c| c.name.as_str())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " && ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

impl FromStr for Condition {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::always());
        }
        let mut clauses = Vec::new();
        for part in s.split("&&") {
            if part.trim().is_empty() {
                return Err(SyntaxError::EmptyClause(s.trim().to_string()));
            }
            clauses.push(part.parse()?);
        }
        Ok(Self { clauses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> StateVector {
        StateVector::new()
            .with("has_key", true)
            .with("has_torch", false)
    }

    #[test]
    fn empty_condition_always_holds() {
        let c = Condition::parse("   ").unwrap();
        assert!(c.is_always());
        assert!(c.evaluate(&StateVector::new()));
    }

    #[test]
    fn single_comparisons() {
        let s = state();
        assert!(Condition::parse("has_key == true").unwrap().evaluate(&s));
        assert!(!Condition::parse("has_key == false").unwrap().evaluate(&s));
        assert!(Condition::parse("has_torch != true").unwrap().evaluate(&s));
        assert!(!Condition::parse("has_key != true").unwrap().evaluate(&s));
    }

    #[test]
    fn whitespace_is_insignificant() {
        let c = Condition::parse("has_key==true&&   has_torch  !=true").unwrap();
        assert_eq!(c.clauses.len(), 2);
        assert!(c.evaluate(&state()));
    }

    #[test]
    fn conjunction_requires_every_clause() {
        let c = Condition::parse("has_key == true && has_torch == true").unwrap();
        assert!(!c.evaluate(&state()));
    }

    #[test]
    fn undeclared_name_reads_false() {
        let s = state();
        assert!(Condition::parse("ghost == false").unwrap().evaluate(&s));
        assert!(!Condition::parse("ghost == true").unwrap().evaluate(&s));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let c = Condition::always().is("a", true).is_not("b", false);
        assert_eq!(c.to_string(), "a == true && b != false");
        assert_eq!(Condition::parse(&c.to_string()).unwrap(), c);
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            Condition::parse("has_key"),
            Err(SyntaxError::MissingOperator(_))
        ));
        assert!(matches!(
            Condition::parse("has_key == maybe"),
            Err(SyntaxError::BadLiteral(_))
        ));
        assert!(matches!(
            Condition::parse("== true"),
            Err(SyntaxError::EmptyName(_))
        ));
        assert!(matches!(
            Condition::parse("a == true &&"),
            Err(SyntaxError::EmptyClause(_))
        ));
        assert!(matches!(
            Condition::parse("a == true || b == true"),
            Err(SyntaxError::BadLiteral(_))
        ));
    }
}
