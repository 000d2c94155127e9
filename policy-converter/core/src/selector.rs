//! An output-only model of the Calico selector language.
//!
//! Selectors are built clause by clause and rendered with `Display`:
//!
//! ```text
//! key == 'value'
//! key in {'a','b'}
//! key not in {'a','b'}
//! has(key)
//! ! has(key)
//! ```
//!
//! Clauses are conjoined with ` && `. An empty selector renders as the empty string, which Calico
//! treats as matching everything.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Clause {
    /// `key == 'value'`
    Equals { key: String, value: String },

    /// `key in {'v1','v2'}`
    In { key: String, values: Vec<String> },

    /// `key not in {'v1','v2'}`
    NotIn { key: String, values: Vec<String> },

    /// `has(key)`
    Has(String),

    /// `! has(key)`
    NotHas(String),
}

/// A conjunction of selector clauses, rendered in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectorExpr(Vec<Clause>);

// === impl Clause ===

impl Clause {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    fn fmt_set(f: &mut fmt::Formatter<'_>, values: &[String]) -> fmt::Result {
        f.write_str("{")?;
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "'{}'", v)?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { key, value } => write!(f, "{} == '{}'", key, value),
            Self::In { key, values } => {
                write!(f, "{} in ", key)?;
                Self::fmt_set(f, values)
            }
            Self::NotIn { key, values } => {
                write!(f, "{} not in ", key)?;
                Self::fmt_set(f, values)
            }
            Self::Has(key) => write!(f, "has({})", key),
            Self::NotHas(key) => write!(f, "! has({})", key),
        }
    }
}

// === impl SelectorExpr ===

impl SelectorExpr {
    pub fn push(&mut self, clause: Clause) {
        self.0.push(clause);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.0
    }
}

impl FromIterator<Clause> for SelectorExpr {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Clause> for SelectorExpr {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl fmt::Display for SelectorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            clause.fmt(f)?;
        }
        Ok(())
    }
}
