use crate::{LabelSelector, LabelSelectorRequirement};
use std::{collections::BTreeMap, str::FromStr};

pub type Map = BTreeMap<String, String>;

pub type Expressions = Vec<Expression>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    key: String,
    operator: Operator,

    /// Values in the order they were written. `Exists` and `DoesNotExist` ignore them.
    values: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid label selector operator: {0:?}")]
pub struct InvalidOperator(pub String);

/// A typed label selector: exact label matches plus set-based expressions.
///
/// Exact matches are held in a sorted map so that iteration order never depends on how the source
/// object was decoded. Expressions keep their source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    match_labels: Map,
    match_expressions: Expressions,
}

// === Selector ===

impl Selector {
    pub fn new(match_labels: Map, match_expressions: Expressions) -> Self {
        Self {
            match_labels,
            match_expressions,
        }
    }

    pub fn from_expressions(exprs: Expressions) -> Self {
        Self::new(Map::new(), exprs)
    }

    pub fn from_map(map: Map) -> Self {
        Self::new(map, Expressions::new())
    }

    pub fn match_labels(&self) -> &Map {
        &self.match_labels
    }

    pub fn match_expressions(&self) -> &[Expression] {
        &self.match_expressions
    }

    /// Returns true if the selector places no constraints on labels.
    pub fn is_empty(&self) -> bool {
        self.match_labels.is_empty() && self.match_expressions.is_empty()
    }
}

impl TryFrom<&LabelSelector> for Selector {
    type Error = InvalidOperator;

    fn try_from(selector: &LabelSelector) -> Result<Self, Self::Error> {
        let match_labels = selector.match_labels.clone().unwrap_or_default();
        let match_expressions = selector
            .match_expressions
            .iter()
            .flatten()
            .map(Expression::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Self::new(match_labels, match_expressions))
    }
}

// === Expression ===

impl Expression {
    pub fn new(
        key: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl TryFrom<&LabelSelectorRequirement> for Expression {
    type Error = InvalidOperator;

    fn try_from(req: &LabelSelectorRequirement) -> Result<Self, Self::Error> {
        Ok(Self {
            key: req.key.clone(),
            operator: req.operator.parse()?,
            values: req.values.clone().unwrap_or_default(),
        })
    }
}

// === Operator ===

impl FromStr for Operator {
    type Err = InvalidOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In" => Ok(Self::In),
            "NotIn" => Ok(Self::NotIn),
            "Exists" => Ok(Self::Exists),
            "DoesNotExist" => Ok(Self::DoesNotExist),
            s => Err(InvalidOperator(s.to_string())),
        }
    }
}
