use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use num_rational::BigRational;

use crate::expression::{Binding, Constant};

/// Satisfying assignment of rational values to symbol names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    values: BTreeMap<String, BigRational>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: BigRational) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&BigRational> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, BigRational> {
        self.values.iter()
    }

    /// Binding every modelled symbol to its value as a constant
    pub fn to_binding(&self) -> Binding {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), Constant::new(value.clone())))
            .collect()
    }
}

impl FromIterator<(String, BigRational)> for Model {
    fn from_iter<I: IntoIterator<Item = (String, BigRational)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", name, value)?;
        }
        write!(f, "]")
    }
}
