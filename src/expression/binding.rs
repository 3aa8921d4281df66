use std::collections::HashMap;
use std::collections::hash_map;

use crate::expression::ast::Expression;

/// Substitution of symbol names by replacement expressions, used for evaluation.
///
/// Keys are symbol names: every `Symbol` named `x` resolves through the same
/// entry. Replacements may themselves mention other symbols of the binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    entries: HashMap<String, Expression>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the replacement it previously had
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Expression>,
    ) -> Option<Expression> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Expression>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.entries.get(name)
    }

    pub(crate) fn get_key_value(&self, name: &str) -> Option<(&String, &Expression)> {
        self.entries.get_key_value(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Expression> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Expression> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Expression>> FromIterator<(K, V)> for Binding {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Expression>> Extend<(K, V)> for Binding {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
    }
}
