use super::SymbolId;
use crate::error::InternalError;
use indexmap::IndexMap;

/// One lexical namespace level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope(IndexMap<String, SymbolId>);

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the previous binding if `name` was already declared here.
    pub fn insert(&mut self, name: &str, id: SymbolId) -> Option<SymbolId> {
        self.0.insert(name.to_string(), id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.0.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Scopes ordered innermost last.
#[derive(Debug, Default)]
pub struct ScopeStack(Vec<Scope>);

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.0.push(Scope::new());
    }

    pub fn pop(&mut self) -> Result<Scope, InternalError> {
        self.0.pop().ok_or(InternalError::EmptyScopeStack)
    }

    /// Bind `name` in the innermost scope.
    pub fn declare(&mut self, name: &str, id: SymbolId) -> Result<(), InternalError> {
        let top = self.0.last_mut().ok_or(InternalError::EmptyScopeStack)?;
        top.insert(name, id);
        Ok(())
    }

    /// Innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<SymbolId> {
        self.0.last().and_then(|scope| scope.get(name))
    }

    /// Innermost to outermost, first hit wins.
    pub fn lookup_global(&self, name: &str) -> Option<SymbolId> {
        self.0.iter().rev().find_map(|scope| scope.get(name))
    }
}
