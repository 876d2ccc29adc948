mod scope;
mod symbol;

pub use scope::{Scope, ScopeStack};
pub use symbol::{Storage, Symbol, SymbolKind};

use std::ops::{Index, IndexMut};

/// Handle to a symbol in a [`Symbols`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub usize);

/// Every symbol created by name resolution, addressed by [`SymbolId`].
#[derive(Debug, Clone, Default)]
pub struct Symbols(Vec<Symbol>);

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        self.0.push(symbol);
        SymbolId(self.0.len() - 1)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.0.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.0.iter().enumerate().map(|(i, s)| (SymbolId(i), s))
    }
}

impl Index<SymbolId> for Symbols {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.0[id.0]
    }
}

impl IndexMut<SymbolId> for Symbols {
    fn index_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.0[id.0]
    }
}
