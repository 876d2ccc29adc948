use super::{Scope, SymbolId};
use crate::types::Type;
use itertools::Itertools;
use std::fmt;

/// Where a symbol's value lives at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// Byte offset from `$fp`.
    Frame(i32),
    /// Statically allocated under this label.
    Global(String),
    /// Struct type definitions and fields of a struct definition.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Var,
    Func {
        ret: Type,
        params: Vec<Type>,
        formal_words: usize,
        local_words: usize,
    },
    StructVar {
        def: SymbolId,
    },
    StructDef {
        fields: Scope,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub storage: Storage,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn var(name: &str, ty: Type, storage: Storage) -> Self {
        Self {
            name: name.to_string(),
            ty,
            storage,
            kind: SymbolKind::Var,
        }
    }

    pub fn struct_var(name: &str, struct_name: &str, def: SymbolId, storage: Storage) -> Self {
        Self {
            name: name.to_string(),
            ty: Type::StructVar(struct_name.to_string()),
            storage,
            kind: SymbolKind::StructVar { def },
        }
    }

    pub fn func(name: &str, ret: Type, label: String) -> Self {
        Self {
            name: name.to_string(),
            ty: Type::Func,
            storage: Storage::Global(label),
            kind: SymbolKind::Func {
                ret,
                params: vec![],
                formal_words: 0,
                local_words: 0,
            },
        }
    }

    pub fn struct_def(name: &str, fields: Scope) -> Self {
        Self {
            name: name.to_string(),
            ty: Type::StructDef,
            storage: Storage::None,
            kind: SymbolKind::StructDef { fields },
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self.storage, Storage::Global(_))
    }

    pub fn offset(&self) -> Option<i32> {
        match self.storage {
            Storage::Frame(offset) => Some(offset),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match &self.storage {
            Storage::Global(label) => Some(label),
            _ => None,
        }
    }

    pub fn is_struct_def(&self) -> bool {
        matches!(self.kind, SymbolKind::StructDef { .. })
    }
}

/// `param,param->ret` for functions, the type name otherwise.
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SymbolKind::Func { ret, params, .. } => {
                write!(f, "{}->{}", params.iter().join(","), ret)
            }
            _ => write!(f, "{}", self.ty),
        }
    }
}
