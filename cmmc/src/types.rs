use std::fmt;

/// Semantic type of an expression or symbol.
///
/// Every function type compares equal to every other function type, and
/// likewise for struct definitions. Struct variables are equal when they
/// name the same struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Bool,
    Void,
    String,
    Func,
    StructVar(String),
    StructDef,
    Error,
}

impl Type {
    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::String)
    }

    pub fn is_func(&self) -> bool {
        matches!(self, Type::Func)
    }

    pub fn is_struct_var(&self) -> bool {
        matches!(self, Type::StructVar(_))
    }

    pub fn is_struct_def(&self) -> bool {
        matches!(self, Type::StructDef)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::String => write!(f, "String"),
            Type::Func => write!(f, "function"),
            Type::StructVar(name) => write!(f, "{name}"),
            Type::StructDef => write!(f, "struct"),
            Type::Error => write!(f, "error"),
        }
    }
}
