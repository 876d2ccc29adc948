use crate::ast::ExprId;
use thiserror::Error;

/// User-facing semantic faults. The Display text is the message printed
/// to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SemanticError {
    // Name resolution
    #[error("Undeclared identifier")]
    UndeclaredIdentifier,

    #[error("Multiply declared identifier")]
    MultiplyDeclared,

    #[error("Non-function declared void")]
    NonFunctionVoid,

    #[error("Invalid name of struct type")]
    InvalidStructType,

    #[error("Dot-access of non-struct type")]
    DotAccessNonStruct,

    #[error("Invalid struct field name")]
    InvalidFieldName,

    // Assignment
    #[error("Type mismatch")]
    TypeMismatch,

    #[error("Function assignment")]
    FunctionAssignment,

    #[error("Struct name assignment")]
    StructNameAssignment,

    #[error("Struct variable assignment")]
    StructVariableAssignment,

    // Operators
    #[error("Arithmetic operator applied to non-numeric operand")]
    ArithmeticNonNumeric,

    #[error("Relational operator applied to non-numeric operand")]
    RelationalNonNumeric,

    #[error("Logical operator applied to non-bool operand")]
    LogicalNonBool,

    #[error("Equality operator applied to void functions")]
    EqualityVoidFunctions,

    #[error("Equality operator applied to functions")]
    EqualityFunctions,

    #[error("Equality operator applied to struct names")]
    EqualityStructNames,

    #[error("Equality operator applied to struct variables")]
    EqualityStructVariables,

    // Conditions
    #[error("Non-bool expression used as an if condition")]
    NonBoolIfCondition,

    #[error("Non-bool expression used as a while condition")]
    NonBoolWhileCondition,

    // I/O
    #[error("Attempt to read a function")]
    ReadFunction,

    #[error("Attempt to read a struct name")]
    ReadStructName,

    #[error("Attempt to read a struct variable")]
    ReadStructVariable,

    #[error("Attempt to write a function")]
    WriteFunction,

    #[error("Attempt to write a struct name")]
    WriteStructName,

    #[error("Attempt to write a struct variable")]
    WriteStructVariable,

    #[error("Attempt to write void")]
    WriteVoid,

    // Calls
    #[error("Attempt to call a non-function")]
    CallNonFunction,

    #[error("Function call with wrong number of args")]
    WrongArgCount,

    #[error("Type of actual does not match type of formal")]
    ActualFormalMismatch,

    // Returns
    #[error("Return with a value in a void function")]
    ReturnValueInVoid,

    #[error("Bad return value")]
    BadReturnValue,

    #[error("Missing return value")]
    MissingReturnValue,
}

/// Faults in the passes themselves. Never caused by the input program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("Scope stack is empty")]
    EmptyScopeStack,

    #[error("Reference `{0}` was not linked by name resolution")]
    UnlinkedReference(String),

    #[error("Symbol `{name}` is not a {expected}")]
    UnexpectedSymbol { name: String, expected: &'static str },

    #[error("Unexpected node: {0}")]
    UnexpectedNode(&'static str),

    #[error("No type recorded for expression #{0}")]
    MissingType(ExprId),
}

// Driver errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid AST document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal compiler error: {0}")]
    Internal(#[from] InternalError),

    #[error("Rejected with {0} error(s)")]
    Rejected(usize),
}
