use crate::symbols::SymbolId;
use crate::types::Type;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Index of an expression within one program, assigned after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExprId(pub usize);

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A use or declaration of a name. `sym` is filled in by name resolution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
    #[serde(skip)]
    pub sym: Option<SymbolId>,
}

impl Ident {
    pub fn new(name: &str, line: usize, col: usize) -> Self {
        Self {
            name: name.to_string(),
            pos: Pos::new(line, col),
            sym: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum TypeSpec {
    Int,           // "int"
    Bool,          // "bool"
    Void,          // "void"
    Struct(Ident), // "struct" ident
}

impl TypeSpec {
    pub fn to_type(&self) -> Type {
        match self {
            TypeSpec::Int => Type::Int,
            TypeSpec::Bool => Type::Bool,
            TypeSpec::Void => Type::Void,
            TypeSpec::Struct(id) => Type::StructVar(id.name.clone()),
        }
    }
}

/// The whole translation unit: the top-level declarations in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Vec<Decl>")]
pub struct Program {
    pub decls: Vec<Decl>,
    exprs: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Decl {
    Var(VarDecl),       // type ident ";"
    Func(FnDecl),       // type ident "(" [ formal { "," formal } ] ")" "{" block "}"
    Struct(StructDecl), // "struct" ident "{" { var-decl } "}" ";"
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VarDecl {
    pub ty: TypeSpec,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormalDecl {
    pub ty: TypeSpec,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FnDecl {
    pub ret: TypeSpec,
    pub name: Ident,
    #[serde(default)]
    pub formals: Vec<FormalDecl>,
    #[serde(default)]
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructDecl {
    pub name: Ident,
    #[serde(default)]
    pub fields: Vec<VarDecl>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub decls: Vec<VarDecl>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Stmt {
    Assign(Expr),               // assign-expr ";"
    PostInc(Expr),              // loc "++" ";"
    PostDec(Expr),              // loc "--" ";"
    Read(Expr),                 // "cin" ">>" loc ";"
    Write(Expr),                // "cout" "<<" expr ";"
    If(Expr, Block),            // "if" "(" expr ")" "{" block "}"
    IfElse(Expr, Block, Block), // "if" "(" expr ")" "{" block "}" "else" "{" block "}"
    While(Expr, Block),         // "while" "(" expr ")" "{" block "}"
    Call(Expr),                 // call-expr ";"
    Return(Option<Expr>, Pos),  // "return" [ expr ] ";"
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ExprKind")]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Self {
            id: ExprId::default(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum ExprKind {
    IntLit(i32, Pos),                        // int-lit
    StrLit(String, Pos),                     // string-lit
    True(Pos),                               // "true"
    False(Pos),                              // "false"
    Ident(Ident),                            // ident
    Member(Box<Expr>, Ident),                // loc "." ident
    Assign(Box<Expr>, Box<Expr>),            // loc "=" expr
    Call(Ident, Vec<Expr>),                  // ident "(" [ expr { "," expr } ] ")"
    Unary(UnaryOp, Box<Expr>),               // ( "-" | "!" ) expr
    Binary(BinaryOp, Box<Expr>, Box<Expr>),  // expr binop expr
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum UnaryOp {
    Neg, // "-"
    Not, // "!"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BinaryOp {
    Add, // "+"
    Sub, // "-"
    Mul, // "*"
    Div, // "/"
    And, // "&&"
    Or,  // "||"
    Eq,  // "=="
    Ne,  // "!="
    Lt,  // "<"
    Gt,  // ">"
    Le,  // "<="
    Ge,  // ">="
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        kind.into()
    }

    /// Where diagnostics about this expression are reported.
    pub fn pos(&self) -> Pos {
        match &self.kind {
            ExprKind::IntLit(_, pos)
            | ExprKind::StrLit(_, pos)
            | ExprKind::True(pos)
            | ExprKind::False(pos) => *pos,
            ExprKind::Ident(id) => id.pos,
            ExprKind::Member(_, field) => field.pos,
            ExprKind::Assign(lhs, _) => lhs.pos(),
            ExprKind::Call(callee, _) => callee.pos,
            ExprKind::Unary(_, operand) => operand.pos(),
            ExprKind::Binary(_, lhs, _) => lhs.pos(),
        }
    }
}

impl From<Vec<Decl>> for Program {
    fn from(decls: Vec<Decl>) -> Self {
        Program::new(decls)
    }
}

impl Program {
    /// Build a program and number its expressions in tree order.
    pub fn new(mut decls: Vec<Decl>) -> Self {
        let mut next = 0;
        for decl in &mut decls {
            if let Decl::Func(func) = decl {
                number_block(&mut func.body, &mut next);
            }
        }
        Self { decls, exprs: next }
    }

    pub fn from_yaml(src: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(src)
    }

    /// Number of expressions in the tree. Expression ids are below this.
    pub fn expr_count(&self) -> usize {
        self.exprs
    }
}

fn number_block(block: &mut Block, next: &mut usize) {
    for stmt in &mut block.stmts {
        match stmt {
            Stmt::Assign(e)
            | Stmt::PostInc(e)
            | Stmt::PostDec(e)
            | Stmt::Read(e)
            | Stmt::Write(e)
            | Stmt::Call(e) => number_expr(e, next),
            Stmt::If(cond, body) | Stmt::While(cond, body) => {
                number_expr(cond, next);
                number_block(body, next);
            }
            Stmt::IfElse(cond, then, els) => {
                number_expr(cond, next);
                number_block(then, next);
                number_block(els, next);
            }
            Stmt::Return(Some(e), _) => number_expr(e, next),
            Stmt::Return(None, _) => {}
        }
    }
}

fn number_expr(expr: &mut Expr, next: &mut usize) {
    expr.id = ExprId(*next);
    *next += 1;
    match &mut expr.kind {
        ExprKind::IntLit(..)
        | ExprKind::StrLit(..)
        | ExprKind::True(_)
        | ExprKind::False(_)
        | ExprKind::Ident(_) => {}
        ExprKind::Member(base, _) => number_expr(base, next),
        ExprKind::Unary(_, operand) => number_expr(operand, next),
        ExprKind::Assign(lhs, rhs) | ExprKind::Binary(_, lhs, rhs) => {
            number_expr(lhs, next);
            number_expr(rhs, next);
        }
        ExprKind::Call(_, args) => {
            for arg in args {
                number_expr(arg, next);
            }
        }
    }
}
