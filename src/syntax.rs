//! AST for the Python-like source subset eqtex consumes.
//!
//! The tree is built by `parser` from logical source lines and walked by
//! `renderer`; nodes own their children and are never mutated after
//! construction.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Add,
  Sub,
  Mul,
  MatMul,
  Div,
  Pow,
}

impl BinaryOperator {
  /// Binding strength; a higher value binds tighter.
  pub fn precedence(self) -> u8 {
    match self {
      BinaryOperator::Pow => 2,
      BinaryOperator::MatMul | BinaryOperator::Mul | BinaryOperator::Div => 1,
      BinaryOperator::Add | BinaryOperator::Sub => 0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Neg,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  /// Numeric literal, kept as its verbatim decimal text.
  Number(String),
  Identifier(String),
  UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
  },
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
  },
  Call {
    callee: Box<Expr>,
    args: Vec<Expr>,
  },
  Attribute {
    base: Box<Expr>,
    attr: String,
  },
  /// Bracketed list literal; only valid as a matrix constructor argument,
  /// as fill dimensions, or as an unpacking right-hand side.
  List(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
  Assign { targets: Vec<Expr>, value: Expr },
  Return(Option<Expr>),
  Pass,
  Expr(Expr),
  FunctionDef(FunctionDef),
  ClassDef(ClassDef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
  pub name: String,
  pub params: Vec<String>,
  pub decorators: Vec<Tag>,
  pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
  pub name: String,
  pub body: Vec<Stmt>,
}

/// A decorator attached to a function definition, e.g.
/// `@eqtex(num_equation=False)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
  pub name: String,
  pub overrides: Vec<(String, bool)>,
}
