//! The expression renderer: one expression node in, one `RenderPair` out.
//!
//! Both strings of a pair are produced by the same structural walk; they
//! differ only in how identifiers resolve (symbolic: verbatim name, numeric:
//! substitution-table lookup). The call vocabulary is closed; anything
//! outside it is a synchronous error.

use indexmap::IndexMap;

use crate::EqTexError;
use crate::config::Config;
use crate::syntax::{BinaryOperator, Expr, UnaryOperator};

/// Per-traversal map from identifier name to its numeric rendering.
pub type SubstTable = IndexMap<String, String>;

/// The two parallel renderings of one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPair {
  pub sym: String,
  pub num: String,
}

impl RenderPair {
  fn uniform(text: impl Into<String>) -> Self {
    let text = text.into();
    RenderPair {
      sym: text.clone(),
      num: text,
    }
  }

  fn map(self, f: impl Fn(&str) -> String) -> Self {
    RenderPair {
      sym: f(&self.sym),
      num: f(&self.num),
    }
  }
}

pub const COLUMN_SEPARATOR: &str = "&";
pub const ROW_SEPARATOR: &str = r"\\";

/// Attribute accesses on this qualifier refer to the enclosing instance and
/// are elided unless `Config::skip_self` is turned off.
pub const SELF_QUALIFIER: &str = "self";

fn bmatrix(body: &str) -> String {
  format!(r"\begin{{bmatrix}}{body}\end{{bmatrix}}")
}

fn fraction(numerator: &str, denominator: &str) -> String {
  format!(r"\frac{{{numerator}}}{{{denominator}}}")
}

fn superscript(base: &str, exponent: &str) -> String {
  format!("{{{base}}}^{{{exponent}}}")
}

fn parenthesized(body: &str) -> String {
  format!(r"\left({body}\right)")
}

fn lookup(table: &SubstTable, name: &str) -> String {
  table
    .get(name)
    .cloned()
    .unwrap_or_else(|| name.to_string())
}

/// Render one expression against the current substitution table.
pub fn render_expr(
  expr: &Expr,
  table: &SubstTable,
  config: &Config,
) -> Result<RenderPair, EqTexError> {
  match expr {
    Expr::Number(text) => Ok(RenderPair::uniform(text.clone())),
    Expr::Identifier(name) => Ok(RenderPair {
      sym: name.clone(),
      num: lookup(table, name),
    }),
    Expr::UnaryOp {
      op: UnaryOperator::Neg,
      operand,
    } => {
      let mut pair = render_expr(operand, table, config)?;
      if matches!(operand.as_ref(), Expr::BinaryOp { .. }) {
        pair = pair.map(parenthesized);
      }
      Ok(pair.map(|body| format!(" - {body}")))
    }
    Expr::BinaryOp { op, left, right } => {
      render_binary(*op, left, right, table, config)
    }
    Expr::Call { callee, args } => {
      render_call(canonical_callee(callee)?, args, table, config)
    }
    Expr::Attribute { base, attr } => {
      render_attribute(base, attr, table, config)
    }
    Expr::List(_) => Err(EqTexError::UnsupportedConstruct(
      "list literal outside a matrix constructor".into(),
    )),
  }
}

/// Resolve the callee of a bare call (`f(…)`) or a qualified call
/// (`module.f(…)`) to one canonical name before vocabulary dispatch.
fn canonical_callee(callee: &Expr) -> Result<&str, EqTexError> {
  match callee {
    Expr::Identifier(name) => Ok(name),
    Expr::Attribute { attr, .. } => Ok(attr),
    _ => Err(EqTexError::UnsupportedConstruct(
      "call target is neither a name nor a qualified name".into(),
    )),
  }
}

fn render_binary(
  op: BinaryOperator,
  left: &Expr,
  right: &Expr,
  table: &SubstTable,
  config: &Config,
) -> Result<RenderPair, EqTexError> {
  let l = wrap_operand(render_expr(left, table, config)?, left, op);
  let r = wrap_operand(render_expr(right, table, config)?, right, op);
  Ok(match op {
    BinaryOperator::Add => pairwise(l, r, |a, b| format!("{a} + {b}")),
    BinaryOperator::Sub => pairwise(l, r, |a, b| format!("{a} - {b}")),
    BinaryOperator::Mul => pairwise(l, r, |a, b| format!(r"{a} \cdot {b}")),
    BinaryOperator::MatMul => pairwise(l, r, |a, b| format!(r"{a} \, {b}")),
    BinaryOperator::Div => pairwise(l, r, |a, b| fraction(a, b)),
    BinaryOperator::Pow => pairwise(l, r, |a, b| superscript(a, b)),
  })
}

/// Parenthesize a side that binds looser than its parent operator. Division
/// is exempt: fraction notation already delimits its operands.
fn wrap_operand(
  pair: RenderPair,
  operand: &Expr,
  parent: BinaryOperator,
) -> RenderPair {
  if let Expr::BinaryOp { op, .. } = operand {
    if op.precedence() < parent.precedence()
      && parent != BinaryOperator::Div
    {
      return pair.map(parenthesized);
    }
  }
  pair
}

fn pairwise(
  l: RenderPair,
  r: RenderPair,
  f: impl Fn(&str, &str) -> String,
) -> RenderPair {
  RenderPair {
    sym: f(&l.sym, &r.sym),
    num: f(&l.num, &r.num),
  }
}

fn render_call(
  name: &str,
  args: &[Expr],
  table: &SubstTable,
  config: &Config,
) -> Result<RenderPair, EqTexError> {
  match name {
    "array" => render_array(args, table, config),
    "ones" => render_fill(args, "1"),
    "zeros" => render_fill(args, "0"),
    "eye" => render_eye(args),
    "transpose" => {
      render_transpose(single_arg(name, args)?, table, config)
    }
    "invert" => render_invert(single_arg(name, args)?, table, config),
    "divide" => match args {
      [a, b] => {
        let a = render_expr(a, table, config)?;
        let b = render_expr(b, table, config)?;
        Ok(pairwise(a, b, |x, y| fraction(x, y)))
      }
      _ => Err(EqTexError::UnsupportedConstruct(
        "divide() takes exactly two arguments".into(),
      )),
    },
    other => Err(EqTexError::UnsupportedCall(other.to_string())),
  }
}

fn single_arg<'a>(
  name: &str,
  args: &'a [Expr],
) -> Result<&'a Expr, EqTexError> {
  match args {
    [arg] => Ok(arg),
    _ => Err(EqTexError::UnsupportedConstruct(format!(
      "{name}() takes exactly one argument"
    ))),
  }
}

/// `array([...])`: a list of lists becomes one matrix row per inner list; a
/// flat list becomes a single-column matrix with one cell per row.
fn render_array(
  args: &[Expr],
  table: &SubstTable,
  config: &Config,
) -> Result<RenderPair, EqTexError> {
  let [Expr::List(items)] = args else {
    return Err(EqTexError::UnsupportedConstruct(
      "array() expects a single list literal".into(),
    ));
  };

  let mut sym_rows = Vec::new();
  let mut num_rows = Vec::new();
  if matches!(items.first(), Some(Expr::List(_))) {
    for row in items {
      let Expr::List(cells) = row else {
        return Err(EqTexError::UnsupportedConstruct(
          "array() rows must all be lists".into(),
        ));
      };
      let rendered = cells
        .iter()
        .map(|cell| render_expr(cell, table, config))
        .collect::<Result<Vec<_>, _>>()?;
      sym_rows.push(
        rendered
          .iter()
          .map(|pair| pair.sym.as_str())
          .collect::<Vec<_>>()
          .join(COLUMN_SEPARATOR),
      );
      num_rows.push(
        rendered
          .iter()
          .map(|pair| pair.num.as_str())
          .collect::<Vec<_>>()
          .join(COLUMN_SEPARATOR),
      );
    }
  } else {
    for cell in items {
      let pair = render_expr(cell, table, config)?;
      sym_rows.push(pair.sym);
      num_rows.push(pair.num);
    }
  }

  Ok(RenderPair {
    sym: bmatrix(&sym_rows.join(ROW_SEPARATOR)),
    num: bmatrix(&num_rows.join(ROW_SEPARATOR)),
  })
}

/// `ones([r, c])` / `zeros([r, c])`: a uniform literal fill, so the symbolic
/// and numeric sides are identical.
fn render_fill(args: &[Expr], cell: &str) -> Result<RenderPair, EqTexError> {
  let [Expr::List(dims)] = args else {
    return Err(EqTexError::UnsupportedConstruct(
      "fill dimensions must be a [rows, cols] list literal".into(),
    ));
  };
  let (rows, cols) = match dims.as_slice() {
    [r, c] => (literal_usize(r)?, literal_usize(c)?),
    _ => {
      return Err(EqTexError::UnsupportedConstruct(
        "fill dimensions must be a [rows, cols] list literal".into(),
      ));
    }
  };
  let row = vec![cell; cols].join(COLUMN_SEPARATOR);
  let body = vec![row; rows].join(ROW_SEPARATOR);
  Ok(RenderPair::uniform(bmatrix(&body)))
}

fn literal_usize(expr: &Expr) -> Result<usize, EqTexError> {
  if let Expr::Number(text) = expr {
    if let Ok(n) = text.parse() {
      return Ok(n);
    }
  }
  Err(EqTexError::UnsupportedConstruct(
    "matrix dimensions must be integer literals".into(),
  ))
}

/// `eye(n)`: compact `I_{n}` symbolically, the expanded n-by-n identity
/// (built by rotating a `1,0,…,0` row) numerically.
fn render_eye(args: &[Expr]) -> Result<RenderPair, EqTexError> {
  let size = literal_usize(single_arg("eye", args)?)?;

  let mut row: Vec<&str> = Vec::with_capacity(size);
  row.push("1");
  row.extend(std::iter::repeat("0").take(size.saturating_sub(1)));

  let mut rows = Vec::with_capacity(size);
  for _ in 0..size {
    rows.push(row.join(COLUMN_SEPARATOR));
    row.rotate_right(1);
  }

  Ok(RenderPair {
    sym: format!("I_{{{size}}}"),
    num: format!("{}_{{{size}}}", bmatrix(&rows.join(ROW_SEPARATOR))),
  })
}

/// `transpose(x)` and the `.T` attribute form. An identifier operand is
/// read directly (symbolic name, numeric table lookup); any other operand
/// renders recursively and, like `invert`, a binary one is parenthesized.
fn render_transpose(
  operand: &Expr,
  table: &SubstTable,
  config: &Config,
) -> Result<RenderPair, EqTexError> {
  let pair = match operand {
    Expr::Identifier(name) => RenderPair {
      sym: name.clone(),
      num: lookup(table, name),
    },
    other => {
      let mut pair = render_expr(other, table, config)?;
      if matches!(other, Expr::BinaryOp { .. }) {
        pair = pair.map(parenthesized);
      }
      pair
    }
  };
  Ok(pair.map(|body| superscript(body, "T")))
}

fn render_invert(
  operand: &Expr,
  table: &SubstTable,
  config: &Config,
) -> Result<RenderPair, EqTexError> {
  let mut pair = render_expr(operand, table, config)?;
  if matches!(operand, Expr::BinaryOp { .. }) {
    pair = pair.map(parenthesized);
  }
  Ok(pair.map(|body| superscript(body, "-1")))
}

fn render_attribute(
  base: &Expr,
  attr: &str,
  table: &SubstTable,
  config: &Config,
) -> Result<RenderPair, EqTexError> {
  if let Expr::Identifier(qualifier) = base {
    if qualifier == SELF_QUALIFIER {
      return Ok(if config.skip_self {
        RenderPair {
          sym: attr.to_string(),
          num: lookup(table, attr),
        }
      } else {
        RenderPair::uniform(format!("{qualifier}.{attr}"))
      });
    }
  }
  if attr == "T" {
    return render_transpose(base, table, config);
  }
  Err(EqTexError::UnknownAttribute(attr.to_string()))
}
