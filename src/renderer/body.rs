//! The statement sequencer: walks a function body in order and accumulates
//! the symbolic and numeric equation lines.
//!
//! Traversal is strictly sequential: the numeric side of a later statement
//! depends on the exact numeric strings of every earlier assignment.

use crate::EqTexError;
use crate::config::Config;
use crate::syntax::{Expr, FunctionDef, Stmt};

use super::equation::{SubstTable, render_expr};

/// Decomposing a list-valued right-hand side requires at least this many
/// assignment targets; everything else broadcasts the whole value.
pub const MIN_UNPACK_TARGETS: usize = 2;

/// The ordered equation lines of one rendered body, one entry per
/// assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquationSet {
  pub sym: Vec<String>,
  pub num: Vec<String>,
}

/// Render every assignment of one function body. The substitution table is
/// created empty here and never outlives the traversal.
pub fn render_function(
  def: &FunctionDef,
  config: &Config,
) -> Result<EquationSet, EqTexError> {
  let mut table = SubstTable::new();
  let mut equations = EquationSet::default();

  for stmt in &def.body {
    match stmt {
      Stmt::Assign { targets, value } => {
        if let Some(items) = decompose(targets, value) {
          for (target, item) in targets.iter().zip(items) {
            let name = render_expr(target, &table, config)?.sym;
            let pair = render_expr(item, &table, config)?;
            equations.sym.push(format!("{name}={}", pair.sym));
            equations.num.push(format!("{name}={}", pair.num));
            table.insert(name, pair.num);
          }
        } else {
          // Broadcast: one rendering of the right-hand side, bound to
          // every target. Rendering per target would let a later target
          // pick up an earlier target's table entry.
          let pair = render_expr(value, &table, config)?;
          for target in targets {
            let name = render_expr(target, &table, config)?.sym;
            equations.sym.push(format!("{name}={}", pair.sym));
            equations.num.push(format!("{name}={}", pair.num));
            table.insert(name, pair.num.clone());
          }
        }
      }
      // Helper definitions nested inside the body do not contribute
      // equations; only the tagged function itself is "the" body.
      Stmt::FunctionDef(_) | Stmt::ClassDef(_) => {}
      Stmt::Return(_) | Stmt::Pass | Stmt::Expr(_) => {}
    }
  }

  Ok(equations)
}

/// The per-target values of a positionally decomposing assignment: a list
/// literal whose arity matches the target count. Anything else broadcasts.
fn decompose<'a>(targets: &[Expr], value: &'a Expr) -> Option<&'a [Expr]> {
  if targets.len() < MIN_UNPACK_TARGETS {
    return None;
  }
  match value {
    Expr::List(items) if items.len() == targets.len() => Some(items),
    _ => None,
  }
}
