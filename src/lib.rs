//! eqtex renders tagged numeric Python functions as LaTeX equations, in two
//! parallel forms: a *symbolic* one using the original variable names and a
//! *numeric* one where each name is replaced by the rendering of the value
//! last assigned to it in the same body.
//!
//! ```
//! use eqtex::{BufferOutput, Config, process_source};
//!
//! let source = "\
//! @eqtex
//! def func():
//!     a = 1
//!     b = a + 2
//! ";
//! let mut buffer = BufferOutput::default();
//! process_source(source, None, &mut buffer, &Config::default()).unwrap();
//! assert_eq!(buffer.sym.unwrap(), ["a=1", "b=a + 2"]);
//! assert_eq!(buffer.num.unwrap(), ["a=1", "b=1 + 2"]);
//! ```

use pest_derive::Parser;
use thiserror::Error;

pub mod config;
pub mod locator;
pub mod output;
pub mod parser;
pub mod renderer;
pub mod syntax;

pub use config::Config;
pub use output::{BufferOutput, EqKind, FileOutput, Output, PreviewOutput};
pub use renderer::{
  EquationSet, RenderPair, SubstTable, render_expr, render_function,
};

/// Parses one logical source line; block structure is resolved in `parser`.
#[derive(Parser)]
#[grammar = "eqtex.pest"]
pub struct LineParser;

#[derive(Error, Debug)]
pub enum EqTexError {
  #[error("Parse error: {0}")]
  ParseError(#[from] Box<pest::error::Error<Rule>>),
  #[error("Layout error on line {line}: {message}")]
  Layout { line: usize, message: String },
  #[error("Unsupported construct: {0}")]
  UnsupportedConstruct(String),
  #[error("Unsupported call: {0}")]
  UnsupportedCall(String),
  #[error("Unknown attribute: {0}")]
  UnknownAttribute(String),
  #[error("Function not found: {0}")]
  FunctionNotFound(String),
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// Parse `source`, render every tagged function (optionally restricted to
/// one qualified name) and hand the equation lines to `output`.
///
/// Returns the number of functions rendered. Fails with
/// [`EqTexError::FunctionNotFound`] when a requested qualified name matches
/// nothing in the module.
pub fn process_source(
  source: &str,
  target: Option<&str>,
  output: &mut dyn Output,
  config: &Config,
) -> Result<usize, EqTexError> {
  let module = parser::parse_module(source)?;
  let tagged = locator::find_tagged(&module, config);

  let mut rendered = 0;
  let mut matched = false;
  for func in &tagged {
    if let Some(qualname) = target {
      if locator::qualified_name(&func.prefix, &func.def.name) != qualname {
        continue;
      }
    }
    matched = true;
    if !func.config.enabled {
      continue;
    }

    let equations = render_function(func.def, &func.config)?;
    log::debug!(
      "rendered {} equation line(s) for {}",
      equations.sym.len(),
      locator::qualified_name(&func.prefix, &func.def.name)
    );
    if func.config.sym_equation {
      output.process(
        &func.def.name,
        &func.prefix,
        EqKind::Sym,
        &equations.sym,
        &func.config,
      )?;
    }
    if func.config.num_equation {
      output.process(
        &func.def.name,
        &func.prefix,
        EqKind::Num,
        &equations.num,
        &func.config,
      )?;
    }
    rendered += 1;
  }

  if let Some(qualname) = target {
    if !matched {
      return Err(EqTexError::FunctionNotFound(qualname.to_string()));
    }
  }
  Ok(rendered)
}
