//! Locates tagged functions in a parsed module.
//!
//! Walks class and function definitions, maintaining the dotted name prefix,
//! and collects every function carrying the `@eqtex` decorator. Untagged
//! definitions are descended into; tagged ones are not, so a tagged function
//! nested in a tagged function is never rendered twice.

use crate::config::Config;
use crate::syntax::{FunctionDef, Stmt};

/// Decorator name that marks a function for rendering.
pub const TAG_NAME: &str = "eqtex";

/// One tagged function together with its enclosing name prefix and its
/// effective (override-applied) configuration.
#[derive(Debug)]
pub struct TaggedFunction<'a> {
  pub def: &'a FunctionDef,
  pub prefix: Vec<String>,
  pub config: Config,
}

/// Collect all tagged functions of a module, in source order.
pub fn find_tagged<'a>(
  module: &'a [Stmt],
  base: &Config,
) -> Vec<TaggedFunction<'a>> {
  let mut found = Vec::new();
  let mut prefix = Vec::new();
  collect(module, base, &mut prefix, &mut found);
  found
}

fn collect<'a>(
  stmts: &'a [Stmt],
  base: &Config,
  prefix: &mut Vec<String>,
  found: &mut Vec<TaggedFunction<'a>>,
) {
  for stmt in stmts {
    match stmt {
      Stmt::FunctionDef(def) => {
        if let Some(tag) =
          def.decorators.iter().find(|tag| tag.name == TAG_NAME)
        {
          let mut config = base.clone();
          for (key, value) in &tag.overrides {
            config.set(key, *value);
          }
          log::debug!(
            "found tagged function {}",
            qualified_name(prefix, &def.name)
          );
          found.push(TaggedFunction {
            def,
            prefix: prefix.clone(),
            config,
          });
        } else {
          prefix.push(def.name.clone());
          collect(&def.body, base, prefix, found);
          prefix.pop();
        }
      }
      Stmt::ClassDef(class) => {
        prefix.push(class.name.clone());
        collect(&class.body, base, prefix, found);
        prefix.pop();
      }
      _ => {}
    }
  }
}

/// Dotted qualified name of a definition under a prefix.
pub fn qualified_name(prefix: &[String], name: &str) -> String {
  if prefix.is_empty() {
    name.to_string()
  } else {
    format!("{}.{}", prefix.join("."), name)
  }
}
