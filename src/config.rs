//! Rendering configuration.
//!
//! The global defaults can be overridden per tagged function through
//! decorator keyword arguments; overrides apply to a per-function copy and
//! never mutate the defaults.

/// Flags controlling which equations are produced and how they are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Master switch; a disabled tag renders nothing.
  pub enabled: bool,
  /// Emit the symbolic equations (original variable names).
  pub sym_equation: bool,
  /// Emit the numeric equations (names replaced by their last assigned
  /// value's rendering).
  pub num_equation: bool,
  /// Elide the `self.` qualifier on attribute accesses.
  pub skip_self: bool,
  /// Join all lines of a body into one equation instead of emitting one
  /// output target per line.
  pub single_equation: bool,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      enabled: true,
      sym_equation: true,
      num_equation: true,
      skip_self: true,
      single_equation: true,
    }
  }
}

impl Config {
  /// Apply one decorator keyword override. Unknown keys are logged and
  /// ignored.
  pub fn set(&mut self, key: &str, value: bool) {
    match key {
      "enabled" => self.enabled = value,
      "sym_equation" => self.sym_equation = value,
      "num_equation" => self.num_equation = value,
      "skip_self" => self.skip_self = value,
      "single_equation" => self.single_equation = value,
      _ => log::warn!("ignoring unknown config key: {key}"),
    }
  }
}
