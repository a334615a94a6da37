//! Output sinks for rendered equation sequences.
//!
//! The renderer is agnostic to where its lines go; an `Output` either writes
//! them as `.tex` files, keeps them in memory, or hands them to an external
//! LaTeX engine for a rendered preview.

use std::path::PathBuf;
use std::process::Command;

use crate::EqTexError;
use crate::config::Config;
use crate::renderer::ROW_SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqKind {
  Sym,
  Num,
}

impl EqKind {
  pub fn suffix(self) -> &'static str {
    match self {
      EqKind::Sym => "sym",
      EqKind::Num => "num",
    }
  }
}

/// Base name of an output target: class/function prefix, function name and
/// equation kind, underscore-joined.
pub fn base_name(func_name: &str, prefix: &[String], kind: EqKind) -> String {
  format!("{}_{}_{}", prefix.join("_"), func_name, kind.suffix())
}

/// Wrap an equation body in display-equation delimiters.
pub fn wrap_equation(body: &str) -> String {
  format!(
    r"\begin{{equation}}\begin{{aligned}}{body}\end{{aligned}}\end{{equation}}"
  )
}

pub trait Output {
  fn process(
    &mut self,
    func_name: &str,
    prefix: &[String],
    kind: EqKind,
    lines: &[String],
    config: &Config,
  ) -> Result<(), EqTexError>;
}

/// Writes each equation sequence to `.tex` files in a directory: one file
/// per kind when `single_equation` is set, one file per line otherwise.
pub struct FileOutput {
  dir: PathBuf,
}

impl FileOutput {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    FileOutput { dir: dir.into() }
  }
}

impl Output for FileOutput {
  fn process(
    &mut self,
    func_name: &str,
    prefix: &[String],
    kind: EqKind,
    lines: &[String],
    config: &Config,
  ) -> Result<(), EqTexError> {
    let base = base_name(func_name, prefix, kind);
    if config.single_equation {
      let path = self.dir.join(format!("{base}.tex"));
      log::debug!("writing {}", path.display());
      std::fs::write(path, lines.join(ROW_SEPARATOR))?;
    } else {
      for (idx, line) in lines.iter().enumerate() {
        std::fs::write(self.dir.join(format!("{base}_{idx}.tex")), line)?;
      }
    }
    Ok(())
  }
}

/// Keeps the rendered sequences in memory, for tests and embedding. A kind
/// that was never produced stays `None`, distinguishing "disabled" from
/// "rendered empty".
#[derive(Debug, Default)]
pub struct BufferOutput {
  pub sym: Option<Vec<String>>,
  pub num: Option<Vec<String>>,
}

impl Output for BufferOutput {
  fn process(
    &mut self,
    _func_name: &str,
    _prefix: &[String],
    kind: EqKind,
    lines: &[String],
    _config: &Config,
  ) -> Result<(), EqTexError> {
    match kind {
      EqKind::Sym => self.sym = Some(lines.to_vec()),
      EqKind::Num => self.num = Some(lines.to_vec()),
    }
    Ok(())
  }
}

/// Renders each equation to a standalone document by invoking an external
/// LaTeX engine in the output directory.
pub struct PreviewOutput {
  dir: PathBuf,
  engine: String,
}

impl PreviewOutput {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    PreviewOutput {
      dir: dir.into(),
      engine: "pdflatex".to_string(),
    }
  }

  fn compile(&self, base: &str, body: &str) -> Result<(), EqTexError> {
    let tex_name = format!("{base}.tex");
    let document = format!(
      "\\documentclass[preview]{{standalone}}\n\
       \\usepackage{{amsmath}}\n\
       \\begin{{document}}\n{}\n\\end{{document}}\n",
      wrap_equation(body)
    );
    std::fs::write(self.dir.join(&tex_name), document)?;

    log::debug!("running {} on {tex_name}", self.engine);
    let status = Command::new(&self.engine)
      .arg("-interaction=batchmode")
      .arg(&tex_name)
      .current_dir(&self.dir)
      .status()?;
    if !status.success() {
      return Err(EqTexError::Io(std::io::Error::other(format!(
        "{} failed for {tex_name}",
        self.engine
      ))));
    }
    Ok(())
  }
}

impl Output for PreviewOutput {
  fn process(
    &mut self,
    func_name: &str,
    prefix: &[String],
    kind: EqKind,
    lines: &[String],
    config: &Config,
  ) -> Result<(), EqTexError> {
    let base = base_name(func_name, prefix, kind);
    if config.single_equation {
      self.compile(&base, &lines.join(ROW_SEPARATOR))
    } else {
      for (idx, line) in lines.iter().enumerate() {
        self.compile(&format!("{base}_{idx}"), line)?;
      }
      Ok(())
    }
  }
}
