use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use eqtex::{Config, EqTexError, FileOutput, Output, PreviewOutput};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Python source file or directory to scan for @eqtex-tagged functions
  sources: PathBuf,

  /// Only render the function with this qualified name (e.g. "Filter.predict")
  #[arg(long)]
  function: Option<String>,

  /// Directory the .tex files are written to
  #[arg(long, default_value = ".")]
  out_dir: PathBuf,

  /// Write one file per equation line instead of one combined equation
  #[arg(long)]
  split: bool,

  /// Keep the "self." qualifier on attribute accesses
  #[arg(long)]
  keep_self: bool,

  /// Skip the symbolic equations
  #[arg(long)]
  no_sym: bool,

  /// Skip the numeric equations
  #[arg(long)]
  no_num: bool,

  /// Additionally render each equation with an external LaTeX engine
  #[arg(long)]
  preview: bool,
}

fn collect_sources(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
  if path.is_dir() {
    for entry in std::fs::read_dir(path)
      .with_context(|| format!("cannot read directory {}", path.display()))?
    {
      collect_sources(&entry?.path(), files)?;
    }
  } else if path.extension().is_some_and(|ext| ext == "py") {
    files.push(path.to_path_buf());
  }
  Ok(())
}

fn main() -> Result<()> {
  env_logger::init();
  let cli = Cli::parse();

  let mut config = Config::default();
  config.single_equation = !cli.split;
  config.skip_self = !cli.keep_self;
  config.sym_equation = !cli.no_sym;
  config.num_equation = !cli.no_num;

  let mut files = Vec::new();
  if cli.sources.is_file() {
    files.push(cli.sources.clone());
  } else {
    collect_sources(&cli.sources, &mut files)?;
  }
  if files.is_empty() {
    bail!("no Python sources found under {}", cli.sources.display());
  }

  let mut rendered = 0;
  let mut found = false;
  for file in &files {
    let source = std::fs::read_to_string(file)
      .with_context(|| format!("cannot read {}", file.display()))?;

    let mut output: Box<dyn Output> = if cli.preview {
      Box::new(PreviewOutput::new(&cli.out_dir))
    } else {
      Box::new(FileOutput::new(&cli.out_dir))
    };

    match eqtex::process_source(
      &source,
      cli.function.as_deref(),
      output.as_mut(),
      &config,
    ) {
      Ok(count) => {
        rendered += count;
        found = true;
      }
      // The requested function may live in another file of the set.
      Err(EqTexError::FunctionNotFound(_)) => {}
      Err(err) => {
        return Err(err).context(format!("failed to render {}", file.display()));
      }
    }
  }

  if let Some(function) = &cli.function {
    if !found {
      bail!("function not found: {function}");
    }
  }
  log::info!("rendered {rendered} function(s) from {} file(s)", files.len());
  Ok(())
}
