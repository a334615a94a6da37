//! Source front-end: logical-line scanning and AST construction.
//!
//! The pest grammar (`eqtex.pest`) parses a single logical line; this module
//! strips comments, joins bracket continuations, tracks indentation columns
//! and folds the parsed lines into the block structure of `syntax::Stmt`.

use pest::Parser as _;
use pest::iterators::Pair;

use crate::syntax::{
  BinaryOperator, ClassDef, Expr, FunctionDef, Stmt, Tag, UnaryOperator,
};
use crate::{EqTexError, LineParser, Rule};

/// One comment-stripped, bracket-joined source line.
struct LogicalLine {
  indent: usize,
  number: usize,
  text: String,
}

#[derive(Clone)]
enum LineKind {
  Decorator(Tag),
  FuncHeader { name: String, params: Vec<String> },
  ClassHeader { name: String },
  Simple(Stmt),
}

struct ParsedLine {
  indent: usize,
  number: usize,
  kind: LineKind,
}

/// Parse a whole source file into its module-level statement list.
pub fn parse_module(source: &str) -> Result<Vec<Stmt>, EqTexError> {
  let lines = scan_logical_lines(source)?;
  log::debug!("scanned {} logical lines", lines.len());

  let mut parsed = Vec::with_capacity(lines.len());
  for line in &lines {
    parsed.push(ParsedLine {
      indent: line.indent,
      number: line.number,
      kind: parse_line(line)?,
    });
  }

  let mut pos = 0;
  let stmts = build_block(&parsed, &mut pos, 0)?;
  if pos != parsed.len() {
    return Err(layout(parsed[pos].number, "unexpected indentation"));
  }
  Ok(stmts)
}

fn layout(line: usize, message: &str) -> EqTexError {
  EqTexError::Layout {
    line,
    message: message.to_string(),
  }
}

fn strip_comment(line: &str) -> &str {
  match line.find('#') {
    Some(idx) => &line[..idx],
    None => line,
  }
}

fn bracket_depth(text: &str) -> i32 {
  let mut depth = 0;
  for c in text.chars() {
    match c {
      '(' | '[' => depth += 1,
      ')' | ']' => depth -= 1,
      _ => {}
    }
  }
  depth
}

fn scan_logical_lines(source: &str) -> Result<Vec<LogicalLine>, EqTexError> {
  let mut lines = Vec::new();
  let mut iter = source.lines().enumerate();

  while let Some((idx, raw)) = iter.next() {
    let number = idx + 1;
    let code = strip_comment(raw);
    let trimmed = code.trim_start();
    if trimmed.is_empty() {
      continue;
    }

    let indent_str = &code[..code.len() - trimmed.len()];
    if indent_str.contains('\t') {
      return Err(layout(number, "tabs are not supported in indentation"));
    }
    let indent = indent_str.len();

    // Join physical lines while an opened bracket is pending.
    let mut text = trimmed.trim_end().to_string();
    while bracket_depth(&text) > 0 {
      let Some((_, next_raw)) = iter.next() else {
        return Err(layout(number, "unclosed bracket"));
      };
      let next = strip_comment(next_raw).trim();
      if next.is_empty() {
        continue;
      }
      text.push(' ');
      text.push_str(next);
    }

    lines.push(LogicalLine {
      indent,
      number,
      text,
    });
  }
  Ok(lines)
}

fn parse_line(line: &LogicalLine) -> Result<LineKind, EqTexError> {
  let line_pair = LineParser::parse(Rule::Line, &line.text)
    .map_err(Box::new)?
    .next()
    .expect("grammar: Line is the single top-level pair");
  let statement = line_pair
    .into_inner()
    .find(|pair| pair.as_rule() == Rule::Statement)
    .expect("grammar: Line contains a Statement");
  let inner = statement
    .into_inner()
    .next()
    .expect("grammar: Statement wraps one variant");

  match inner.as_rule() {
    Rule::Decorator => Ok(LineKind::Decorator(build_tag(inner))),
    Rule::FuncHeader => {
      let mut name = String::new();
      let mut params = Vec::new();
      for part in inner.into_inner() {
        match part.as_rule() {
          Rule::Name => name = part.as_str().to_string(),
          Rule::ParamList => {
            params = part
              .into_inner()
              .map(|param| param.as_str().to_string())
              .collect();
          }
          _ => {}
        }
      }
      Ok(LineKind::FuncHeader { name, params })
    }
    Rule::ClassHeader => {
      let name = inner
        .into_inner()
        .find(|part| part.as_rule() == Rule::Name)
        .expect("grammar: class header has a name")
        .as_str()
        .to_string();
      Ok(LineKind::ClassHeader { name })
    }
    Rule::ReturnStmt => {
      let value = inner
        .into_inner()
        .find(|part| part.as_rule() == Rule::Expression)
        .map(build_expr)
        .transpose()?;
      Ok(LineKind::Simple(Stmt::Return(value)))
    }
    Rule::PassStmt => Ok(LineKind::Simple(Stmt::Pass)),
    Rule::Assignment => {
      let mut targets = Vec::new();
      let mut value = None;
      for part in inner.into_inner() {
        match part.as_rule() {
          Rule::TargetList => {
            targets = part.into_inner().map(build_target).collect();
          }
          Rule::Expression => value = Some(build_expr(part)?),
          _ => {}
        }
      }
      let value = value.expect("grammar: assignment has a value");
      Ok(LineKind::Simple(Stmt::Assign { targets, value }))
    }
    Rule::ExprStmt => {
      let expr = build_expr(
        inner
          .into_inner()
          .next()
          .expect("grammar: expression statement wraps an expression"),
      )?;
      Ok(LineKind::Simple(Stmt::Expr(expr)))
    }
    rule => Err(EqTexError::UnsupportedConstruct(format!(
      "unexpected statement {rule:?} on line {}",
      line.number
    ))),
  }
}

fn build_tag(pair: Pair<Rule>) -> Tag {
  let mut name = String::new();
  let mut overrides = Vec::new();
  for part in pair.into_inner() {
    match part.as_rule() {
      Rule::DottedName => name = part.as_str().to_string(),
      Rule::DecoratorArgs => {
        for kwarg in part.into_inner() {
          let mut key = String::new();
          let mut value = false;
          for piece in kwarg.into_inner() {
            match piece.as_rule() {
              Rule::Name => key = piece.as_str().to_string(),
              Rule::Bool => value = piece.as_str() == "True",
              _ => {}
            }
          }
          overrides.push((key, value));
        }
      }
      _ => {}
    }
  }
  Tag { name, overrides }
}

fn build_target(pair: Pair<Rule>) -> Expr {
  let mut names = pair
    .into_inner()
    .filter(|part| part.as_rule() == Rule::Name);
  let first = names
    .next()
    .expect("grammar: target has at least one name")
    .as_str()
    .to_string();
  let mut expr = Expr::Identifier(first);
  for name in names {
    expr = Expr::Attribute {
      base: Box::new(expr),
      attr: name.as_str().to_string(),
    };
  }
  expr
}

fn build_expr(pair: Pair<Rule>) -> Result<Expr, EqTexError> {
  match pair.as_rule() {
    Rule::Expression | Rule::Paren | Rule::Primary => build_expr(
      pair
        .into_inner()
        .next()
        .expect("grammar: wrapper rule has one child"),
    ),
    Rule::AddExpr | Rule::MulExpr => {
      let mut inner = pair.into_inner();
      let mut expr =
        build_expr(inner.next().expect("grammar: leftmost operand"))?;
      while let Some(op) = inner.next() {
        let right =
          build_expr(inner.next().expect("grammar: right operand"))?;
        expr = Expr::BinaryOp {
          op: binary_operator(op.as_str()),
          left: Box::new(expr),
          right: Box::new(right),
        };
      }
      Ok(expr)
    }
    Rule::UnaryExpr => {
      let mut inner = pair.into_inner();
      let first = inner.next().expect("grammar: unary operand");
      if first.as_rule() == Rule::NegOp {
        let operand =
          build_expr(inner.next().expect("grammar: negated operand"))?;
        Ok(Expr::UnaryOp {
          op: UnaryOperator::Neg,
          operand: Box::new(operand),
        })
      } else {
        build_expr(first)
      }
    }
    Rule::PowExpr => {
      let mut inner = pair.into_inner();
      let mut expr = build_expr(inner.next().expect("grammar: power base"))?;
      if inner.next().is_some() {
        // the PowOp pair; the exponent follows
        let exponent = build_expr(inner.next().expect("grammar: exponent"))?;
        expr = Expr::BinaryOp {
          op: BinaryOperator::Pow,
          left: Box::new(expr),
          right: Box::new(exponent),
        };
      }
      Ok(expr)
    }
    Rule::Postfix => {
      let mut inner = pair.into_inner();
      let mut expr = build_expr(inner.next().expect("grammar: primary"))?;
      for trailer in inner {
        expr = match trailer.as_rule() {
          Rule::CallArgs => Expr::Call {
            callee: Box::new(expr),
            args: trailer
              .into_inner()
              .next()
              .map(build_args)
              .transpose()?
              .unwrap_or_default(),
          },
          Rule::AttrAccess => Expr::Attribute {
            base: Box::new(expr),
            attr: trailer
              .into_inner()
              .next()
              .expect("grammar: attribute name")
              .as_str()
              .to_string(),
          },
          rule => {
            return Err(EqTexError::UnsupportedConstruct(format!(
              "unexpected trailer {rule:?}"
            )));
          }
        };
      }
      Ok(expr)
    }
    Rule::List => Ok(Expr::List(
      pair
        .into_inner()
        .next()
        .map(build_args)
        .transpose()?
        .unwrap_or_default(),
    )),
    Rule::Number => Ok(Expr::Number(pair.as_str().to_string())),
    Rule::Name => Ok(Expr::Identifier(pair.as_str().to_string())),
    rule => Err(EqTexError::UnsupportedConstruct(format!(
      "unexpected syntax node {rule:?}"
    ))),
  }
}

fn build_args(pair: Pair<Rule>) -> Result<Vec<Expr>, EqTexError> {
  pair.into_inner().map(build_expr).collect()
}

fn binary_operator(symbol: &str) -> BinaryOperator {
  match symbol {
    "+" => BinaryOperator::Add,
    "-" => BinaryOperator::Sub,
    "*" => BinaryOperator::Mul,
    "/" => BinaryOperator::Div,
    "@" => BinaryOperator::MatMul,
    "**" => BinaryOperator::Pow,
    _ => unreachable!("grammar restricts operator symbols"),
  }
}

fn build_block(
  lines: &[ParsedLine],
  pos: &mut usize,
  indent: usize,
) -> Result<Vec<Stmt>, EqTexError> {
  let mut stmts = Vec::new();
  let mut decorators: Vec<Tag> = Vec::new();
  let mut decorator_line = 0;

  while let Some(line) = lines.get(*pos) {
    if line.indent < indent {
      break;
    }
    if line.indent > indent {
      return Err(layout(line.number, "unexpected indentation"));
    }
    match &line.kind {
      LineKind::Decorator(tag) => {
        decorators.push(tag.clone());
        decorator_line = line.number;
        *pos += 1;
      }
      LineKind::FuncHeader { name, params } => {
        *pos += 1;
        let body = build_body(lines, pos, indent, line.number)?;
        stmts.push(Stmt::FunctionDef(FunctionDef {
          name: name.clone(),
          params: params.clone(),
          decorators: std::mem::take(&mut decorators),
          body,
        }));
      }
      LineKind::ClassHeader { name } => {
        if !decorators.is_empty() {
          return Err(layout(
            line.number,
            "decorators are only supported on function definitions",
          ));
        }
        *pos += 1;
        let body = build_body(lines, pos, indent, line.number)?;
        stmts.push(Stmt::ClassDef(ClassDef {
          name: name.clone(),
          body,
        }));
      }
      LineKind::Simple(stmt) => {
        if !decorators.is_empty() {
          return Err(layout(
            line.number,
            "decorator is not followed by a function definition",
          ));
        }
        stmts.push(stmt.clone());
        *pos += 1;
      }
    }
  }

  if !decorators.is_empty() {
    return Err(layout(decorator_line, "dangling decorator"));
  }
  Ok(stmts)
}

fn build_body(
  lines: &[ParsedLine],
  pos: &mut usize,
  parent_indent: usize,
  header_line: usize,
) -> Result<Vec<Stmt>, EqTexError> {
  let Some(first) = lines.get(*pos) else {
    return Err(layout(header_line, "expected an indented block"));
  };
  if first.indent <= parent_indent {
    return Err(layout(first.number, "expected an indented block"));
  }
  let indent = first.indent;
  build_block(lines, pos, indent)
}
