use eqtex::parser::parse_module;
use eqtex::syntax::{BinaryOperator, Expr, Stmt};
use eqtex::{BufferOutput, Config, EqTexError, process_source};

fn render(source: &str) -> (Vec<String>, Vec<String>) {
  let mut buffer = BufferOutput::default();
  process_source(source, None, &mut buffer, &Config::default()).unwrap();
  (
    buffer.sym.unwrap_or_default(),
    buffer.num.unwrap_or_default(),
  )
}

mod parser_tests {
  use super::*;

  #[test]
  fn module_structure() {
    let module = parse_module(
      "\
class Model:
    def fit(self):
        a = 1

x = 2
",
    )
    .unwrap();
    assert_eq!(module.len(), 2);
    let Stmt::ClassDef(class) = &module[0] else {
      panic!("expected a class definition");
    };
    assert_eq!(class.name, "Model");
    assert_eq!(class.body.len(), 1);
    assert!(matches!(&module[1], Stmt::Assign { .. }));
  }

  #[test]
  fn power_is_right_associative() {
    let module = parse_module("a = 2 ** 3 ** 4\n").unwrap();
    let Stmt::Assign { value, .. } = &module[0] else {
      panic!("expected an assignment");
    };
    let Expr::BinaryOp { op, right, .. } = value else {
      panic!("expected a binary operation");
    };
    assert_eq!(*op, BinaryOperator::Pow);
    assert!(matches!(
      right.as_ref(),
      Expr::BinaryOp {
        op: BinaryOperator::Pow,
        ..
      }
    ));
  }

  #[test]
  fn parentheses_shape_the_tree_without_a_node() {
    let module = parse_module("a = (1 + 2) * 3\n").unwrap();
    let Stmt::Assign { value, .. } = &module[0] else {
      panic!("expected an assignment");
    };
    let Expr::BinaryOp { op, left, .. } = value else {
      panic!("expected a binary operation");
    };
    assert_eq!(*op, BinaryOperator::Mul);
    assert!(matches!(
      left.as_ref(),
      Expr::BinaryOp {
        op: BinaryOperator::Add,
        ..
      }
    ));
  }

  #[test]
  fn comments_and_blank_lines_are_skipped() {
    let (sym, _) = render(
      "\
# leading comment

@eqtex
def func():
    a = 1  # trailing comment

    b = 2
",
    );
    assert_eq!(sym, ["a=1", "b=2"]);
  }

  #[test]
  fn bracket_continuation_joins_lines() {
    let (sym, _) = render(
      "\
@eqtex
def func(a, b):
    A = array([[a, 5],
               [2, 7],
               [b, 5]])
",
    );
    assert_eq!(sym, [r"A=\begin{bmatrix}a&5\\2&7\\b&5\end{bmatrix}"]);
  }

  #[test]
  fn matching_arity_list_unpacks_positionally() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a, b = [1, 2]
    c = a + b
",
    );
    assert_eq!(sym, ["a=1", "b=2", "c=a + b"]);
    assert_eq!(num, ["a=1", "b=2", "c=1 + 2"]);
  }

  #[test]
  fn non_list_value_broadcasts_to_all_targets() {
    let (sym, num) = render(
      "\
@eqtex
def func(c):
    a, b = c
",
    );
    assert_eq!(sym, ["a=c", "b=c"]);
    assert_eq!(num, ["a=c", "b=c"]);
  }

  #[test]
  fn broadcast_binds_one_rendering_to_every_target() {
    // The right-hand side names one of the targets; every target must
    // still get the rendering taken before any of them is bound.
    let (sym, num) = render(
      "\
@eqtex
def func(a):
    a, b = a + 1
",
    );
    assert_eq!(sym, ["a=a + 1", "b=a + 1"]);
    assert_eq!(num, ["a=a + 1", "b=a + 1"]);
  }

  #[test]
  fn nested_definitions_do_not_render() {
    let (sym, _) = render(
      "\
@eqtex
def func():
    a = 1
    def helper():
        b = 2
    c = 3
",
    );
    assert_eq!(sym, ["a=1", "c=3"]);
  }

  #[test]
  fn bad_indentation_is_rejected() {
    let err = parse_module(
      "\
def func():
    a = 1
      b = 2
",
    )
    .unwrap_err();
    assert!(matches!(err, EqTexError::Layout { line: 3, .. }));
  }

  #[test]
  fn missing_block_is_rejected() {
    let err = parse_module("def func():\n").unwrap_err();
    assert!(matches!(err, EqTexError::Layout { .. }));
  }

  #[test]
  fn unclosed_bracket_is_rejected() {
    let err = parse_module("a = array([1, 2\n").unwrap_err();
    assert!(matches!(err, EqTexError::Layout { line: 1, .. }));
  }

  #[test]
  fn unparsable_line_is_rejected() {
    let err = parse_module("a = = 1\n").unwrap_err();
    assert!(matches!(err, EqTexError::ParseError(_)));
  }
}
