use eqtex::{BufferOutput, Config, process_source};

/// Render every tagged function of `source` with the default configuration
/// and return the accumulated (symbolic, numeric) lines.
fn render(source: &str) -> (Vec<String>, Vec<String>) {
  let mut buffer = BufferOutput::default();
  process_source(source, None, &mut buffer, &Config::default()).unwrap();
  (
    buffer.sym.unwrap_or_default(),
    buffer.num.unwrap_or_default(),
  )
}

mod render_tests {
  use super::*;

  #[test]
  fn empty_body() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    pass
",
    );
    assert_eq!(sym, Vec::<String>::new());
    assert_eq!(num, Vec::<String>::new());
  }

  #[test]
  fn return_only() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    return None
",
    );
    assert_eq!(sym, Vec::<String>::new());
    assert_eq!(num, Vec::<String>::new());
  }

  #[test]
  fn class_method() {
    let (sym, num) = render(
      "\
class TestClass:
    @eqtex
    def method(self):
        pass
",
    );
    assert_eq!(sym, Vec::<String>::new());
    assert_eq!(num, Vec::<String>::new());
  }

  #[test]
  fn single_assignment() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1
",
    );
    assert_eq!(sym, ["a=1"]);
    assert_eq!(num, ["a=1"]);
  }

  #[test]
  fn float_literals_are_carried_verbatim() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1e3
    b = .5
    c = 2.5e-2
",
    );
    assert_eq!(sym, ["a=1e3", "b=.5", "c=2.5e-2"]);
    assert_eq!(num, ["a=1e3", "b=.5", "c=2.5e-2"]);
  }

  #[test]
  fn substitution() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1
    b = a
",
    );
    assert_eq!(sym, ["a=1", "b=a"]);
    assert_eq!(num, ["a=1", "b=1"]);
  }

  #[test]
  fn add() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1
    b = a + 2
",
    );
    assert_eq!(sym, ["a=1", "b=a + 2"]);
    assert_eq!(num, ["a=1", "b=1 + 2"]);
  }

  #[test]
  fn sub() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1
    b = a - 2
",
    );
    assert_eq!(sym, ["a=1", "b=a - 2"]);
    assert_eq!(num, ["a=1", "b=1 - 2"]);
  }

  #[test]
  fn mul() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1
    b = a * 2
",
    );
    assert_eq!(sym, ["a=1", r"b=a \cdot 2"]);
    assert_eq!(num, ["a=1", r"b=1 \cdot 2"]);
  }

  #[test]
  fn div() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1
    b = a / 2
",
    );
    assert_eq!(sym, ["a=1", r"b=\frac{a}{2}"]);
    assert_eq!(num, ["a=1", r"b=\frac{1}{2}"]);
  }

  #[test]
  fn pow() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1 ** 2
",
    );
    assert_eq!(sym, ["a={1}^{2}"]);
    assert_eq!(num, ["a={1}^{2}"]);
  }

  #[test]
  fn unary_minus() {
    let (sym, num) = render(
      "\
@eqtex
def func(x):
    a = -x
",
    );
    assert_eq!(sym, ["a= - x"]);
    assert_eq!(num, ["a= - x"]);
  }

  #[test]
  fn unary_minus_parenthesizes_binary_operand() {
    let (sym, _) = render(
      "\
@eqtex
def func(x):
    a = -(x + 1)
",
    );
    assert_eq!(sym, [r"a= - \left(x + 1\right)"]);
  }

  #[test]
  fn additive_under_multiplicative_is_parenthesized() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = (1 + 2) * 3
",
    );
    assert_eq!(sym, [r"a=\left(1 + 2\right) \cdot 3"]);
    assert_eq!(num, [r"a=\left(1 + 2\right) \cdot 3"]);
  }

  #[test]
  fn right_operand_is_parenthesized_too() {
    let (sym, _) = render(
      "\
@eqtex
def func():
    a = 3 * (1 + 2)
",
    );
    assert_eq!(sym, [r"a=3 \cdot \left(1 + 2\right)"]);
  }

  #[test]
  fn division_never_adds_parentheses() {
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = ((1 + ((2 + 3) / 4) / 5)) * 6
",
    );
    assert_eq!(
      sym,
      [r"a=\left(1 + \frac{\frac{2 + 3}{4}}{5}\right) \cdot 6"]
    );
    assert_eq!(
      num,
      [r"a=\left(1 + \frac{\frac{2 + 3}{4}}{5}\right) \cdot 6"]
    );
  }

  #[test]
  fn numeric_side_substitutes_verbatim() {
    // Substitution pastes the numeric string of an earlier assignment as-is;
    // it does not re-parenthesize.
    let (sym, num) = render(
      "\
@eqtex
def func():
    a = 1
    b = a + 2
    c = b * a
",
    );
    assert_eq!(sym, ["a=1", "b=a + 2", r"c=b \cdot a"]);
    assert_eq!(num, ["a=1", "b=1 + 2", r"c=1 + 2 \cdot 1"]);
  }

  #[test]
  fn rendering_is_idempotent() {
    let source = "\
@eqtex
def func(x):
    a = x * 2
    b = a + x
";
    assert_eq!(render(source), render(source));
  }

  #[test]
  fn fresh_table_per_function() {
    let (sym, num) = render(
      "\
@eqtex
def first():
    a = 1

@eqtex
def second():
    b = a
",
    );
    // BufferOutput keeps the last function; `a` must not leak into it.
    assert_eq!(sym, ["b=a"]);
    assert_eq!(num, ["b=a"]);
  }
}
