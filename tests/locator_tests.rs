use eqtex::locator::{find_tagged, qualified_name};
use eqtex::parser::parse_module;
use eqtex::{BufferOutput, Config, EqTexError, process_source};

const SOURCE: &str = "\
class Outer:
    class Inner:
        @eqtex
        def func(self):
            a = 1

    @eqtex
    def other(self):
        b = 2

def untagged():
    c = 3
";

mod locator_tests {
  use super::*;

  #[test]
  fn collects_tagged_functions_with_prefixes() {
    let module = parse_module(SOURCE).unwrap();
    let config = Config::default();
    let tagged = find_tagged(&module, &config);

    let names: Vec<String> = tagged
      .iter()
      .map(|func| qualified_name(&func.prefix, &func.def.name))
      .collect();
    assert_eq!(names, ["Outer.Inner.func", "Outer.other"]);
  }

  #[test]
  fn untagged_functions_are_skipped() {
    let module = parse_module(SOURCE).unwrap();
    let config = Config::default();
    let tagged = find_tagged(&module, &config);
    assert!(tagged.iter().all(|func| func.def.name != "untagged"));
  }

  #[test]
  fn nested_tagged_function_is_found_inside_untagged_one() {
    let module = parse_module(
      "\
def outer():
    @eqtex
    def inner():
        a = 1
",
    )
    .unwrap();
    let config = Config::default();
    let tagged = find_tagged(&module, &config);
    assert_eq!(tagged.len(), 1);
    assert_eq!(
      qualified_name(&tagged[0].prefix, &tagged[0].def.name),
      "outer.inner"
    );
  }

  #[test]
  fn target_filter_selects_one_function() {
    let mut buffer = BufferOutput::default();
    let count = process_source(
      SOURCE,
      Some("Outer.other"),
      &mut buffer,
      &Config::default(),
    )
    .unwrap();
    assert_eq!(count, 1);
    assert_eq!(buffer.sym, Some(vec!["b=2".to_string()]));
  }

  #[test]
  fn missing_target_is_an_error() {
    let mut buffer = BufferOutput::default();
    let err = process_source(
      SOURCE,
      Some("Outer.missing"),
      &mut buffer,
      &Config::default(),
    )
    .unwrap_err();
    assert!(
      matches!(err, EqTexError::FunctionNotFound(name) if name == "Outer.missing")
    );
  }
}
