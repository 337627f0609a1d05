use hylogic::prelude::*;

fn main() {
    let lang = Language::predicate();
    let parser = FormulaParser::new(&lang);

    let formula = parser
        .parse_formula("∀x((∃y: Ry)Rxy → ~(x = f(a) ∧ Gx[b/x]))")
        .unwrap();
    formula.pretty_print().unwrap();

    let mut session = MatchSession::new();
    let pattern = parser.parse_formula("∀x(α → β)").unwrap();
    match session.match_formula(&pattern, &formula) {
        Ok(()) => session.instantiate_formula(&pattern).pretty_print().unwrap(),
        Err(e) => println!("{}", Diagnostic::from(&e)),
    }
}
