use hylogic::expr::pretty::{Rendering, Style, plain_text};
use hylogic::prelude::*;
use termcolor::{Ansi, NoColor};

const SAMPLES: [&str; 8] = [
    "P",
    "~~P",
    "(P ∧ Q) → ~R",
    "∀x(Fx → ∃y(Rxy ∨ y = f(x)))",
    "(∃x < (a + b))x ≠ c",
    "(∀x: Fx)Gx[a/x]",
    "(Fx ↔ α(τ))^x_b",
    "Γ ↑ Γ",
];

#[test]
fn runs_and_text_agree() {
    let lang = Language::predicate();
    let parser = FormulaParser::new(&lang);
    for text in SAMPLES {
        let f = parser.parse_formula(text).unwrap();
        assert_eq!(plain_text(&f.text_runs()), f.to_string(), "{text}");
        assert_eq!(f.pretty_string(), f.to_string());
    }
}

#[test]
fn canonical_spacing() {
    let lang = Language::predicate();
    let parser = FormulaParser::new(&lang);
    let cases = [
        ("(P∧Q)→~R", "(P ∧ Q) → ~R"),
        ("∀x ( Fx→Gx )", "∀x(Fx → Gx)"),
        ("f(a,b)=c", "f(a, b) = c"),
        ("(∀x:Fx)Gx", "(∀x: Fx)Gx"),
        ("(∃x<a)Fx", "(∃x < a)Fx"),
    ];
    for (input, expected) in cases {
        assert_eq!(parser.parse_formula(input).unwrap().to_string(), expected);
    }
}

#[test]
fn bracket_shapes_are_kept() {
    let lang = Language::sentential();
    let parser = FormulaParser::new(&lang);
    let f = parser.parse_formula("[P ∨ {Q ∧ R}]").unwrap();
    assert_eq!(f.to_string(), "[P ∨ {Q ∧ R}]");
    let bare = parser.parse_formula("P ∨ {Q ∧ R}").unwrap();
    assert_eq!(bare.to_string(), "P ∨ {Q ∧ R}");
    assert_eq!(f, bare);
    let g = parser.parse_formula("~[P ∨ {Q ∧ R}]").unwrap();
    assert_eq!(g.to_string(), "~[P ∨ {Q ∧ R}]");
}

#[test]
fn transform_forces_outer_brackets() {
    let lang = Language::predicate();
    let parser = FormulaParser::new(&lang);
    let f = parser.parse_formula("Fx ∧ Gx").unwrap();
    let sub = hylogic::expr::SubstitutionTransform::inline(
        parser.parse_term("x").unwrap(),
        parser.parse_term("a").unwrap(),
    );
    assert_eq!(f.with_transform(sub).to_string(), "(Fx ∧ Gx)[a/x]");
}

#[test]
fn transform_parts_are_styled() {
    let lang = Language::predicate();
    let parser = FormulaParser::new(&lang);
    let f = parser.parse_formula("Fx^x_a").unwrap();
    let runs = f.text_runs();
    assert!(runs.iter().any(|r| r.style == Style::Superscript && r.text == "x"));
    assert!(runs.iter().any(|r| r.style == Style::Subscript && r.text == "a"));
}

#[test]
fn operators_are_styled() {
    let lang = Language::sentential();
    let parser = FormulaParser::new(&lang);
    let runs = parser.parse_formula("~P → Q").unwrap().text_runs();
    let operators: Vec<_> = runs
        .iter()
        .filter(|r| r.style == Style::Operator)
        .map(|r| r.text.as_str())
        .collect();
    assert_eq!(operators, ["~", "→"]);
}

#[test]
fn terminal_rendering() {
    let lang = Language::sentential();
    let parser = FormulaParser::new(&lang);
    let f = parser.parse_formula("(P ∧ Q) → R").unwrap();

    let mut plain = NoColor::new(Vec::new());
    f.pretty_render_to(&mut plain).unwrap();
    assert_eq!(String::from_utf8(plain.into_inner()).unwrap(), f.to_string());

    let mut colored = Ansi::new(Vec::new());
    f.pretty_render_to(&mut colored).unwrap();
    let colored = String::from_utf8(colored.into_inner()).unwrap();
    assert!(colored.contains("\x1b["));
    assert!(colored.contains('∧'));
}

#[test]
fn rendering_snapshot() {
    let lang = Language::sentential();
    let parser = FormulaParser::new(&lang);
    let f = parser.parse_formula("P ↓ Q").unwrap();
    let r = Rendering::of(&f);
    assert_eq!(r.text, "P ↓ Q");
    assert_eq!(r.to_string(), r.text);
    assert_eq!(plain_text(&r.runs), r.text);
}
