//! Property-based tests for the calculator state machine.
//!
//! Arbitrary key sequences must never panic and must preserve the machine's
//! structural invariants: a non-empty display, a bounded operator run in
//! the formula, one decimal point per operand, and guarded evaluation.

use proptest::prelude::*;
use tallypad::prelude::*;

// ===== Strategy definitions =====

fn digit_strategy() -> impl Strategy<Value = Digit> {
    prop::sample::select(Digit::ALL.to_vec())
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Add),
        Just(Op::Subtract),
        Just(Op::Multiply),
        Just(Op::Divide),
    ]
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        4 => digit_strategy().prop_map(Key::Digit),
        2 => op_strategy().prop_map(Key::Op),
        1 => Just(Key::Decimal),
        1 => Just(Key::Equals),
        1 => Just(Key::Clear),
    ]
}

fn key_sequence() -> impl Strategy<Value = Vec<Key>> {
    prop::collection::vec(key_strategy(), 0..48)
}

fn run_sequence(keys: &[Key]) -> Calculator {
    let mut calc = Calculator::new();
    for key in keys {
        calc.press(*key);
    }
    calc
}

/// The formula alphabet, minus the `Error` suffix an evaluated failure
/// appends.
fn formula_body(calc: &Calculator) -> &str {
    calc.formula()
        .strip_suffix(ERROR_DISPLAY)
        .unwrap_or(calc.formula())
}

// ===== Structural invariants =====

proptest! {
    #[test]
    fn prop_display_never_empty(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        prop_assert!(!calc.display().is_empty());
    }

    #[test]
    fn prop_formula_alphabet(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        for c in formula_body(&calc).chars() {
            prop_assert!(
                c.is_ascii_digit() || c == '.' || c == '=' || Op::is_glyph(c),
                "unexpected formula char {c:?} in {:?}",
                calc.formula()
            );
        }
    }

    #[test]
    fn prop_no_three_operator_run(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        let mut run = 0usize;
        for c in calc.formula().chars() {
            if Op::is_glyph(c) {
                run += 1;
                prop_assert!(run <= 2, "operator run of {run} in {:?}", calc.formula());
            } else {
                run = 0;
            }
        }
    }

    #[test]
    fn prop_no_redundant_leading_zero(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        let display = calc.display();
        if display.starts_with('0') && display.len() > 1 {
            prop_assert_eq!(display.as_bytes()[1], b'.', "display {:?}", display);
        }
    }

    #[test]
    fn prop_one_decimal_per_operand(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        for operand in formula_body(&calc)
            .split(|c: char| Op::is_glyph(c) || c == '=')
        {
            let dots = operand.matches('.').count();
            prop_assert!(dots <= 1, "operand {operand:?} in {:?}", calc.formula());
        }
    }

    #[test]
    fn prop_evaluated_formula_ends_with_display(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        if calc.phase() == Phase::Evaluated {
            let suffix = format!("={}", calc.display());
            prop_assert!(
                calc.formula().ends_with(&suffix),
                "formula {:?} vs display {:?}",
                calc.formula(),
                calc.display()
            );
        }
    }
}

// ===== Operation guarantees =====

proptest! {
    #[test]
    fn prop_equals_twice_is_noop(keys in key_sequence()) {
        let mut calc = run_sequence(&keys);
        calc.press_equals();
        let display = calc.display().to_string();
        let formula = calc.formula().to_string();
        let phase = calc.phase();
        calc.press_equals();
        prop_assert_eq!(calc.display(), display);
        prop_assert_eq!(calc.formula(), formula);
        prop_assert_eq!(calc.phase(), phase);
    }

    #[test]
    fn prop_clear_always_resets(keys in key_sequence()) {
        let mut calc = run_sequence(&keys);
        calc.press_clear();
        prop_assert_eq!(calc.display(), "0");
        prop_assert_eq!(calc.formula(), "");
        prop_assert_eq!(calc.phase(), Phase::Start);
    }

    #[test]
    fn prop_digit_after_error_starts_fresh(keys in key_sequence(), d in digit_strategy()) {
        let mut calc = run_sequence(&keys);
        if calc.is_error() {
            calc.press_digit(d);
            prop_assert!(!calc.is_error());
            if d.value() == 0 {
                prop_assert_eq!(calc.display(), "0");
            } else {
                prop_assert_eq!(calc.display(), d.to_char().to_string());
                prop_assert_eq!(calc.formula(), d.to_char().to_string());
            }
        }
    }

    #[test]
    fn prop_operator_replaces_previous_non_subtract(
        d in digit_strategy(),
        first in op_strategy(),
        second in op_strategy(),
    ) {
        prop_assume!(second != Op::Subtract);
        let mut calc = Calculator::new();
        calc.press_digit(d);
        calc.press_operator(first);
        calc.press_operator(second);
        prop_assert!(calc.formula().ends_with(second.glyph()));
        prop_assert_eq!(
            calc.formula().chars().filter(|c| Op::is_glyph(*c)).count(),
            1
        );
    }

    #[test]
    fn prop_windows_do_not_mutate(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        let display = calc.display().to_string();
        let formula = calc.formula().to_string();
        let _ = calc.display_window();
        let _ = calc.formula_window();
        prop_assert_eq!(calc.display(), display);
        prop_assert_eq!(calc.formula(), formula);
    }

    #[test]
    fn prop_display_window_bounded(keys in key_sequence()) {
        let calc = run_sequence(&keys);
        prop_assert!(
            calc.display_window().chars().count() <= Calculator::DISPLAY_WINDOW + 3
        );
        prop_assert!(
            calc.formula_window().chars().count() <= Calculator::FORMULA_WINDOW + 3
        );
    }
}

// ===== Evaluator robustness =====

proptest! {
    #[test]
    fn prop_evaluator_never_panics(expr in ".{0,32}") {
        // Ok or Err, never a panic, for arbitrary text.
        let _ = evaluate_formula(&expr);
    }

    #[test]
    fn prop_evaluator_digits_identity(digits in "[1-9][0-9]{0,7}") {
        let result = evaluate_formula(&digits).unwrap();
        prop_assert_eq!(result, digits);
    }

    #[test]
    fn prop_addition_matches_f64(a in 0u32..1_000_000, b in 0u32..1_000_000) {
        let result = evaluate_formula(&format!("{a}+{b}")).unwrap();
        prop_assert_eq!(result, (u64::from(a) + u64::from(b)).to_string());
    }

    #[test]
    fn prop_subtraction_matches_i64(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let result = evaluate_formula(&format!("{a}-{b}")).unwrap();
        prop_assert_eq!(result, (a - b).to_string());
    }
}
