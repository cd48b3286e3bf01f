//! The calculator brain: an accumulator, at most one pending binary
//! operation, the program log and the running description.
//!
//! Binary arithmetic is deferred until the second operand is known, so
//! `3 + 4 + 5 =` evaluates left to right as `(3 + 4) + 5`. The brain never
//! fails: division by zero yields IEEE infinities or NaN and unknown symbols
//! are only recorded in the program.

use crate::description::Description;
use crate::number_format::NumberFormat;
use crate::operations::{BinaryOp, Operation};
use crate::program::{Program, ProgramEntry};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A binary operator waiting for its right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBinaryOperation {
    pub op: BinaryOp,
    pub first_operand: f64,
    pub symbol: String,
    pub second_operand_entered: bool,
}

#[derive(Debug, Clone)]
pub struct CalculatorBrain {
    accumulator: f64,
    program: Program,
    description: Description,
    pending: Option<PendingBinaryOperation>,
    format: NumberFormat,
    rng: StdRng,
}

impl Default for CalculatorBrain {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorBrain {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Brain whose `rand` key draws a reproducible sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            accumulator: 0.0,
            program: Program::new(),
            description: Description::default(),
            pending: None,
            format: NumberFormat::default(),
            rng,
        }
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.set_number_format(format);
        self
    }

    pub fn number_format(&self) -> NumberFormat {
        self.format
    }

    /// Changes how numbers are written in the description. The program is
    /// replayed so the existing text follows the new format too.
    pub fn set_number_format(&mut self, format: NumberFormat) {
        if self.format == format {
            return;
        }
        self.format = format;
        let program = self.program.clone();
        self.set_program(program);
    }

    pub fn set_operand(&mut self, value: f64) {
        self.apply_entry(ProgramEntry::Operand(value));
    }

    pub fn perform_operation(&mut self, symbol: &str) {
        self.apply_entry(ProgramEntry::Operation(symbol.to_string()));
    }

    pub fn result(&self) -> f64 {
        self.accumulator
    }

    /// What has been computed since the last clear, e.g. `7 + √(9)`.
    /// Decorations such as `=` or `...` are left to the caller.
    pub fn description(&self) -> String {
        self.description.render()
    }

    pub fn is_partial_result(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingBinaryOperation> {
        self.pending.as_ref()
    }

    /// An independent copy of the log; later input does not touch it.
    pub fn program(&self) -> Program {
        self.program.clone()
    }

    /// Clears the brain and replays `program` from the start.
    pub fn set_program(&mut self, program: Program) {
        self.clear();
        for entry in program {
            self.apply_entry(entry);
        }
    }

    fn clear(&mut self) {
        self.accumulator = 0.0;
        self.pending = None;
        self.description.clear();
        self.program.clear();
    }

    fn apply_entry(&mut self, entry: ProgramEntry) {
        match entry {
            ProgramEntry::Operand(value) => {
                self.program.push(ProgramEntry::Operand(value));
                let text = self.format.format(value);
                self.enter_value(value, text);
            }
            ProgramEntry::Random(value) => {
                self.program.push(ProgramEntry::Random(value));
                let text = self.format.format(value);
                self.enter_value(value, text);
            }
            ProgramEntry::Operation(symbol) => {
                let operation = Operation::lookup(&symbol);
                if operation == Some(Operation::Random) {
                    let value = self.rng.gen::<f64>();
                    self.apply_entry(ProgramEntry::Random(value));
                    return;
                }
                if operation.is_none() {
                    debug!("ignoring unknown symbol {symbol:?}");
                }
                self.program.push(ProgramEntry::Operation(symbol.clone()));
                if let Some(operation) = operation {
                    self.apply(operation, symbol);
                }
            }
        }
    }

    fn apply(&mut self, operation: Operation, symbol: String) {
        match operation {
            Operation::Constant(constant) => {
                self.enter_value(constant.value(), constant.glyph().to_string());
            }
            Operation::Unary(op) => {
                let before = self.format.format(self.accumulator);
                self.accumulator = op.apply(self.accumulator);
                if self.mark_second_operand() {
                    self.description.wrap_token(op.prefix(), before);
                } else {
                    self.description.wrap_all(op.prefix(), before);
                }
            }
            Operation::Binary(op) => {
                let fallback = (self.pending.is_some() || self.description.is_empty())
                    .then(|| self.format.format(self.accumulator));
                self.description
                    .push_binary(op.glyph(), op.precedence(), fallback);
                self.resolve_pending();
                self.pending = Some(PendingBinaryOperation {
                    op,
                    first_operand: self.accumulator,
                    symbol,
                    second_operand_entered: false,
                });
            }
            Operation::Equals => {
                let fallback = self
                    .pending
                    .as_ref()
                    .filter(|pending| !pending.second_operand_entered)
                    .map(|_| self.format.format(self.accumulator));
                self.description.commit_token(fallback);
                self.resolve_pending();
            }
            Operation::Clear => self.clear(),
            Operation::Percent => {
                let before = self.format.format(self.accumulator);
                match self.pending.as_mut() {
                    Some(pending) => {
                        self.accumulator = pending.first_operand / 100.0 * self.accumulator;
                        pending.second_operand_entered = true;
                        self.description.suffix_token("%", before);
                    }
                    None => {
                        self.accumulator /= 100.0;
                        self.description.suffix_all("%", before);
                    }
                }
            }
            // Drawn in apply_entry so the log keeps the value.
            Operation::Random => {}
        }
    }

    fn enter_value(&mut self, value: f64, text: String) {
        self.accumulator = value;
        let continues = self.mark_second_operand();
        self.description.set_token(text, continues);
    }

    /// Returns whether the value just entered is the right-hand side of a
    /// pending operation.
    fn mark_second_operand(&mut self) -> bool {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.second_operand_entered = true;
                true
            }
            None => false,
        }
    }

    fn resolve_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.accumulator = pending.op.apply(pending.first_operand, self.accumulator);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    enum Key {
        N(f64),
        S(&'static str),
    }
    use Key::{N, S};

    fn run(keys: &[Key]) -> CalculatorBrain {
        let mut brain = CalculatorBrain::with_seed(1);
        for key in keys {
            match key {
                N(value) => brain.set_operand(*value),
                S(symbol) => brain.perform_operation(symbol),
            }
        }
        brain
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fresh_brain_is_empty() {
        let brain = CalculatorBrain::new();
        assert_eq!(brain.result(), 0.0);
        assert!(!brain.is_partial_result());
        assert_eq!(brain.description(), "");
        assert!(brain.program().is_empty());
    }

    #[test]
    fn chained_binary_operations_associate_left() {
        let brain = run(&[N(3.0), S("+"), N(4.0), S("+"), N(5.0), S("=")]);
        assert_eq!(brain.result(), 12.0);
        assert!(!brain.is_partial_result());
        assert_eq!(brain.description(), "3 + 4 + 5");

        let brain = run(&[N(10.0), S("-"), N(4.0), S("-"), N(3.0), S("=")]);
        assert_eq!(brain.result(), 3.0);
    }

    #[test]
    fn clear_resets_everything_and_is_idempotent() {
        let mut brain = run(&[N(3.0), S("+"), N(4.0), S("√")]);
        brain.perform_operation("C");
        assert_eq!(brain.result(), 0.0);
        assert!(!brain.is_partial_result());
        assert_eq!(brain.description(), "");
        assert!(brain.program().is_empty());

        brain.perform_operation("C");
        assert_eq!(brain.result(), 0.0);
        assert!(brain.program().is_empty());
    }

    #[test]
    fn percent_of_pending_first_operand() {
        let brain = run(&[N(200.0), S("+"), N(50.0), S("%")]);
        assert_eq!(brain.result(), 100.0);
        assert!(brain.is_partial_result());
        assert_eq!(brain.description(), "200 + 50%");

        let mut brain = brain;
        brain.perform_operation("=");
        assert_eq!(brain.result(), 300.0);
    }

    #[test]
    fn percent_without_pending_divides_by_hundred() {
        let brain = run(&[N(50.0), S("%")]);
        assert_eq!(brain.result(), 0.5);
        assert!(!brain.is_partial_result());
        assert_eq!(brain.description(), "50%");
    }

    #[test]
    fn unary_applies_to_accumulator() {
        let brain = run(&[N(0.0), S("cos")]);
        assert_eq!(brain.result(), 1.0);
        assert_eq!(brain.description(), "cos(0)");

        let brain = run(&[N(9.0), S("±")]);
        assert_eq!(brain.result(), -9.0);
        assert_eq!(brain.description(), "-(9)");
    }

    #[test]
    fn division_by_zero_is_infinite() {
        let brain = run(&[N(5.0), S("÷"), N(0.0), S("=")]);
        assert_eq!(brain.result(), f64::INFINITY);
        assert_eq!(brain.description(), "5 ÷ 0");

        let brain = run(&[N(5.0), S("mod"), N(0.0), S("=")]);
        assert!(brain.result().is_nan());
    }

    #[test]
    fn pending_operation_is_visible_until_resolved() {
        let mut brain = run(&[N(7.0), S("+")]);
        assert!(brain.is_partial_result());
        assert_eq!(brain.result(), 7.0);
        assert_eq!(brain.description(), "7 +");
        let pending = brain.pending().expect("pending");
        assert_eq!(pending.symbol, "+");
        assert_eq!(pending.first_operand, 7.0);
        assert!(!pending.second_operand_entered);

        brain.set_operand(9.0);
        assert!(brain.pending().unwrap().second_operand_entered);
        assert_eq!(brain.description(), "7 + 9");
        brain.perform_operation("=");
        assert_eq!(brain.result(), 16.0);
        assert_eq!(brain.description(), "7 + 9");
        assert!(brain.pending().is_none());
    }

    #[test]
    fn unary_after_equals_wraps_whole_expression() {
        let brain = run(&[N(7.0), S("+"), N(9.0), S("="), S("√")]);
        assert_eq!(brain.result(), 4.0);
        assert_eq!(brain.description(), "√(7 + 9)");
        assert!(!brain.is_partial_result());
    }

    #[test]
    fn unary_on_second_operand_wraps_only_that_operand() {
        let mut brain = run(&[N(7.0), S("+"), N(9.0), S("√")]);
        assert_eq!(brain.result(), 3.0);
        assert_eq!(brain.description(), "7 + √(9)");
        assert!(brain.is_partial_result());

        brain.perform_operation("=");
        assert_eq!(brain.result(), 10.0);
        assert_eq!(brain.description(), "7 + √(9)");
    }

    #[test]
    fn unary_without_second_operand_uses_accumulator() {
        let brain = run(&[N(16.0), S("+"), S("√"), S("=")]);
        assert_eq!(brain.result(), 20.0);
        assert_eq!(brain.description(), "16 + √(16)");
    }

    #[test]
    fn operator_after_equals_continues_expression() {
        let brain = run(&[N(7.0), S("+"), N(9.0), S("="), S("+"), N(6.0), S("+"), N(3.0), S("=")]);
        assert_eq!(brain.result(), 25.0);
        assert_eq!(brain.description(), "7 + 9 + 6 + 3");
    }

    #[test]
    fn operand_without_pending_starts_new_expression() {
        let brain = run(&[N(7.0), S("+"), N(9.0), S("="), S("√"), N(6.0), S("+"), N(3.0), S("=")]);
        assert_eq!(brain.result(), 9.0);
        assert_eq!(brain.description(), "6 + 3");
    }

    #[test]
    fn equals_without_second_operand_repeats_accumulator() {
        let brain = run(&[N(7.0), S("+"), S("=")]);
        assert_eq!(brain.result(), 14.0);
        assert_eq!(brain.description(), "7 + 7");
    }

    #[test]
    fn constants_are_described_by_glyph() {
        let brain = run(&[N(4.0), S("×"), S("π"), S("=")]);
        assert_close(brain.result(), 4.0 * std::f64::consts::PI);
        assert_eq!(brain.description(), "4 × π");

        let brain = run(&[S("e"), S("+"), N(1.0), S("=")]);
        assert_close(brain.result(), std::f64::consts::E + 1.0);
        assert_eq!(brain.description(), "e + 1");
    }

    #[test]
    fn multiplication_groups_prior_additive_terms() {
        let brain = run(&[N(4.0), S("+"), N(5.0), S("×"), N(3.0), S("=")]);
        assert_eq!(brain.result(), 27.0);
        assert_eq!(brain.description(), "(4 + 5) × 3");

        let brain = run(&[N(4.0), S("×"), N(5.0), S("+"), N(3.0), S("=")]);
        assert_eq!(brain.result(), 23.0);
        assert_eq!(brain.description(), "4 × 5 + 3");
    }

    #[test]
    fn binary_at_start_uses_zero() {
        let brain = run(&[S("-"), N(3.0), S("=")]);
        assert_eq!(brain.result(), -3.0);
        assert_eq!(brain.description(), "0 - 3");
    }

    #[test]
    fn unknown_symbols_are_logged_but_ignored() {
        let brain = run(&[N(2.0), S("+"), S("frobnicate"), N(3.0), S("=")]);
        assert_eq!(brain.result(), 5.0);
        assert_eq!(brain.description(), "2 + 3");
        assert_eq!(
            brain.program().entries(),
            &[
                ProgramEntry::Operand(2.0),
                ProgramEntry::from("+"),
                ProgramEntry::from("frobnicate"),
                ProgramEntry::Operand(3.0),
                ProgramEntry::from("="),
            ]
        );
    }

    #[test]
    fn random_draws_are_recorded_with_their_value() {
        let brain = run(&[S("rand")]);
        let value = brain.result();
        assert!((0.0..1.0).contains(&value));
        assert_eq!(brain.program().entries(), &[ProgramEntry::Random(value)]);

        let mut replayed = CalculatorBrain::with_seed(99);
        replayed.set_program(brain.program());
        assert_eq!(replayed.result(), value);
        assert_eq!(replayed.description(), brain.description());
    }

    #[test]
    fn seeded_brains_draw_the_same_sequence() {
        let a = run(&[S("rand"), S("+"), S("rand"), S("=")]);
        let b = run(&[S("rand"), S("+"), S("rand"), S("=")]);
        assert_eq!(a.result(), b.result());
    }

    #[test]
    fn program_snapshot_is_independent_of_later_input() {
        let mut brain = run(&[N(3.0), S("+"), N(4.0)]);
        let snapshot = brain.program();
        brain.perform_operation("=");
        brain.perform_operation("C");
        brain.set_operand(99.0);
        assert_eq!(snapshot.len(), 3);

        let mut restored = CalculatorBrain::new();
        restored.set_program(snapshot);
        assert_eq!(restored.result(), 4.0);
        assert!(restored.is_partial_result());
        assert_eq!(restored.description(), "3 + 4");
    }

    #[test]
    fn set_program_discards_previous_state() {
        let mut brain = run(&[N(8.0), S("×")]);
        brain.set_program(Program::from_iter([ProgramEntry::from(2.0), ProgramEntry::from("√")]));
        assert!(!brain.is_partial_result());
        assert_close(brain.result(), std::f64::consts::SQRT_2);
        assert_eq!(brain.description(), "√(2)");
        assert_eq!(brain.program().len(), 2);
    }

    #[test]
    fn changing_number_format_rewrites_description() {
        let mut brain = run(&[N(0.5), S("+"), N(1.25)]);
        assert_eq!(brain.description(), "0.5 + 1.25");
        brain.set_number_format(NumberFormat::for_locale("is").without_grouping());
        assert_eq!(brain.description(), "0,5 + 1,25");
        assert_eq!(brain.result(), 1.25);
        assert!(brain.is_partial_result());
    }

    #[derive(Debug, Clone)]
    enum Step {
        Operand(f64),
        Symbol(&'static str),
    }

    const SYMBOLS: &[&str] = &[
        "+", "-", "×", "÷", "mod", "=", "C", "%", "√", "±", "cos", "sin", "π", "e", "rand", "?",
    ];

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (-1.0e6f64..1.0e6).prop_map(Step::Operand),
            prop::sample::select(SYMBOLS).prop_map(Step::Symbol),
        ]
    }

    fn same_value(a: f64, b: f64) -> bool {
        a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
    }

    proptest! {
        #[test]
        fn replaying_program_reproduces_state(steps in prop::collection::vec(step(), 0..40)) {
            let mut brain = CalculatorBrain::with_seed(7);
            let mut expect_partial = false;
            for s in &steps {
                match s {
                    Step::Operand(value) => brain.set_operand(*value),
                    Step::Symbol(symbol) => {
                        brain.perform_operation(symbol);
                        match *symbol {
                            "+" | "-" | "×" | "÷" | "mod" => expect_partial = true,
                            "=" | "C" => expect_partial = false,
                            _ => {}
                        }
                    }
                }
                prop_assert_eq!(brain.is_partial_result(), expect_partial);
            }

            let mut restored = CalculatorBrain::with_seed(99);
            restored.set_operand(42.0);
            restored.perform_operation("+");
            restored.set_program(brain.program());

            prop_assert!(same_value(restored.result(), brain.result()));
            prop_assert_eq!(restored.is_partial_result(), brain.is_partial_result());
            prop_assert_eq!(restored.description(), brain.description());
            prop_assert_eq!(restored.program(), brain.program());
        }
    }
}
