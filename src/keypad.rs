//! Key-press level model of the calculator screen.
//!
//! The host UI forwards taps here; the keypad decides when typed digits
//! become an operand, keeps the display and history lines, and holds the
//! saved program used by the memory keys.

use crate::brain::CalculatorBrain;
use crate::number_format::NumberFormat;
use crate::program::Program;
use log::{debug, warn};

#[derive(Debug, Clone)]
pub struct Keypad {
    brain: CalculatorBrain,
    typing: bool,
    /// Digits typed so far, always with `.` as decimal point.
    buffer: String,
    display: String,
    history: String,
    saved_program: Option<Program>,
    format: NumberFormat,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    pub fn new() -> Self {
        Self::with_brain(CalculatorBrain::new())
    }

    pub fn with_brain(brain: CalculatorBrain) -> Self {
        Self {
            brain,
            typing: false,
            buffer: String::new(),
            display: "0".to_string(),
            history: String::new(),
            saved_program: None,
            format: NumberFormat::for_locale("en"),
        }
    }

    pub fn brain(&self) -> &CalculatorBrain {
        &self.brain
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Description line: `7 + ...` while an operator waits, `7 + 9 =` once
    /// resolved.
    pub fn history(&self) -> &str {
        &self.history
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn saved_program(&self) -> Option<&Program> {
        self.saved_program.as_ref()
    }

    pub fn number_format(&self) -> NumberFormat {
        self.format
    }

    pub fn touch_digit(&mut self, key: char) {
        if !key.is_ascii_digit() && key != '.' {
            debug!("ignoring digit key {key:?}");
            return;
        }
        if self.typing {
            if key == '.' && self.buffer.contains('.') {
                return;
            }
            if self.buffer == "0" && key != '.' {
                self.buffer.clear();
            }
            self.buffer.push(key);
        } else {
            self.start_typing();
            self.buffer = if key == '.' {
                "0.".to_string()
            } else {
                key.to_string()
            };
        }
        self.display = self.render_buffer();
    }

    /// Types a whole number at once, written in the display format.
    /// Returns false when the text is not a number.
    pub fn paste(&mut self, text: &str) -> bool {
        let Some(value) = self.format.parse(text).filter(|v| v.is_finite()) else {
            debug!("rejecting pasted text {text:?}");
            return false;
        };
        self.start_typing();
        self.buffer = value.to_string();
        self.display = self.render_buffer();
        true
    }

    pub fn perform(&mut self, symbol: &str) {
        self.commit_typing();
        self.brain.perform_operation(symbol);
        self.refresh();
    }

    /// Drops the last typed character. Has no effect on computed results.
    pub fn backspace(&mut self) {
        if !self.typing {
            return;
        }
        self.buffer.pop();
        if self.buffer.is_empty() || self.buffer == "-" {
            self.buffer.clear();
            self.typing = false;
            self.display = "0".to_string();
        } else {
            self.display = self.render_buffer();
        }
    }

    pub fn save(&mut self) {
        self.saved_program = Some(self.brain.program());
    }

    pub fn restore(&mut self) -> bool {
        let Some(saved) = self.saved_program.clone() else {
            return false;
        };
        self.load_program(saved);
        true
    }

    pub fn clear_memory(&mut self) {
        self.saved_program = None;
    }

    /// Replaces the whole session, e.g. when the host hands back a snapshot.
    pub fn load(&mut self, program: Program, saved_program: Option<Program>) {
        self.saved_program = saved_program;
        self.load_program(program);
    }

    pub fn set_number_format(&mut self, format: NumberFormat) {
        self.format = format;
        self.brain.set_number_format(format.without_grouping());
        if self.typing {
            self.display = self.render_buffer();
        } else {
            self.refresh();
        }
    }

    fn load_program(&mut self, program: Program) {
        self.brain.set_program(program);
        self.typing = false;
        self.buffer.clear();
        self.refresh();
    }

    fn start_typing(&mut self) {
        if !self.typing && self.history.ends_with('=') {
            self.history.clear();
        }
        self.typing = true;
    }

    fn commit_typing(&mut self) {
        if !self.typing {
            return;
        }
        self.typing = false;
        match self.buffer.parse::<f64>() {
            Ok(value) => self.brain.set_operand(value),
            Err(e) => warn!("dropping typed operand {:?}: {e}", self.buffer),
        }
        self.buffer.clear();
    }

    fn refresh(&mut self) {
        self.display = self.format.format(self.brain.result());
        let description = self.brain.description();
        self.history = if self.brain.is_partial_result() {
            format!("{description} ...")
        } else if description.is_empty() {
            String::new()
        } else {
            format!("{description} =")
        };
    }

    fn render_buffer(&self) -> String {
        self.buffer.replace('.', &self.format.decimal_separator.to_string())
    }
}
