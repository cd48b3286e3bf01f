use crate::operations::{Operation, KEYPAD_SYMBOLS};
use crate::state::AppState;
use crate::ui::{node, Button as UiButton, Column as UiColumn, Grid as UiGrid, Text as UiText};
use rust_i18n::t;
use serde_json::Value;

const DIGIT_KEYS: [char; 11] = ['7', '8', '9', '4', '5', '6', '1', '2', '3', '0', '.'];

#[derive(Debug, Clone, PartialEq)]
pub enum CalcAction {
    Digit(char),
    Operation(String),
    Backspace,
    Paste(Option<String>),
    Save,
    Restore,
    ClearMemory,
}

pub fn render_calculator_screen(state: &AppState) -> Value {
    let keypad = &state.keypad;
    let title = t!("calculator.title");
    let history = if keypad.history().is_empty() {
        " "
    } else {
        keypad.history()
    };

    let mut children = vec![
        node(UiText::new(&title).size(20.0)),
        node(UiText::new(history).size(14.0).content_description("history")),
        node(UiText::new(keypad.display()).size(40.0).content_description("display")),
    ];

    let backspace = t!("calculator.backspace");
    let mut digits: Vec<Value> = DIGIT_KEYS
        .iter()
        .map(|key| {
            let label = key.to_string();
            node(UiButton::new(&label, format!("calc_digit:{key}")))
        })
        .collect();
    digits.push(node(UiButton::new(&backspace, "calc_backspace").id("key_backspace")));
    children.push(node(UiGrid::new(3, digits)));

    // The waiting operator stays highlighted until it is resolved.
    let pending = keypad.brain().pending().and_then(|p| Operation::lookup(&p.symbol));
    let operators: Vec<Value> = KEYPAD_SYMBOLS
        .iter()
        .map(|symbol| {
            let mut button = UiButton::new(symbol, format!("calc_op:{symbol}"));
            if pending.is_some() && Operation::lookup(symbol) == pending {
                button = button.content_description("selected");
            }
            node(button)
        })
        .collect();
    children.push(node(UiGrid::new(4, operators)));

    let save = t!("calculator.save");
    let restore = t!("calculator.restore");
    let clear_memory = t!("calculator.clear_memory");
    let mut memory = vec![node(UiButton::new(&save, "calc_save").id("memory_save"))];
    if keypad.saved_program().is_some() {
        memory.push(node(UiButton::new(&restore, "calc_restore").id("memory_restore")));
        memory.push(node(
            UiButton::new(&clear_memory, "calc_clear_memory").id("memory_clear"),
        ));
    }
    children.push(node(UiGrid::new(3, memory)));

    if let Some(err) = &state.last_error {
        let line = t!("calculator.error", message = err);
        children.push(node(UiText::new(&line).size(12.0).content_description("error")));
    }

    node(UiColumn::new(children).padding(20))
}

pub fn handle_calculator_action(state: &mut AppState, action: CalcAction) {
    let keypad = &mut state.keypad;
    match action {
        CalcAction::Digit(key) => keypad.touch_digit(key),
        CalcAction::Operation(symbol) => keypad.perform(&symbol),
        CalcAction::Backspace => keypad.backspace(),
        CalcAction::Paste(text) => {
            let accepted = text.as_deref().is_some_and(|pasted| keypad.paste(pasted));
            if !accepted {
                state.last_error = Some("paste_not_a_number".into());
                return;
            }
        }
        CalcAction::Save => keypad.save(),
        CalcAction::Restore => {
            if !keypad.restore() {
                state.last_error = Some("nothing_saved".into());
                return;
            }
        }
        CalcAction::ClearMemory => keypad.clear_memory(),
    }
    state.last_error = None;
}
