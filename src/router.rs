use crate::features::calculator::{handle_calculator_action, render_calculator_screen, CalcAction};
use crate::i18n::update_locale;
use crate::state::{AppState, Snapshot};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

static STATE: OnceLock<Mutex<AppState>> = OnceLock::new();

#[derive(Deserialize)]
pub(crate) struct Command {
    action: String,
    error: Option<String>,
    bindings: Option<HashMap<String, String>>,
    snapshot: Option<String>,
    locale: Option<String>,
}

#[derive(Debug)]
enum Action {
    Init { locale: Option<String> },
    Reset,
    SetLocale { locale: String },
    Calculator(CalcAction),
    Snapshot,
    Restore { snapshot: String },
}

fn parse_action(command: Command) -> Result<Action, String> {
    let Command {
        action,
        error,
        bindings,
        snapshot,
        locale,
    } = command;

    let bindings = bindings.unwrap_or_default();

    match action.as_str() {
        "init" => Ok(Action::Init { locale }),
        "reset" => Ok(Action::Reset),
        "set_locale" => locale
            .or_else(|| bindings.get("locale").cloned())
            .ok_or_else(|| "missing_locale".to_string())
            .map(|locale| Action::SetLocale { locale }),
        "calc_backspace" => Ok(Action::Calculator(CalcAction::Backspace)),
        "calc_paste" => Ok(Action::Calculator(CalcAction::Paste(
            bindings.get("clipboard").cloned(),
        ))),
        "calc_save" => Ok(Action::Calculator(CalcAction::Save)),
        "calc_restore" => Ok(Action::Calculator(CalcAction::Restore)),
        "calc_clear_memory" => Ok(Action::Calculator(CalcAction::ClearMemory)),
        "snapshot" => Ok(Action::Snapshot),
        "restore_state" => snapshot
            .ok_or_else(|| "missing_snapshot".to_string())
            .map(|snap| Action::Restore { snapshot: snap }),
        other => {
            if let Some(key) = other.strip_prefix("calc_digit:") {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(digit), None) => Ok(Action::Calculator(CalcAction::Digit(digit))),
                    _ => Err(format!("invalid_digit:{key}")),
                }
            } else if let Some(symbol) = other.strip_prefix("calc_op:") {
                Ok(Action::Calculator(CalcAction::Operation(symbol.to_string())))
            } else {
                Err(error.unwrap_or_else(|| format!("unknown_action:{other}")))
            }
        }
    }
}

fn lock_state() -> std::sync::MutexGuard<'static, AppState> {
    let state = STATE.get_or_init(|| Mutex::new(AppState::new()));
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("state lock was poisoned; continuing with last state");
            poisoned.into_inner()
        }
    }
}

/// Entry point shared by the JNI export: one JSON command in, one UI tree out.
pub fn dispatch(input: &str) -> Value {
    let command: Command = match serde_json::from_str(input) {
        Ok(command) => command,
        Err(e) => {
            warn!("rejecting command: {e}");
            return error_ui("invalid_json");
        }
    };
    match handle_command(command) {
        Ok(value) => value,
        Err(err) => error_ui(&err),
    }
}

pub(crate) fn handle_command(command: Command) -> Result<Value, String> {
    let mut state = lock_state();

    let action = match parse_action(command) {
        Ok(action) => action,
        Err(err) => {
            warn!("command rejected: {err}");
            state.last_error = Some(err);
            return Ok(render_ui(&state));
        }
    };
    debug!("dispatching {action:?}");

    match action {
        Action::Init { locale } => {
            if let Some(locale) = locale {
                update_locale(&mut state, &locale);
            }
        }
        Action::Reset => state.reset_runtime(),
        Action::SetLocale { locale } => update_locale(&mut state, &locale),
        Action::Calculator(action) => handle_calculator_action(&mut state, action),
        Action::Snapshot => {
            let snap = serde_json::to_string(&state.snapshot())
                .map_err(|e| format!("snapshot_failed:{e}"))?;
            return Ok(json!({
                "type": "Snapshot",
                "snapshot": snap
            }));
        }
        Action::Restore { snapshot } => {
            let restored = serde_json::from_str::<Snapshot>(&snapshot)
                .map_err(|e| format!("restore_failed:{e}"))
                .and_then(|snap| state.restore(snap));
            match restored {
                Ok(locale) => update_locale(&mut state, &locale),
                Err(e) => {
                    warn!("snapshot not restored: {e}");
                    state.last_error = Some(e);
                }
            }
        }
    }

    Ok(render_ui(&state))
}

fn render_ui(state: &AppState) -> Value {
    render_calculator_screen(state)
}

pub(crate) fn error_ui(message: &str) -> Value {
    json!({
        "type": "Column",
        "padding": 24,
        "children": [
            { "type": "Text", "text": "Error", "size": 18.0 },
            { "type": "Text", "text": message }
        ]
    })
}
