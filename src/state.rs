use crate::keypad::Keypad;
use crate::number_format::NumberFormat;
use crate::program::Program;
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_VERSION: u32 = 1;

pub struct AppState {
    pub keypad: Keypad,
    pub locale: String,
    pub last_error: Option<String>,
}

/// What the host keeps across activity restarts. Only programs are stored;
/// restoring replays them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub locale: String,
    pub program: Program,
    #[serde(default)]
    pub saved_program: Option<Program>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            keypad: Keypad::new(),
            locale: "en".to_string(),
            last_error: None,
        }
    }

    /// Fresh calculator, same locale.
    pub fn reset_runtime(&mut self) {
        self.keypad = Keypad::new();
        self.keypad
            .set_number_format(NumberFormat::for_locale(&self.locale));
        self.last_error = None;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            locale: self.locale.clone(),
            program: self.keypad.brain().program(),
            saved_program: self.keypad.saved_program().cloned(),
        }
    }

    /// Replays a snapshot. The locale is returned for the caller to apply,
    /// since it also drives the string tables.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<String, String> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(format!("unsupported_snapshot_version:{}", snapshot.version));
        }
        self.keypad.load(snapshot.program, snapshot.saved_program);
        self.last_error = None;
        Ok(snapshot.locale)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
