//! Core of the calculator app.
//!
//! The Android activity sends every tap as a JSON command through
//! [`Java_aeska_calculator_MainActivity_dispatch`] and renders the JSON UI
//! tree it gets back. The arithmetic lives in [`CalculatorBrain`]; the
//! [`Keypad`] turns taps into brain calls and keeps the display lines.

rust_i18n::i18n!("locales", fallback = "en");

pub mod brain;
mod description;
mod features;
mod i18n;
pub mod keypad;
mod logging;
pub mod number_format;
pub mod operations;
pub mod program;
mod router;
mod state;
mod ui;

pub use brain::{CalculatorBrain, PendingBinaryOperation};
pub use keypad::Keypad;
pub use number_format::NumberFormat;
pub use operations::{BinaryOp, Constant, Operation, UnaryOp};
pub use program::{Program, ProgramEntry, ProgramError};

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use std::ptr;

/// Handles one JSON command and returns the JSON answer as text.
pub fn dispatch_json(input: &str) -> String {
    logging::init();
    let response = std::panic::catch_unwind(|| router::dispatch(input));
    let json_value = match response {
        Ok(value) => value,
        Err(_) => router::error_ui("panic"),
    };
    json_value.to_string()
}

#[no_mangle]
pub extern "system" fn Java_aeska_calculator_MainActivity_dispatch(
    mut env: JNIEnv,
    _class: JClass,
    input: JString,
) -> jstring {
    let input_str: String = env
        .get_string(&input)
        .map(|s| s.into())
        .unwrap_or_else(|_| "{}".to_string());

    let output_string = dispatch_json(&input_str);
    match env.new_string(output_string) {
        Ok(java_str) => java_str.into_raw(),
        Err(_) => {
            let fallback = router::error_ui("jni_new_string_failed").to_string();
            env.new_string(fallback)
                .map(|s| s.into_raw())
                .unwrap_or(ptr::null_mut())
        }
    }
}
