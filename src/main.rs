//! Profile Sort Frontend Entry Point

mod app;
mod components;
mod context;
mod editor;
mod page;
mod store;

use std::sync::Arc;

use app::App;
use leptos::prelude::*;
use rolling_logger::{LogRecord, LogSink, DEFAULT_CAPACITY};
use tracing::level_filters::LevelFilter;
use tracing::Level;

fn console_sink() -> LogSink {
    Arc::new(|record: &LogRecord| {
        let line = wasm_bindgen::JsValue::from(record.to_string());
        if record.level == Level::ERROR {
            web_sys::console::error_1(&line);
        } else if record.level == Level::WARN {
            web_sys::console::warn_1(&line);
        } else {
            web_sys::console::log_1(&line);
        }
    })
}

fn main() {
    console_error_panic_hook::set_once();

    let logs = match rolling_logger::init_logger(LevelFilter::DEBUG, DEFAULT_CAPACITY, Some(console_sink())) {
        Ok(logs) => Some(logs),
        Err(e) => {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
            None
        }
    };

    mount_to_body(move || {
        if let Some(logs) = logs.clone() {
            provide_context(logs);
        }
        view! { <App /> }
    });
}
