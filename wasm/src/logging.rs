//! Tracing output to the browser console
//!
//! Events are formatted by the `tracing-subscriber` fmt layer and written to
//! the console method matching their level, so storage warnings from the
//! checklist show up in the developer tools.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::LevelFilter, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};
use wasm_bindgen::JsValue;

/// Install the console subscriber; later calls are no-ops
pub fn init() {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false);

    if tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Console logging already installed");
    }
}

/// Builds one [`ConsoleWriter`] per event
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and logs it when dropped
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = console_line(&self.buffer) else {
            return;
        };
        let line = JsValue::from_str(&line);
        match console_method(self.level) {
            ConsoleMethod::Error => web_sys::console::error_1(&line),
            ConsoleMethod::Warn => web_sys::console::warn_1(&line),
            ConsoleMethod::Info => web_sys::console::info_1(&line),
            ConsoleMethod::Debug => web_sys::console::debug_1(&line),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

fn console_method(level: Level) -> ConsoleMethod {
    if level == Level::ERROR {
        ConsoleMethod::Error
    } else if level == Level::WARN {
        ConsoleMethod::Warn
    } else if level == Level::INFO {
        ConsoleMethod::Info
    } else {
        ConsoleMethod::Debug
    }
}

/// The buffered event without its trailing newline, `None` when empty
fn console_line(buffer: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buffer);
    let line = text.trim_end();
    (!line.is_empty()).then(|| line.to_string())
}
