use std::io;
use tracing::Level;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Collects one formatted event and hands it to `console.log` when flushed
/// or dropped. The fmt layer makes a fresh writer per event.
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let line = String::from_utf8_lossy(&self.buf);
            console::log_1(&JsValue::from_str(line.trim_end()));
            self.buf.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

/// `POLL_LOG_LEVEL` at build time; unset or unparsable means `info`.
fn max_level(raw: Option<&str>) -> Level {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(Level::INFO)
}

/// Installs the console subscriber. Timestamps are off: `SystemTime` is not
/// available on wasm32.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .with_max_level(max_level(option_env!("POLL_LOG_LEVEL")))
        .with_ansi(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_info() {
        assert_eq!(max_level(None), Level::INFO);
        assert_eq!(max_level(Some("chatty")), Level::INFO);
    }

    #[test]
    fn level_parses_any_case() {
        assert_eq!(max_level(Some("debug")), Level::DEBUG);
        assert_eq!(max_level(Some(" WARN ")), Level::WARN);
        assert_eq!(max_level(Some("trace")), Level::TRACE);
    }
}
