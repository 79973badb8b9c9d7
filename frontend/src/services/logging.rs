use std::fmt;

use gloo::console;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Forwards tracing events to the browser console
pub struct ConsoleLayer;

#[derive(Default)]
struct EventFields {
    message: String,
    extra: Vec<String>,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.extra.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.extra.push(format!("{}={:?}", field.name(), value));
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let line = format_line(metadata.level(), metadata.target(), &fields.message, &fields.extra);
        match *metadata.level() {
            Level::ERROR => console::error!(line),
            Level::WARN => console::warn!(line),
            Level::INFO => console::info!(line),
            _ => console::debug!(line),
        }
    }
}

fn format_line(level: &Level, target: &str, message: &str, extra: &[String]) -> String {
    let mut line = format!("[{}] {}: {}", level, target, message);
    if !extra.is_empty() {
        line.push(' ');
        line.push_str(&extra.join(" "));
    }
    line
}

/// Parse a level name, falling back to `info`
pub fn parse_level(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO)
}

/// Install the console subscriber; later calls are ignored
pub fn init(level: LevelFilter) {
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer.with_filter(level))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(&Level::INFO, "milk_ledger_client::query", "cache hit", &[]),
            "[INFO] milk_ledger_client::query: cache hit"
        );
        assert_eq!(
            format_line(&Level::WARN, "app", "save failed", &["household=3".to_string()]),
            "[WARN] app: save failed household=3"
        );
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(Some("debug")), LevelFilter::DEBUG);
        assert_eq!(parse_level(Some(" warn ")), LevelFilter::WARN);
        assert_eq!(parse_level(Some("loud")), LevelFilter::INFO);
        assert_eq!(parse_level(None), LevelFilter::INFO);
    }
}
