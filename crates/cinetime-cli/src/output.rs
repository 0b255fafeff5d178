use clap::ValueEnum;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Table};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Clone, Copy)]
enum Level {
    Success,
    Error,
    Info,
    Warning,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Info => "info",
            Level::Warning => "warning",
        }
    }
}

/// Every command writes through this, so `--output json` and `--quiet`
/// apply uniformly
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_json(&self) -> bool {
        self.format != OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message(Level::Success, msg.as_ref());
    }

    /// Shown even in quiet mode
    pub fn error(&self, msg: impl AsRef<str>) {
        self.message(Level::Error, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message(Level::Info, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message(Level::Warning, msg.as_ref());
    }

    /// One message per line for each entry in a validation error list
    pub fn errors<S: AsRef<str>>(&self, messages: &[S]) {
        for msg in messages {
            self.error(msg);
        }
    }

    fn message(&self, level: Level, msg: &str) {
        if self.quiet && !matches!(level, Level::Error) {
            return;
        }
        match self.format {
            OutputFormat::Human => match level {
                Level::Success => println!("{} {}", "✓".green(), msg),
                Level::Error => eprintln!("{} {}", "✗".red(), msg),
                Level::Info => println!("{}", msg),
                Level::Warning => println!("{} {}", "⚠".yellow(), msg),
            },
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": level.tag(), "message": msg }));
            }
        }
    }

    /// Structured payload; only printed in the JSON formats
    pub fn data<T: Serialize + ?Sized>(&self, value: &T) {
        if self.quiet || !self.is_json() {
            return;
        }
        match serde_json::to_value(value) {
            Ok(value) => self.print_json(&value),
            Err(e) => self.error(format!("Failed to encode output: {}", e)),
        }
    }

    /// Human-only rendering of a table
    pub fn table(&self, table: &Table) {
        if self.quiet || self.is_json() {
            return;
        }
        println!("{}", table);
    }

    /// Same as [`Output::data`] for JSON, runs `human` otherwise
    pub fn render<T: Serialize + ?Sized>(&self, value: &T, human: impl FnOnce()) {
        if self.is_json() {
            self.data(value);
        } else if !self.quiet {
            human();
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        let text = match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data),
            _ => serde_json::to_string(data),
        };
        println!("{}", text.unwrap_or_default());
    }
}

/// Table with the house style and a bold header row
pub fn styled_table<S: AsRef<str>>(headers: &[S]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h.as_ref()).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}
