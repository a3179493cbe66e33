//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target for stage headers.
pub(super) const STAGE_TARGET: &str = "plugin_installer::stage";
/// Target for dry-run action lines.
pub(super) const DRY_RUN_TARGET: &str = "plugin_installer::dry_run";

/// Environment variable holding an `EnvFilter` directive for the console,
/// e.g. `PLUGIN_INSTALLER_LOG=debug`. Overrides `--verbose`.
pub const LOG_ENV: &str = "PLUGIN_INSTALLER_LOG";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl MessageExtractor {
    fn of(event: &tracing::Event<'_>) -> String {
        let mut extractor = Self::default();
        event.record(&mut extractor);
        extractor.message
    }
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Plain-text log file line: `[HH:MM:SS]` then a tag for anything that is
/// not an ordinary info message.
fn file_line(level: Level, target: &str, ts: &str, msg: &str) -> String {
    let msg = strip_ansi(msg);
    match (level, target) {
        (Level::INFO, STAGE_TARGET) => format!("[{ts}] ==> {msg}"),
        (Level::INFO, DRY_RUN_TARGET) => format!("[{ts}]     [dry run] {msg}"),
        (Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
        (Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
        (Level::INFO, _) => format!("[{ts}]     {msg}"),
        _ => format!("[{ts}]     [debug] {msg}"),
    }
}

/// Colored console line, without the trailing newline.
fn console_line(level: Level, target: &str, msg: &str) -> String {
    match level {
        Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
        Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        Level::INFO if target == STAGE_TARGET => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        Level::INFO if target == DRY_RUN_TARGET => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
        Level::INFO => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to the
/// per-command log file.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command` in the cache directory.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened; the run then logs to the console only.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::at(&log_file_path(command)?, command)
    }

    /// Truncate `path`, write a header naming the version and `command`, and
    /// return a layer appending to it.
    pub(super) fn at(path: &Path, command: &str) -> Option<Self> {
        let version = option_env!("PLUGIN_INSTALLER_VERSION")
            .unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(60);
        let header = format!(
            "{rule}\nplugin-installer {version} {command}\nstarted {} UTC\n{rule}\n",
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let line = file_line(
            *metadata.level(),
            metadata.target(),
            &format_utc_time(),
            &MessageExtractor::of(event),
        );
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console event formatter.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        writeln!(
            writer,
            "{}",
            console_line(*metadata.level(), metadata.target(), &MessageExtractor::of(event))
        )
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout. The console
/// shows `info` and above (`debug` with `verbose`) unless [`LOG_ENV`] holds a
/// filter directive. Every event, including `debug`, is also written to
/// `$XDG_CACHE_HOME/plugin-installer/<command>.log`.
///
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
