use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::{Path, PathBuf};

use super::devlog::DEV_TARGET;

/// Target for mutation audit records.
pub const AUDIT_TARGET: &str = "litedoc::audit";

const ENCODER_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_RETENTION: u32 = 7;

/// Initializes logging from `log4rs.yaml` in the working directory, if present.
///
/// # Errors
/// Returns an error if the file exists but cannot be loaded.
pub fn init() -> Result<(), Box<dyn Error>> {
    init_path(Path::new("log4rs.yaml"))
}

/// # Errors
/// Returns an error if the file exists but cannot be loaded.
pub fn init_path(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        log4rs::init_file(path, log4rs::config::Deserializers::default())?;
    }
    Ok(())
}

#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, name: &str, keep: u32) -> Result<RollingFileAppender, Box<dyn Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{name}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE_BYTES)), Box::new(roller));
    Ok(RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODER_PATTERN)))
        .build(base.join(format!("{name}.log")), Box::new(policy))?)
}

/// Builds the file logging config: `app.log` for everything, `audit.log` for
/// [`AUDIT_TARGET`], and `dev.log` for developer traces when `dev_trace` is set.
///
/// # Errors
/// Returns an error if the directory cannot be created or an appender fails to build.
pub fn build_file_config(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    dev_trace: bool,
) -> Result<Config, Box<dyn Error>> {
    let base = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&base)?;
    let keep = retention.map_or(DEFAULT_RETENTION, |r| u32::try_from(r).unwrap_or(u32::MAX));
    let lvl = parse_level(level.unwrap_or("info"));

    let mut builder = Config::builder()
        .appender(Appender::builder().build("app", Box::new(rolling(&base, "app", keep)?)))
        .appender(Appender::builder().build("audit", Box::new(rolling(&base, "audit", keep)?)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, LevelFilter::Info));
    builder = if dev_trace {
        builder
            .appender(Appender::builder().build("dev", Box::new(rolling(&base, "dev", keep)?)))
            .logger(Logger::builder().appender("dev").additive(false).build(DEV_TARGET, LevelFilter::Trace))
    } else {
        builder.logger(Logger::builder().additive(false).build(DEV_TARGET, LevelFilter::Off))
    };
    Ok(builder.build(Root::builder().appender("app").build(lvl))?)
}

/// Installs file logging for the process. A logger that is already installed stays in
/// place.
///
/// # Errors
/// Returns an error if the config cannot be built.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    dev_trace: bool,
) -> Result<(), Box<dyn Error>> {
    let config = build_file_config(dir, level, retention, dev_trace)?;
    if let Err(e) = log4rs::init_config(config) {
        log::debug!("logger already installed: {e}");
    }
    Ok(())
}

/// Stderr logging for the command-line tool; audit records are dropped.
///
/// # Errors
/// Returns an error if the config cannot be built.
pub fn configure_console(level: &str) -> Result<(), Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(Logger::builder().additive(false).build(AUDIT_TARGET, LevelFilter::Off))
        .build(Root::builder().appender("stderr").build(parse_level(level)))?;
    if let Err(e) = log4rs::init_config(config) {
        log::debug!("logger already installed: {e}");
    }
    Ok(())
}

/// Writes one JSON audit record for a document mutation.
pub fn log_audit(op: &str, collection: &str, doc_id: &str) {
    let line = serde_json::json!({ "op": op, "collection": collection, "doc_id": doc_id });
    log::info!(target: AUDIT_TARGET, "{line}");
}
