use crate::config::{LoggingConfig, Section};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// true when `target` is `subsystem` or lives under `subsystem::`
fn matches_subsystem(target: &str, subsystem: &str) -> bool {
    target == subsystem
        || (target.starts_with(subsystem) && target[subsystem.len()..].starts_with("::"))
}

/// Everything that no explicit subsystem claims, up to `max_level`.
fn default_filter(
    subsystems: Vec<String>,
    max_level: Level,
) -> FilterFn<impl Fn(&tracing::Metadata<'_>) -> bool> {
    FilterFn::new(move |meta: &tracing::Metadata<'_>| {
        let t = meta.target();
        if subsystems.iter().any(|s| matches_subsystem(t, s)) {
            return false;
        }
        meta.level() <= &max_level
    })
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer(section: &Section, base_dir: &Path) -> std::io::Result<RotWriter> {
    let log_path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let file_limit = match section.max_backups {
        Some(n) => FileLimit::MaxFiles(n),
        None => FileLimit::Age(chrono::Duration::days(
            i64::from(section.max_age_days.unwrap_or(7)),
        )),
    };

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(file_limit),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn file_writer_for(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }
    match create_rotating_writer(section, base_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                resolve_log_path(&section.file, base_dir).display(),
                e
            );
            None
        }
    }
}

// -------- public init --------

/// Install the global subscriber.
///
/// Each non-"default" key of `cfg` is a target prefix (e.g. `doctor_directory`)
/// with its own console/file levels and optional file; the "default" section
/// covers every other target. Console output is human-readable, files get JSON.
/// Relative file paths resolve against `base_dir` (normally `server.home_dir`).
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let _ = Registry::default().with(build_layers(cfg, base_dir)).try_init();
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let ansi = atty::is(atty::Stream::Stdout);
    let subsystems: Vec<(&String, &Section)> =
        cfg.iter().filter(|(k, _)| k.as_str() != "default").collect();
    let names: Vec<String> = subsystems.iter().map(|(n, _)| (*n).clone()).collect();

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    let mut file_writers: HashMap<String, (RotWriter, Level)> = HashMap::new();
    for (name, section) in &subsystems {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            console_targets = console_targets.with_target((*name).clone(), level);
        }
        if let (Some(writer), Some(level)) = (
            file_writer_for(name, section, base_dir),
            parse_tracing_level(&section.file_level),
        ) {
            file_writers.insert((*name).clone(), (writer, level));
        }
    }

    layers.push(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(console_targets)
            .boxed(),
    );

    for (name, (writer, level)) in file_writers {
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(Targets::new().with_target(name, level))
                .boxed(),
        );
    }

    if let Some(default_section) = cfg.get("default") {
        if let Some(level) = parse_tracing_level(&default_section.console_level) {
            layers.push(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_filter(default_filter(names.clone(), level))
                    .boxed(),
            );
        }
        if let (Some(writer), Some(level)) = (
            file_writer_for("default", default_section, base_dir),
            parse_tracing_level(&default_section.file_level),
        ) {
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(writer)
                    .with_filter(default_filter(names, level))
                    .boxed(),
            );
        }
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(file: &str) -> Section {
        Section {
            console_level: "info".into(),
            file: file.into(),
            file_level: "debug".into(),
            max_age_days: Some(7),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("bogus"), Some(Level::INFO));
    }

    #[test]
    fn test_subsystem_prefix_matching() {
        assert!(matches_subsystem("doctor_directory", "doctor_directory"));
        assert!(matches_subsystem(
            "doctor_directory::domain::service",
            "doctor_directory"
        ));
        assert!(!matches_subsystem("doctor_directory_extra", "doctor_directory"));
        assert!(!matches_subsystem("api_ingress", "doctor_directory"));
    }

    #[test]
    fn test_file_paths_resolved_against_home_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = tmp.path().join("abs.log");
        assert_eq!(resolve_log_path(abs.to_str().unwrap(), Path::new("/ignored")), abs);
    }

    #[test]
    fn test_rotating_writer_creates_parent_dir() {
        let tmp = tempdir().unwrap();
        let writer = create_rotating_writer(&section("nested/dir/app.log"), tmp.path());
        assert!(writer.is_ok());
        assert!(tmp.path().join("nested/dir").is_dir());
    }

    #[test]
    fn test_empty_file_disables_file_sink() {
        let tmp = tempdir().unwrap();
        assert!(file_writer_for("x", &section("  "), tmp.path()).is_none());
    }

    #[test]
    fn test_layers_built_for_default_and_subsystem() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("doctor_directory".into(), section("logs/doctors.log"));

        // console(subsystems) + doctors file + default console + default file
        let layers = build_layers(&cfg, tmp.path());
        assert_eq!(layers.len(), 4);
        assert!(tmp.path().join("logs").is_dir());
    }
}
