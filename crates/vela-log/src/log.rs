use std::{
    io::Write,
    sync::OnceLock,
};

use core::str::FromStr;

use termcolor::{WriteColor, StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use rustc_hash::FxHashMap;

use compact_str::CompactString;

use parking_lot::Mutex;

use vela_mem::DynArray;

use crate::*;

use crate::fmt::SegmentSpec;

/// Handle to a format registered with [`custom_fmt`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CustomFmt(usize);

impl CustomFmt {

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Level {
    Always = -1,
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

pub enum LevelFmt {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Other(CustomFmt, Level),
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

/// Per-module level filters parsed from a `RUST_LOG` style directive list.
pub struct Filters {
    target_levels: FxHashMap<CompactString, Level>,
    base_level: Level,
}

impl Default for Filters {

    fn default() -> Self {
        Self {
            target_levels: FxHashMap::default(),
            base_level: Level::Error,
        }
    }
}

impl Filters {

    /// Parses comma-separated `level` and `module=level` entries. Unknown levels are
    /// ignored; a module listed twice keeps its less verbose level.
    pub fn parse(directives: &str) -> Self {
        let mut filters = Self::default();
        for arg in directives.split(',') {
            let (module, level) = match arg.find('=') {
                Some(j) => (Some(arg[..j].trim()), arg[j + 1..].trim()),
                None => (None, arg.trim()),
            };
            let Ok(level) = Level::from_str(level) else {
                continue
            };
            match module {
                Some(module) => {
                    let entry = filters.target_levels
                        .entry(CompactString::new(module))
                        .or_insert(level);
                    *entry = (*entry).min(level);
                },
                None => filters.base_level = level,
            }
        }
        filters
    }

    /// Level of the closest configured ancestor of `target`, or the base level.
    pub fn target_level(&self, target: &str) -> Level {
        let mut substr = target;
        if let Some(&level) = self.target_levels.get(substr) {
            return level
        }
        while let Some(i) = substr.rfind("::") {
            substr = &substr[..i];
            if let Some(&level) = self.target_levels.get(substr) {
                return level
            }
        }
        self.base_level
    }
}

struct Logger {
    stderr: StandardStream,
    info_fmt: LogFmt,
    warn_fmt: LogFmt,
    error_fmt: LogFmt,
    debug_fmt: LogFmt,
    trace_fmt: LogFmt,
    custom_fmt: DynArray<LogFmt>,
    filters: Filters,
}

impl Logger {

    #[inline(always)]
    fn new() -> Self {
        let filters = std::env::var("RUST_LOG")
            .map(|env| Filters::parse(&env))
            .unwrap_or_default();
        Self {
            stderr: StandardStream::stderr(ColorChoice::Auto),
            info_fmt: LogFmt::leveled("INFO", Color::Green),
            warn_fmt: LogFmt::leveled("WARN", Color::Yellow),
            error_fmt: LogFmt::leveled("ERROR", Color::Red),
            debug_fmt: LogFmt::leveled("DEBUG", Color::Blue),
            trace_fmt: LogFmt::leveled("TRACE", Color::Magenta),
            custom_fmt: DynArray::new(),
            filters,
        }
    }

    fn log(&mut self, target: &str, level: LevelFmt, msg: core::fmt::Arguments) -> Result<bool> {
        let target_level = self.filters.target_level(target);
        let (fmt, level) = match level {
            LevelFmt::Error => (&self.error_fmt, Level::Error),
            LevelFmt::Warn => (&self.warn_fmt, Level::Warn),
            LevelFmt::Info => (&self.info_fmt, Level::Info),
            LevelFmt::Debug => (&self.debug_fmt, Level::Debug),
            LevelFmt::Trace => (&self.trace_fmt, Level::Trace),
            LevelFmt::Other(fmt, level) => {
                let fmt = self.custom_fmt
                    .get(fmt.index())
                    .ok_or(LogError::UnknownFormat(fmt))?;
                (fmt, level)
            },
        };
        if target_level < level {
            return Ok(false)
        }
        for segment in fmt {
            match segment {
                SegmentSpec::Message(log_spec) => {
                    if let Some(color_spec) = &log_spec.color_spec {
                        self.stderr.set_color(color_spec)?;
                        write!(self.stderr, "{}", msg)?;
                        self.stderr.reset()?;
                    } else {
                        write!(self.stderr, "{}", msg)?;
                    }
                },
                SegmentSpec::Text(text, log_spec) => {
                    if let Some(color_spec) = &log_spec.color_spec {
                        self.stderr.set_color(color_spec)?;
                        self.stderr.write_all(text.as_bytes())?;
                        self.stderr.reset()?;
                    } else {
                        self.stderr.write_all(text.as_bytes())?;
                    }
                },
            }
        }
        self.stderr.write_all(b"\n")?;
        Ok(true)
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Installs the global logger, reading filters from `RUST_LOG`. Later calls do nothing.
pub fn init() {
    LOGGER.get_or_init(|| Mutex::new(Logger::new()));
}

#[inline(always)]
fn with_logger<R>(f: impl FnOnce(&mut Logger) -> R) -> Option<R> {
    LOGGER.get().map(|logger| f(&mut logger.lock()))
}

#[inline(always)]
pub fn error_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.error_fmt)));
}

#[inline(always)]
pub fn warn_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.warn_fmt)));
}

#[inline(always)]
pub fn info_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.info_fmt)));
}

#[inline(always)]
pub fn debug_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.debug_fmt)));
}

#[inline(always)]
pub fn trace_fmt(mut f: impl FnMut(&mut LogFmtBuilder)) {
    with_logger(|logger| f(&mut LogFmtBuilder::new(&mut logger.trace_fmt)));
}

/// Registers a custom format for use with [`LevelFmt::Other`].
///
/// Returns `Ok(None)` if the logger has not been initialized.
pub fn custom_fmt(fmt: LogFmt) -> Result<Option<CustomFmt>> {
    with_logger(|logger| -> Result<CustomFmt> {
        let index = logger.custom_fmt.len();
        logger.custom_fmt.push_back(fmt)?;
        Ok(CustomFmt(index))
    })
    .transpose()
}

/// Writes one record. Returns `Ok(false)` when the record was filtered out or the
/// logger has not been initialized.
#[inline(always)]
pub fn log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    with_logger(|logger| logger.log(target, level, args))
        .unwrap_or(Ok(false))
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(Level::from_str("INFO"), Ok(Level::Info));
        assert_eq!(Level::from_str("trace"), Ok(Level::Trace));
        assert_eq!(Level::from_str("loud"), Err(()));
    }

    #[test]
    fn base_level_defaults_to_error() {
        let filters = Filters::parse("");
        assert_eq!(filters.target_level("vela_mem"), Level::Error);
    }

    #[test]
    fn module_filters_apply_to_children() {
        let filters = Filters::parse("warn, vela_mem=trace ,vela_log::fmt=debug");
        assert_eq!(filters.target_level("vela_mem::vec_types"), Level::Trace);
        assert_eq!(filters.target_level("vela_log::fmt"), Level::Debug);
        assert_eq!(filters.target_level("vela_log"), Level::Warn);
        assert_eq!(filters.target_level("other"), Level::Warn);
    }

    #[test]
    fn repeated_module_keeps_quieter_level() {
        let filters = Filters::parse("app=trace,app=info,app=bogus");
        assert_eq!(filters.target_level("app"), Level::Info);
    }
}
