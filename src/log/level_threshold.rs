use std::{
    collections::HashMap,
    sync::{
        Arc, RwLock,
        atomic::{AtomicU8, Ordering},
    },
};

use crate::{config::Config, log::log_level::LogLevel};

/// Environment variable that overrides the configured default level.
pub const LEVEL_ENV_VAR: &str = "PARAMLOG_LEVEL";

/// Minimum level for one component.
///
/// Reads are a single atomic load, so every logging call can consult the
/// threshold without locking. Writes come from the administrative side
/// ([`ThresholdRegistry`]) and become visible to the next call.
#[derive(Debug)]
pub struct LevelThreshold {
    level: AtomicU8,
}

impl LevelThreshold {
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self {
            level: AtomicU8::new(level.as_u8()),
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    /// Swaps in a new minimum level and returns the previous one.
    pub fn set(&self, level: LogLevel) -> LogLevel {
        LogLevel::from_u8(self.level.swap(level.as_u8(), Ordering::AcqRel))
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.as_u8() >= self.level.load(Ordering::Acquire)
    }
}

impl Default for LevelThreshold {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

/// Named threshold cells, one per component.
///
/// This is the administrative interface for runtime verbosity changes. Loggers
/// keep an `Arc` to their component's cell, so updates made here reach them
/// without any lookup on the logging path.
#[derive(Debug)]
pub struct ThresholdRegistry {
    default: LevelThreshold,
    cells: RwLock<HashMap<String, Arc<LevelThreshold>>>,
}

impl ThresholdRegistry {
    #[must_use]
    pub fn new(default_level: LogLevel) -> Self {
        Self {
            default: LevelThreshold::new(default_level),
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a registry from the `[Logging]` and `[Levels]` sections.
    ///
    /// ```text
    /// [Logging]
    /// level = info
    ///
    /// [Levels]
    /// storage = debug
    /// http = warn
    /// ```
    ///
    /// Unparseable levels are skipped and the default stays in effect for that
    /// component; the skipped keys are returned so the caller can report them.
    #[must_use]
    pub fn from_config(config: &Config) -> (Self, Vec<String>) {
        let mut rejected = Vec::new();

        let default_level = match config.get_non_empty("Logging", "level") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                rejected.push("Logging.level".to_string());
                LogLevel::Info
            }),
            None => LogLevel::Info,
        };

        let registry = Self::new(default_level);
        if let Some(levels) = config.section("Levels") {
            for (component, raw) in levels {
                match raw.parse::<LogLevel>() {
                    Ok(level) => {
                        registry.set_level(component, level);
                    }
                    Err(_) => rejected.push(format!("Levels.{component}")),
                }
            }
        }
        rejected.sort();
        (registry, rejected)
    }

    /// Like [`from_config`](Self::from_config), with `PARAMLOG_LEVEL` taking
    /// precedence over `[Logging] level` when it holds a valid level.
    #[must_use]
    pub fn from_config_and_env(config: &Config) -> (Self, Vec<String>) {
        let (registry, mut rejected) = Self::from_config(config);
        if let Ok(raw) = std::env::var(LEVEL_ENV_VAR) {
            match raw.parse::<LogLevel>() {
                Ok(level) => {
                    registry.default.set(level);
                }
                Err(_) => rejected.push(LEVEL_ENV_VAR.to_string()),
            }
        }
        (registry, rejected)
    }

    #[must_use]
    pub fn default_level(&self) -> LogLevel {
        self.default.get()
    }

    /// Returns the cell for `component`, creating it at the default level.
    pub fn threshold(&self, component: &str) -> Arc<LevelThreshold> {
        if let Ok(cells) = self.cells.read() {
            if let Some(cell) = cells.get(component) {
                return Arc::clone(cell);
            }
        }
        let mut cells = match self.cells.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            cells
                .entry(component.to_string())
                .or_insert_with(|| Arc::new(LevelThreshold::new(self.default.get()))),
        )
    }

    /// Current level for `component` without registering it.
    ///
    /// Unknown components report the default level. Meant for callers that
    /// see arbitrary names, such as records arriving through the `log` crate.
    #[must_use]
    pub fn level_for(&self, component: &str) -> LogLevel {
        let cells = match self.cells.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cells
            .get(component)
            .map_or_else(|| self.default.get(), |cell| cell.get())
    }

    /// Sets the level of one component and returns its previous level.
    pub fn set_level(&self, component: &str, level: LogLevel) -> LogLevel {
        self.threshold(component).set(level)
    }

    /// Sets every known component and the default for future ones.
    pub fn set_all(&self, level: LogLevel) {
        self.default.set(level);
        let cells = match self.cells.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for cell in cells.values() {
            cell.set(level);
        }
    }

    /// Current levels, sorted by component name.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, LogLevel)> {
        let cells = match self.cells.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut out: Vec<_> = cells
            .iter()
            .map(|(name, cell)| (name.clone(), cell.get()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

impl Default for ThresholdRegistry {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}
