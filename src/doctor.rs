/*!
 * Environment diagnostics.
 *
 * Runs a fixed set of named checks against a configuration and reports
 * each outcome. The CLI prints the report and exits non-zero when any
 * check failed.
 */

use log::debug;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::app_config::{Config, StorageBackend};
use crate::database::{DatabaseConnection, connection::sqlite_version};
use crate::detector::SensitiveDetector;

/// Probe file written to check that the data directory accepts writes
const PROBE_FILENAME: &str = ".clipkeep-doctor";

/// Outcome of one diagnostic check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Check name
    pub name: &'static str,
    /// Whether the check passed
    pub passed: bool,
    /// What was found
    pub message: String,
}

impl CheckResult {
    /// Create a passing result
    pub fn passed<S: Into<String>>(name: &'static str, message: S) -> Self {
        Self {
            name,
            passed: true,
            message: message.into(),
        }
    }

    /// Create a failing result
    pub fn failed<S: Into<String>>(name: &'static str, message: S) -> Self {
        Self {
            name,
            passed: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { "ok" } else { "FAIL" };
        write!(f, "[{:>4}] {}: {}", mark, self.name, self.message)
    }
}

/// Results of a full diagnostic run
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub results: Vec<CheckResult>,
}

impl DoctorReport {
    /// Whether every check passed
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Number of failed checks
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

/// Run every check against `config`
pub fn run(config: &Config) -> DoctorReport {
    let results = vec![
        check_config(config),
        check_data_dir(config),
        check_sqlite(),
        check_detector(config),
    ];

    debug!(
        "Doctor finished: {} checks, {} failed",
        results.len(),
        results.iter().filter(|r| !r.passed).count()
    );

    DoctorReport { results }
}

fn check_config(config: &Config) -> CheckResult {
    const NAME: &str = "configuration";
    match config.validate() {
        Ok(()) => CheckResult::passed(
            NAME,
            format!("valid ({} backend)", config.storage.backend),
        ),
        Err(e) => CheckResult::failed(NAME, format!("{:#}", e)),
    }
}

fn check_data_dir(config: &Config) -> CheckResult {
    const NAME: &str = "data directory";

    if config.storage.backend == StorageBackend::Memory {
        return CheckResult::passed(NAME, "not used by the memory backend");
    }

    let db_path = match config.storage.resolved_database_path() {
        Ok(path) => path,
        Err(e) => return CheckResult::failed(NAME, format!("{:#}", e)),
    };
    let dir = db_path.parent().unwrap_or_else(|| Path::new("."));

    match probe_writable(dir) {
        Ok(()) => CheckResult::passed(NAME, format!("{:?} is writable", dir)),
        Err(e) => CheckResult::failed(NAME, format!("{:?} is not writable: {}", dir, e)),
    }
}

fn probe_writable(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(PROBE_FILENAME);
    fs::write(&probe, b"ok")?;
    fs::remove_file(&probe)
}

fn check_sqlite() -> CheckResult {
    const NAME: &str = "sqlite";
    match DatabaseConnection::new_in_memory() {
        Ok(_) => CheckResult::passed(NAME, format!("SQLite {} available", sqlite_version())),
        Err(e) => CheckResult::failed(NAME, format!("{:#}", e)),
    }
}

fn check_detector(config: &Config) -> CheckResult {
    const NAME: &str = "detector";
    let detector = SensitiveDetector::new(config.security.max_scan_chars);
    let disabled = detector.disabled_rule_count();

    if disabled > 0 {
        CheckResult::failed(
            NAME,
            format!("{} of {} rules failed to compile", disabled, detector.rule_count() + disabled),
        )
    } else {
        CheckResult::passed(NAME, format!("{} rules compiled", detector.rule_count()))
    }
}
