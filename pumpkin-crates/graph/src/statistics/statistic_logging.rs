//! Process-wide configuration of where and how statistics are written.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

use convert_case::Case;
use convert_case::Casing;

use super::StatisticLogger;
use crate::propagation::GraphPropagator;

struct StatisticOptions {
    /// Statistics are written as `{prefix} {name}={value}`.
    statistic_prefix: &'static str,
    /// Written once after a block of statistics, if present.
    after_statistics: Option<&'static str>,
    statistics_casing: Option<Case>,
    statistics_writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("statistic_prefix", &self.statistic_prefix)
            .field("after_statistics", &self.after_statistics)
            .field("statistics_casing", &self.statistics_casing)
            .finish_non_exhaustive()
    }
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Runs `write` on the options if statistic logging has been configured. A poisoned lock drops
/// the statistic.
fn with_options(write: impl FnOnce(&mut StatisticOptions)) {
    let Some(lock) = STATISTIC_OPTIONS.get() else {
        return;
    };
    if let Ok(mut options) = lock.write() {
        write(&mut options);
    }
}

/// Configures the logging of statistics. Only the first call has an effect; until it is made,
/// statistics are not written at all.
///
/// If no writer is given, statistics are written to stdout.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::from(StatisticOptions {
            statistic_prefix: prefix,
            after_statistics: after,
            statistics_casing: casing,
            statistics_writer: writer.unwrap_or(Box::new(stdout())),
        })
    });
}

/// Logs the statistic `name` with `value` in the format `PREFIX NAME=VALUE`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    with_options(|options| {
        let name = options
            .statistics_casing
            .map_or_else(|| name.to_string(), |casing| name.to_string().to_case(casing));
        let _ = writeln!(
            options.statistics_writer,
            "{} {name}={value}",
            options.statistic_prefix
        );
    });
}

/// Writes the closing line of a block of statistics, if one was configured.
pub fn log_statistic_postfix() {
    with_options(|options| {
        if let Some(postfix) = options.after_statistics {
            let _ = writeln!(options.statistics_writer, "{postfix}");
        }
    });
}

/// Logs the statistics of each propagator under its name, followed by the closing line.
pub fn log_propagator_statistics<Domains: ?Sized>(
    propagators: &[&dyn GraphPropagator<Domains>],
) {
    if !should_log_statistics() {
        return;
    }
    for propagator in propagators {
        propagator.log_statistics(StatisticLogger::new(propagator.name()));
    }
    log_statistic_postfix();
}

/// Returns whether statistic logging has been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
