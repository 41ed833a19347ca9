use std::str::FromStr;

use tracing::metadata::LevelFilter;
use tracing_subscriber::{
    Layer, filter::FilterFn, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

#[macro_export]
macro_rules! log {
    ($level:expr, $span:expr, $($msg:expr),*) => {{
        let span = $crate::tracing::span!($level, $span);
        let _enter = span.enter();

        $crate::tracing::event!($level, $($msg),*)
    }};
}

/// Bytes written towards the service under test.
#[macro_export]
macro_rules! outgoing {
    (level = $level:ident, $($msg:expr),*) => {
        $crate::log!($crate::tracing::Level::$level, "outgoing", $($msg),*)
    };

    ($($msg:expr),*) => {
        $crate::outgoing!(level = TRACE, $($msg),*)
    };
}

/// Bytes read back from the service under test.
#[macro_export]
macro_rules! incoming {
    (level = $level:ident, $($msg:expr),*) => {
        $crate::log!($crate::tracing::Level::$level, "incoming", $($msg),*)
    };

    ($($msg:expr),*) => {
        $crate::incoming!(level = TRACE, $($msg),*)
    };
}

#[macro_export]
macro_rules! internal {
    (level = $level:ident, $($msg:expr),*) => {
        $crate::log!($crate::tracing::Level::$level, "internal", $($msg),*)
    };

    ($($msg:expr),*) => {
        $crate::internal!(level = TRACE, $($msg),*)
    };
}

/// Default level when neither the caller nor `LOG_LEVEL` picks one.
///
/// The console report goes to stdout, so anything chattier than warnings
/// would interleave with it.
const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Picks the effective level: an explicit request wins, then `LOG_LEVEL`,
/// then [`DEFAULT_LEVEL`].
fn resolve_level(requested: Option<&str>) -> LevelFilter {
    let parse = |level: &str| {
        LevelFilter::from_str(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level specified {level}, defaulting to {DEFAULT_LEVEL}");
            DEFAULT_LEVEL
        })
    };

    match requested {
        Some(level) => parse(level),
        None => std::env::var("LOG_LEVEL").map_or(DEFAULT_LEVEL, |level| parse(&level)),
    }
}

/// Installs the global subscriber. Logs go to stderr so they never mix with
/// the report on stdout.
pub fn init(requested: Option<&str>) {
    let level = resolve_level(requested);

    tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_ansi(true)
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_filter(level)
                .with_filter(FilterFn::new(|metadata| {
                    metadata.target().starts_with("restmail_probe")
                })),
        )
        .init();
}
