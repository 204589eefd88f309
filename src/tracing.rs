use time::{format_description, UtcOffset};
use tracing_subscriber::{fmt, EnvFilter, FmtSubscriber};

const TRACE_VAR: &str = "TRACE";

// Sets up tracing. Goes to stderr, filtered by the TRACE env var, and is off
// when it is unset. Levels are: trace, debug, info, warn, error
//
// EnvFilter syntax is target[span{field=value}]=level, for example:
//
// All targets, info level:                 info
// Template matching only, trace level:     corretagem::nota::template=trace
// Global at warn, apportionment as debug:  warn,corretagem::nota::apportion=debug
//
// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn setup_tracing() {
    let time_offset = crate::util::date::local_utc_offset().unwrap_or(UtcOffset::UTC);
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_env(TRACE_VAR));

    // 5 digits of sub-second precision is plenty to order events.
    let res = match format_description::parse("[hour]:[minute]:[second].[subsecond digits:5]")
    {
        Ok(time_format) => tracing::subscriber::set_global_default(
            builder
                .with_timer(fmt::time::OffsetTime::new(time_offset, time_format))
                .finish(),
        ),
        Err(_) => tracing::subscriber::set_global_default(builder.finish()),
    };
    // Already set up (eg. by an earlier run in the same test binary).
    let _ = res;
}

/// Appends a directive to TRACE, for use before setup_tracing.
pub fn enable_trace_env(directive: &str) {
    match std::env::var(TRACE_VAR) {
        Ok(existing) if !existing.is_empty() => {
            std::env::set_var(TRACE_VAR, existing + "," + directive)
        }
        _ => std::env::set_var(TRACE_VAR, directive),
    }
}
