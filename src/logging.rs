use tracing_subscriber::EnvFilter;

/// Workspace crate targets that receive log output.
const CRATE_TARGETS: &[&str] = &[
    "rill",
    "rill_evaluate",
    "rill_events",
    "rill_io",
    "rill_plot",
    "rill_runoff",
    "rill_series",
    "rill_stats",
];

/// Filter directives for a `-v` count: none warn, `-v` info, `-vv` debug,
/// `-vvv` and beyond trace.
fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing based on CLI verbosity level.
///
/// Logs go to stderr so that commands printing JSON or CSV to stdout stay
/// pipeable. `RUST_LOG` overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert!(default_filter(0).starts_with("rill=warn,"));
        assert!(default_filter(1).contains("rill_runoff=info"));
        assert!(default_filter(2).contains("rill_events=debug"));
        assert!(default_filter(7).ends_with("rill_stats=trace"));
    }
}
