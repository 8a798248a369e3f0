use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";
const QUIET_CRATES: [&str; 3] = ["hyper=warn", "reqwest=warn", "teloxide=warn"];

fn build_filter() -> EnvFilter {
    QUIET_CRATES
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
            |filter, directive| filter.add_directive(directive),
        )
}

pub fn setup_logger() {
    tracing_subscriber::fmt()
        // .with_file(true)
        // .with_line_number(true)
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(build_filter())
        .init();
}
