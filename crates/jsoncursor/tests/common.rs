#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// A short session split at awkward places: inside keywords, right after a
/// keyword (once before its terminator, once before a bad byte), and across a
/// line break.
pub const SESSION: &[&str] = &["nu", "ll tr", "ue\nfal", "se", " null", "x ?"];

/// Routes `tracing` output to the test harness; set `RUST_LOG=jsoncursor=trace`
/// to see every advance.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
