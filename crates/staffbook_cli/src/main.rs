//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `staffbook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    let log_dir = std::env::temp_dir().join("staffbook-logs");
    if let Err(err) = staffbook_core::init_logging(
        staffbook_core::default_log_level(),
        &log_dir.to_string_lossy(),
    ) {
        eprintln!("logging disabled: {err}");
    }
    println!("staffbook_core version={}", staffbook_core::core_version());
}
