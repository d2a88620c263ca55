//! Installs the global subscriber, so it lives in its own test binary.

use vault::telemetry::init_telemetry;

#[test]
fn second_init_fails_instead_of_panicking() {
    init_telemetry("warn", None).unwrap();
    assert!(init_telemetry("warn", None).is_err());
}
