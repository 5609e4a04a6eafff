#![allow(dead_code)]


// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    roulette_test_support::logging::init();
}
