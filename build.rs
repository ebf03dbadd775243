fn main() {
    // Host builds (unit and integration tests) need no ESP-IDF environment.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
