fn main() {
    println!("cargo:rerun-if-env-changed=BATTMON_CONFIG_JSON");

    // ESP-IDF environment (linker args, sysroot) only matters for the
    // firmware binary; host builds of the library skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
