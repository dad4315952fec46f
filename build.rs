fn main() {
    // Exposes PKG_VERSION and friends to `crate::built_info`, stamped into saved models
    built::write_built_file().expect("Failed to generate build info");
}
