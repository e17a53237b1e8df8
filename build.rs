fn main() {
    // Stamp the binary with the build date shown by `tornio --version`
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=TORNIO_BUILD_DATE={}", build_date);
    println!("cargo:rerun-if-changed=build.rs");
}
