/// Expose the compilation target triple as an environment variable at build time.
///
/// `usersync version` prints it alongside the package version.
fn main() {
    println!(
        "cargo:rustc-env=TARGET={}",
        std::env::var("TARGET").unwrap()
    );
}
