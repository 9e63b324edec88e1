use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=ARECASCAN_VERSION");
    let version = env::var("ARECASCAN_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rustc-env=ARECASCAN_VERSION={version}");
}
