//! Copies the workspace `config.toml` next to the built binary, where
//! `shared::config::load_config` looks for it.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn profile_dir(out_dir: &Path, profile: &str) -> Option<PathBuf> {
    // OUT_DIR is target/<profile>/build/<crate>-<hash>/out
    out_dir
        .ancestors()
        .find(|p| p.ends_with(profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let (Ok(out_dir), Ok(profile)) = (env::var("OUT_DIR"), env::var("PROFILE")) else {
        return;
    };
    let Some(target_dir) = profile_dir(Path::new(&out_dir), &profile) else {
        println!("cargo:warning=target profile directory not found, config.toml not copied");
        return;
    };

    let source_config = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.toml");
    if !source_config.exists() {
        // The embedded default config is used at runtime
        return;
    }

    let dest_config = target_dir.join("config.toml");
    match fs::copy(&source_config, &dest_config) {
        Ok(_) => println!("cargo:warning=Copied config.toml to {:?}", dest_config),
        Err(e) => panic!("Failed to copy config.toml: {}", e),
    }
}
