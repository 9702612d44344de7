//! Build script for thermograph-simulator
//!
//! On Windows, links against the vendored SDL2 and copies SDL2.dll next to
//! the simulator binary. Other platforms use the system SDL2.

use std::path::{Path, PathBuf};
use std::{env, fs};

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let vendor_sdl2 = manifest_dir.parent().unwrap().join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", vendor_sdl2.display());

    if !vendor_sdl2.exists() {
        println!("cargo:warning=SDL2 vendor directory not found at {}", vendor_sdl2.display());
        println!("cargo:warning=Put SDL2.lib and SDL2.dll in vendor/sdl2/");
        return;
    }

    println!("cargo:rustc-link-search=native={}", vendor_sdl2.display());

    if let Some(profile_dir) = profile_dir() {
        copy_dll(&vendor_sdl2.join("SDL2.dll"), &profile_dir.join("SDL2.dll"));
    }
}

/// `target/<profile>`, found by walking up from OUT_DIR
/// (`target/<profile>/build/<pkg>-<hash>/out`).
fn profile_dir() -> Option<PathBuf> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").ok()?);
    out_dir
        .ancestors()
        .find(|p| p.file_name().is_some_and(|n| n == "release" || n == "debug"))
        .map(Path::to_path_buf)
}

fn copy_dll(
    src: &Path,
    dst: &Path,
) {
    if !src.exists() || dst.exists() {
        return;
    }
    if let Err(e) = fs::copy(src, dst) {
        println!("cargo:warning=Failed to copy SDL2.dll: {e}");
    }
}
