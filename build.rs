use std::{env, fs::File, io::prelude::*, path::PathBuf};

fn main() {
    check_device_feature();
    if cfg!(feature = "ld") {
        gen_memory_x();
    }
    println!("cargo:rerun-if-changed=build.rs");
}

/// Check device feature selection
///
/// Without a chip feature only the device independent parts of the crate
/// (line ownership, dispatch, the register simulator) are built. That is what
/// host side tests use, so it is reported but not rejected.
fn check_device_feature() {
    if cfg!(feature = "device-selected") {
        return;
    }

    if cfg!(feature = "direct-call-deprecated") {
        eprintln!(
            "The feature you selected is too coarse, it has to name the sub-device.

Example: The STM32F3Discovery board has a STM32F303VCT6 chip.
Use `stm32f303xc` instead of `stm32f303`."
        );
        std::process::exit(1);
    }

    println!(
        "cargo:warning=No chip feature selected (e.g. `stm32f303xc`): \
         building the device independent core only."
    );
}

/// Generate `memory.x` for selected device
///
/// Available RAM/CCMRAM/FLASH value is extracted from RM0313/RM0316/RM0364/RM0365/RM0366
fn gen_memory_x() {
    // (feature, flash KiB)
    const FLASH: [(&str, u32); 7] = [
        ("CARGO_FEATURE_MEM_4", 16),
        ("CARGO_FEATURE_MEM_6", 32),
        ("CARGO_FEATURE_MEM_8", 64),
        ("CARGO_FEATURE_MEM_B", 128),
        ("CARGO_FEATURE_MEM_C", 256),
        ("CARGO_FEATURE_MEM_D", 384),
        ("CARGO_FEATURE_MEM_E", 512),
    ];

    let flash = match FLASH.iter().find(|(var, _)| env::var_os(var).is_some()) {
        Some(&(_, flash)) => flash,
        None => {
            eprintln!("Memory size unknown, the `ld` feature needs a chip feature.");
            std::process::exit(1);
        }
    };

    let f303_like = cfg!(feature = "svd-f303") || cfg!(feature = "svd-f3x4");
    let ccmram = match flash {
        _ if !f303_like => 0,
        16 | 32 | 64 => 4,
        128 | 256 => 8,
        _ => 16,
    };

    let ram = match flash {
        16 | 32 | 64 => 16,
        128 if cfg!(feature = "svd-f373") => 24,
        128 if cfg!(feature = "svd-f302") => 32,
        256 if cfg!(feature = "svd-f373") => 32,
        128 if cfg!(feature = "svd-f303") => 40,
        256 if cfg!(feature = "svd-f302") => 40,
        256 if cfg!(feature = "svd-f303") => 48,
        384 | 512 if cfg!(feature = "svd-f302") => 64,
        384 | 512 if cfg!(feature = "svd-f303") => 80,
        _ => {
            eprintln!("RAM size unknown for the selected chip feature.");
            std::process::exit(1);
        }
    } - ccmram;

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let mut file = File::create(out_dir.join("memory.x")).expect("memory.x is writable");
    let mut layout = format!("MEMORY {{\n    FLASH (rx) : o = 0x8000000, l = {}K\n", flash);
    if ccmram > 0 {
        layout += &format!("    CCMRAM (rwx) : o = 0x10000000, l = {}K\n", ccmram);
    }
    layout += &format!("    RAM (rwx) : o = 0x20000000, l = {}K\n}}\n", ram);
    file.write_all(layout.as_bytes())
        .expect("memory.x is writable");
    println!("cargo:rustc-link-search={}", out_dir.display());
}
