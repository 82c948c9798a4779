/// Platform naming for hardware identifiers
///
/// The licensing server has always stored hardware ids in the form
/// `linux_x64_...`, `darwin_arm64_...`, `win32_ia32_...`, so the compile-time
/// target is mapped onto those tokens rather than Rust's own names.

use std::env::consts;

/// Operating system token of the running build.
pub fn platform_name() -> &'static str {
    os_token(consts::OS)
}

/// CPU architecture token of the running build.
pub fn arch_name() -> &'static str {
    arch_token(consts::ARCH)
}

fn os_token(os: &'static str) -> &'static str {
    match os {
        "windows" => "win32",
        "macos" => "darwin",
        "solaris" | "illumos" => "sunos",
        other => other,
    }
}

fn arch_token(arch: &'static str) -> &'static str {
    match arch {
        "x86_64" => "x64",
        "x86" => "ia32",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
