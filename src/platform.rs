//! Host platform identification and bundling metadata.
//!
//! Detection logic branches on [`Platform`] values rather than `cfg!` so the
//! coordinator can be driven as if it were running on another OS in tests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Suffix appended to executable names on this platform.
    pub fn exe_suffix(self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        };
        f.write_str(name)
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Detect the current architecture. Anything that is not aarch64 is
    /// treated as x64; unsupported hosts fall out at [`BundleTarget`].
    pub fn current() -> Option<Self> {
        if cfg!(target_arch = "aarch64") {
            Some(Arch::Arm64)
        } else if cfg!(target_arch = "x86_64") {
            Some(Arch::X64)
        } else {
            None
        }
    }
}

/// The five supported OS/CPU combinations that ship a bundled runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BundleTarget {
    #[serde(rename = "darwin-arm64")]
    DarwinArm64,
    #[serde(rename = "darwin-x64")]
    DarwinX64,
    #[serde(rename = "linux-x64")]
    LinuxX64,
    #[serde(rename = "linux-arm64")]
    LinuxArm64,
    #[serde(rename = "win32-x64")]
    Win32X64,
}

/// Static metadata for one bundle target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleInfo {
    /// Directory under the bundled resources (e.g. `darwin-arm64`).
    pub dir_name: &'static str,
    /// Executable file name inside that directory.
    pub bun_executable: &'static str,
    /// Upstream release asset name, without the `.zip` extension.
    pub bun_asset: &'static str,
}

const BUNDLE_INFO: &[(BundleTarget, BundleInfo)] = &[
    (
        BundleTarget::DarwinArm64,
        BundleInfo {
            dir_name: "darwin-arm64",
            bun_executable: "bun",
            bun_asset: "bun-darwin-aarch64",
        },
    ),
    (
        BundleTarget::DarwinX64,
        BundleInfo {
            dir_name: "darwin-x64",
            bun_executable: "bun",
            bun_asset: "bun-darwin-x64",
        },
    ),
    (
        BundleTarget::LinuxX64,
        BundleInfo {
            dir_name: "linux-x64",
            bun_executable: "bun",
            bun_asset: "bun-linux-x64",
        },
    ),
    (
        BundleTarget::LinuxArm64,
        BundleInfo {
            dir_name: "linux-arm64",
            bun_executable: "bun",
            bun_asset: "bun-linux-aarch64",
        },
    ),
    (
        BundleTarget::Win32X64,
        BundleInfo {
            dir_name: "win32-x64",
            bun_executable: "bun.exe",
            bun_asset: "bun-windows-x64",
        },
    ),
];

impl BundleTarget {
    /// Every supported target.
    pub const ALL: [BundleTarget; 5] = [
        BundleTarget::DarwinArm64,
        BundleTarget::DarwinX64,
        BundleTarget::LinuxX64,
        BundleTarget::LinuxArm64,
        BundleTarget::Win32X64,
    ];

    /// Reduce an OS/CPU pair to a supported target.
    ///
    /// Windows on ARM has no bundled runtime and returns `None`.
    pub fn from_parts(platform: Platform, arch: Arch) -> Option<Self> {
        match (platform, arch) {
            (Platform::MacOS, Arch::Arm64) => Some(BundleTarget::DarwinArm64),
            (Platform::MacOS, Arch::X64) => Some(BundleTarget::DarwinX64),
            (Platform::Linux, Arch::X64) => Some(BundleTarget::LinuxX64),
            (Platform::Linux, Arch::Arm64) => Some(BundleTarget::LinuxArm64),
            (Platform::Windows, Arch::X64) => Some(BundleTarget::Win32X64),
            (Platform::Windows, Arch::Arm64) => None,
        }
    }

    /// Target for the running host, if supported.
    pub fn current() -> Option<Self> {
        Self::from_parts(Platform::current(), Arch::current()?)
    }

    pub fn info(self) -> &'static BundleInfo {
        BUNDLE_INFO
            .iter()
            .find(|(target, _)| *target == self)
            .map(|(_, info)| info)
            .unwrap_or(&BUNDLE_INFO[0].1)
    }

    /// Key used for resource directories, e.g. `linux-x64`.
    pub fn key(self) -> &'static str {
        self.info().dir_name
    }
}

impl fmt::Display for BundleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Upstream download URL for a Bun release on a given target.
///
/// Used for reporting only; nothing in this crate downloads.
pub fn bun_download_url(version: &str, target: BundleTarget) -> String {
    format!(
        "https://github.com/oven-sh/bun/releases/download/bun-v{}/{}.zip",
        version.trim_start_matches('v'),
        target.info().bun_asset
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_platform_matches_cfg() {
        let platform = Platform::current();
        assert_eq!(platform.is_windows(), cfg!(target_os = "windows"));
    }

    #[test]
    fn windows_arm_has_no_bundle() {
        assert_eq!(BundleTarget::from_parts(Platform::Windows, Arch::Arm64), None);
    }

    #[test]
    fn five_supported_targets() {
        let mut count = 0;
        for platform in [Platform::MacOS, Platform::Linux, Platform::Windows] {
            for arch in [Arch::X64, Arch::Arm64] {
                if BundleTarget::from_parts(platform, arch).is_some() {
                    count += 1;
                }
            }
        }
        assert_eq!(count, BundleTarget::ALL.len());
    }

    #[test]
    fn every_target_has_metadata() {
        for target in BundleTarget::ALL {
            let info = target.info();
            assert_eq!(info.dir_name, target.key());
            assert!(info.bun_asset.starts_with("bun-"));
        }
    }

    #[test]
    fn windows_bundle_uses_exe() {
        assert_eq!(BundleTarget::Win32X64.info().bun_executable, "bun.exe");
        assert_eq!(BundleTarget::LinuxX64.info().bun_executable, "bun");
    }

    #[test]
    fn download_url_strips_leading_v() {
        let url = bun_download_url("v1.1.30", BundleTarget::DarwinArm64);
        assert_eq!(
            url,
            "https://github.com/oven-sh/bun/releases/download/bun-v1.1.30/bun-darwin-aarch64.zip"
        );
    }

    #[test]
    fn target_serializes_as_key() {
        let json = serde_json::to_string(&BundleTarget::Win32X64).unwrap();
        assert_eq!(json, "\"win32-x64\"");
    }
}
