// cvbuild-common/src/model/configure.rs
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::preset::Preset;

/// SIMD baseline and runtime-dispatch selection passed to the configure step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CpuBaseline {
    pub baseline: String,
    pub dispatch: String,
}

impl CpuBaseline {
    /// Empty values leave the choice to the compiler.
    pub fn native_default() -> Self {
        Self {
            baseline: String::new(),
            dispatch: String::new(),
        }
    }

    pub fn neon_dotprod() -> Self {
        Self {
            baseline: "NEON_DOTPROD".to_string(),
            dispatch: "NEON_DOTPROD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigureOptions {
    pub generator: Option<String>,
    pub osx_architectures: Vec<String>,
    pub build_type: String,
    pub install_prefix: PathBuf,
    pub cpu_baseline: CpuBaseline,
    pub disabled: BTreeSet<String>,
}

impl ConfigureOptions {
    pub fn for_preset(preset: Preset, install_prefix: &Path) -> Self {
        let cpu_baseline = match preset {
            Preset::Universal => CpuBaseline::native_default(),
            Preset::NeonDotprod => CpuBaseline::neon_dotprod(),
        };
        Self {
            generator: preset.generator().map(str::to_string),
            osx_architectures: preset
                .osx_architectures()
                .iter()
                .map(|a| a.to_string())
                .collect(),
            build_type: "Release".to_string(),
            install_prefix: install_prefix.to_path_buf(),
            cpu_baseline,
            disabled: preset.disabled_features(),
        }
    }

    /// Full argument vector for `cmake`, ending with the source directory as
    /// seen from the build directory.
    pub fn to_args(&self, source_dir: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(self.disabled.len() + 8);
        if let Some(generator) = &self.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }
        args.push(format!(
            "-DCMAKE_OSX_ARCHITECTURES={}",
            self.osx_architectures.join(";")
        ));
        args.push(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));
        args.push(format!(
            "-DCMAKE_INSTALL_PREFIX={}",
            self.install_prefix.display()
        ));
        args.push(format!("-DCPU_BASELINE={}", self.cpu_baseline.baseline));
        args.push(format!("-DCPU_DISPATCH={}", self.cpu_baseline.dispatch));
        args.extend(self.feature_flags());
        args.push(source_dir.to_string());
        args
    }

    /// Only the `-D<feature>=OFF` entries, sorted.
    pub fn feature_flags(&self) -> Vec<String> {
        self.disabled
            .iter()
            .map(|name| format!("-D{name}=OFF"))
            .collect()
    }
}
