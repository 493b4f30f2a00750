// cvbuild-common/src/model/preset.rs
//! Named configure presets for the OpenCV static build.
use std::collections::BTreeSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Features forced `OFF` by every preset.
pub const COMMON_DISABLED_FEATURES: &[&str] = &[
    "BUILD_CUDA_STUBS",
    "BUILD_DOCS",
    "BUILD_EXAMPLES",
    "BUILD_FAT_JAVA_LIB",
    "BUILD_ITT",
    "BUILD_JASPER",
    "BUILD_JAVA",
    "BUILD_JPEG",
    "BUILD_OPENEXR",
    "BUILD_OPENJPEG",
    "BUILD_PERF_TESTS",
    "BUILD_PNG",
    "BUILD_PROTOBUF",
    "BUILD_SHARED_LIBS",
    "BUILD_TBB",
    "BUILD_TESTS",
    "BUILD_TIFF",
    "BUILD_WEBP",
    "BUILD_ZLIB",
    "BUILD_opencv_apps",
    "BUILD_opencv_dnn",
    "BUILD_opencv_java_bindings_generator",
    "BUILD_opencv_js_bindings_generator",
    "BUILD_opencv_objc_bindings_generator",
    "BUILD_opencv_python_bindings_generator",
    "BUILD_opencv_python_tests",
    "BUILD_opencv_ts",
    "BUILD_opencv_world",
    "ENABLE_LIBJPEG_TURBO_SIMD",
    "OPENCL_FOUND",
    "OPENCV_DNN_CUDA",
    "OPENCV_DNN_OPENCL",
    "OPENCV_DNN_OPENVINO",
    "OPENCV_DNN_PERF_CAFFE",
    "OPENCV_DNN_TFLITE",
    "OPENCV_TEST_DNN_TFLITE",
    "PNG_ARM_NEON",
    "WITH_ADE",
    "WITH_AVFOUNDATION",
    "WITH_AVIF",
    "WITH_CANN",
    "WITH_CLP",
    "WITH_CUDA",
    "WITH_EIGEN",
    "WITH_FFMPEG",
    "WITH_FLATBUFFERS",
    "WITH_FREETYPE",
    "WITH_GDAL",
    "WITH_GDCM",
    "WITH_GPHOTO2",
    "WITH_GSTREAMER",
    "WITH_HALIDE",
    "WITH_IMGCODEC_GIF",
    "WITH_IMGCODEC_HDR",
    "WITH_ITT",
    "WITH_JASPER",
    "WITH_JPEG",
    "WITH_JPEGXL",
    "WITH_ONNX",
    "WITH_OPENCL",
    "WITH_OPENCLAMDBLAS",
    "WITH_OPENCLAMDFFT",
    "WITH_OPENCL_SVM",
    "WITH_OPENEXR",
    "WITH_OPENGL",
    "WITH_OPENJPEG",
    "WITH_OPENMP",
    "WITH_OPENNI",
    "WITH_OPENNI2",
    "WITH_OPENVINO",
    "WITH_OPENVX",
    "WITH_PLAIDML",
    "WITH_PNG",
    "WITH_PROTOBUF",
    "WITH_QT",
    "WITH_QUIRC",
    "WITH_SPNG",
    "WITH_TBB",
    "WITH_TIFF",
    "WITH_TIMVX",
    "WITH_VTK",
    "WITH_VULKAN",
    "WITH_WEBNN",
    "WITH_WEBP",
    "WITH_XIMEA",
    "WITH_ZLIB_NG",
    "old-jpeg",
];

/// Extra features the universal preset turns off on top of the common set.
pub const UNIVERSAL_EXTRA_DISABLED_FEATURES: &[&str] = &[
    "BUILD_IPP_IW",
    "WITH_CAROTENE",
    "WITH_IMGCODEC_PFM",
    "WITH_IMGCODEC_PXM",
    "WITH_IMGCODEC_SUNRASTER",
    "WITH_IPP",
    "WITH_LAPACK",
    "WITH_OBSENSOR",
    "WITH_ZLIB",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Fat x86_64+arm64 build with the compiler's default CPU baseline.
    /// Fetches the source and removes the whole third-party tree afterwards.
    #[default]
    Universal,
    /// arm64-first build pinned to a NEON dot-product baseline. Builds an
    /// already present source tree.
    NeonDotprod,
}

/// What to delete once `make install` has succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    /// Only the scratch `.build` directory.
    BuildDir,
    /// The entire `3rdparty` directory, source tree included.
    ThirdPartyTree,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Universal => "universal",
            Preset::NeonDotprod => "neon-dotprod",
        }
    }

    pub fn generator(&self) -> Option<&'static str> {
        match self {
            Preset::Universal => Some("Unix Makefiles"),
            Preset::NeonDotprod => None,
        }
    }

    pub fn osx_architectures(&self) -> &'static [&'static str] {
        match self {
            Preset::Universal => &["x86_64", "arm64"],
            Preset::NeonDotprod => &["arm64", "x86_64"],
        }
    }

    pub fn disabled_features(&self) -> BTreeSet<String> {
        let mut set: BTreeSet<String> = COMMON_DISABLED_FEATURES
            .iter()
            .map(|s| s.to_string())
            .collect();
        if *self == Preset::Universal {
            set.extend(UNIVERSAL_EXTRA_DISABLED_FEATURES.iter().map(|s| s.to_string()));
        }
        set
    }

    pub fn fetches_by_default(&self) -> bool {
        matches!(self, Preset::Universal)
    }

    pub fn cleanup(&self) -> Cleanup {
        match self {
            Preset::Universal => Cleanup::ThirdPartyTree,
            Preset::NeonDotprod => Cleanup::BuildDir,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
