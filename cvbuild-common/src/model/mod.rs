// cvbuild-common/src/model/mod.rs
pub mod configure;
pub mod preset;
pub mod source;

pub use configure::{ConfigureOptions, CpuBaseline};
pub use preset::{Cleanup, Preset};
pub use source::SourceArchive;
