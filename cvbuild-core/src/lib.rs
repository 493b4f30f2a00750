// cvbuild-core/src/lib.rs
pub mod build;
pub mod fetch;
pub mod pipeline;

pub use build::Builder;
pub use fetch::fetch_source;
pub use pipeline::{BuildPlan, FetchMode, Pipeline};

// Re-export the seams so callers only need this crate.
pub use cvbuild_aio::{CommandRunner, DryRunRunner, Invocation, SystemRunner};
pub use cvbuild_net::{Downloader, HttpDownloader};
