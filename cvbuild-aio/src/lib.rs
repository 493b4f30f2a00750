// cvbuild-aio/src/lib.rs
//! IO operations for cvbuild (filesystem, archive extraction, process execution)

pub mod extract;
pub mod fs;
pub mod process;

pub use extract::extract_archive_async;
pub use process::{CommandRunner, DryRunRunner, Invocation, SystemRunner};
