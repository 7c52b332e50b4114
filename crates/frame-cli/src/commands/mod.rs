//! Command implementations for frame-cli

pub mod collect;
pub mod remote;
pub mod serve;
pub mod sync;

pub use collect::run_collect;
pub use remote::run_remote;
pub use serve::run_serve;
pub use sync::run_sync;
