mod error;
mod fs_registry;
mod loader;
mod memory;
mod source;

pub use error::RegistryError;
pub use fs_registry::FsProcessRegistry;
pub use loader::{ProcessLoader, ProcessSummary};
pub use memory::MemoryRegistry;
pub use source::{SourceFormat, parse_source};
