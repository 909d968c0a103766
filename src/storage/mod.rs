//! On-device key/value storage.
//!
//! Pages never touch a global store. They receive a [`SessionStore`] wrapping
//! any [`KeyValueStore`], so tests can hand them a [`MemoryStore`].

pub mod file;
pub mod memory;
pub mod session;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::{ContentGroupDraft, Counter, SessionStore};

use crate::error::Result;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
