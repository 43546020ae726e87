pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod normalize;
pub mod storage;

pub use config::{ServerConfig, StoreConfig};
pub use entity::{Category, Document, Task, TaskPayload, TenantId};
pub use error::{Result, StoreError};
pub use storage::JsonStore;
