//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod http;
pub mod memory;
pub mod persistence;
pub mod worker;

pub use memory::InMemoryCloneStore;
pub use persistence::{FileCloneStore, SqliteCloneStore};
pub use worker::run_test_input;
