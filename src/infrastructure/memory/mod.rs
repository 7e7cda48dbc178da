//! Memory Layer - 进程内状态
//!
//! 进程内的克隆存储，用于本地运行和测试（记录不跨进程共享）

mod clone_store;

pub use clone_store::InMemoryCloneStore;
