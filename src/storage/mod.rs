//! Pending transaction storage
//!
//! The pool holds submitted transactions until a block is mined. It lives
//! in memory only; nothing here touches disk.

pub mod memory_pool;

pub use memory_pool::TransactionPool;
