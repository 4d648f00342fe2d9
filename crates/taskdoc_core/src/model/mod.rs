//! Domain model for persisted tasks.
//!
//! # Responsibility
//! - Define the task record shared by the codec, the store and the console.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod task;
