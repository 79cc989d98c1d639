//! Application layer containing the transaction lifecycle orchestration.
//!
//! `TransactionService` is the entry point: it prices and persists new
//! orders, spawns the detached settlement task for each of them, and carries
//! the administrative operations.

pub mod service;
pub mod settlement;
