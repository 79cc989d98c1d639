//! Domain entities, value objects and the ports the engine is wired with.

pub mod activity;
pub mod ports;
pub mod product;
pub mod transaction;
