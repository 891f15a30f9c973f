//! `SeaORM` Entity definitions.

pub mod task;
