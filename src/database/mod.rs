//! Database module exports.

mod mongo;

pub use mongo::Database;
