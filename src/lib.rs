//! Ataxx (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so the binary, integration
//! tests and benches can use `ataxx::{core, engine, adapter, term, types}`.

pub use ataxx_adapter as adapter;
pub use ataxx_core as core;
pub use ataxx_engine as engine;
pub use ataxx_term as term;
pub use ataxx_types as types;
