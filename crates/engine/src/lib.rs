//! In-process key-value engine
//!
//! A byte-ordered, in-memory implementation of the [`KvTransport`]
//! contract. It executes each operation in a submitted batch against a
//! single ordered map, answering per-operation failures in-band, which
//! makes it a drop-in stand-in for the distributed store in tests and
//! examples.

pub mod engine;

pub use engine::MemoryEngine;

pub use strata_kv::KvTransport;
