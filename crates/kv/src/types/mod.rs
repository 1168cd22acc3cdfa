//! Type system for the KV contract

pub mod operation;
pub mod response;
pub mod value;

pub use operation::{Key, KvOperation, OperationType};
pub use response::{KvResponse, ScannedRow};
pub use value::Value;
