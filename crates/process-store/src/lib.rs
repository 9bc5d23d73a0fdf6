pub mod error;
pub mod memory;
pub mod postgres;
pub mod process;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryProcessStore;
pub use postgres::PostgresProcessStore;
pub use process::{ProcessName, ProcessRecord};
pub use store::{ProcessStore, UpsertOutcome};
