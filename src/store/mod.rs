//! The seam between the sweep loop and wherever records actually live.
//!
//! [`XrpcRecordStore`] talks to a PDS over HTTP. [`InMemoryRecordStore`]
//! serves scripted pages so pagination, filtering and counting can be
//! exercised without a network.

mod memory;
mod xrpc;

pub use memory::{DeleteCall, InMemoryRecordStore};
pub use xrpc::XrpcRecordStore;

use crate::domain::{Category, Page, Record};
use crate::xrpc_client::{DeleteError, ListError};

#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Fetches one page of `category` records, starting at `cursor`.
    async fn list(&self, category: Category, cursor: Option<&str>) -> Result<Page, ListError>;

    async fn delete(&self, record: &Record, category: Category) -> Result<(), DeleteError>;
}
