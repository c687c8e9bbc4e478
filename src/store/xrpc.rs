use super::RecordStore;
use crate::domain::{Category, Page, Record};
use crate::xrpc_client::{DeleteError, ListError, Session, XrpcClient};

/// Record store backed by an authenticated XRPC session.
#[derive(Debug)]
pub struct XrpcRecordStore {
    client: XrpcClient,
    session: Session,
}

impl XrpcRecordStore {
    pub fn new(client: XrpcClient, session: Session) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl RecordStore for XrpcRecordStore {
    async fn list(&self, category: Category, cursor: Option<&str>) -> Result<Page, ListError> {
        self.client
            .list_records(&self.session, category, cursor)
            .await
    }

    async fn delete(&self, record: &Record, category: Category) -> Result<(), DeleteError> {
        self.client
            .delete_record(&self.session, record, category)
            .await
    }
}
