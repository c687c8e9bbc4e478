use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::RecordStore;
use crate::domain::{Category, Page, Record};
use crate::xrpc_client::{DeleteError, ListError};

/// A delete the store was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCall {
    pub category: Category,
    pub uri: String,
    pub succeeded: bool,
}

/// Scripted record store. Pages are served in the order they were added and
/// the cursor handed out for page `n` is simply `n`.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    pages: HashMap<Category, Vec<Vec<Record>>>,
    failing_lists: HashMap<Category, u16>,
    failing_deletes: HashSet<String>,
    list_calls: RefCell<Vec<(Category, Option<String>)>>,
    delete_calls: RefCell<Vec<DeleteCall>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, category: Category, records: Vec<Record>) -> Self {
        self.pages.entry(category).or_default().push(records);
        self
    }

    /// Every listing of `category` is rejected with `status`.
    pub fn with_failing_list(mut self, category: Category, status: u16) -> Self {
        self.failing_lists.insert(category, status);
        self
    }

    /// Deleting the record at `uri` is rejected with a 500.
    pub fn with_failing_delete(mut self, uri: impl Into<String>) -> Self {
        self.failing_deletes.insert(uri.into());
        self
    }

    pub fn list_calls(&self) -> Vec<(Category, Option<String>)> {
        self.list_calls.borrow().clone()
    }

    pub fn delete_calls(&self) -> Vec<DeleteCall> {
        self.delete_calls.borrow().clone()
    }

    pub fn deleted_uris(&self) -> Vec<String> {
        self.delete_calls
            .borrow()
            .iter()
            .filter(|call| call.succeeded)
            .map(|call| call.uri.clone())
            .collect()
    }
}

impl RecordStore for InMemoryRecordStore {
    async fn list(&self, category: Category, cursor: Option<&str>) -> Result<Page, ListError> {
        self.list_calls
            .borrow_mut()
            .push((category, cursor.map(str::to_string)));

        if let Some(&status) = self.failing_lists.get(&category) {
            return Err(ListError::Rejected {
                status,
                body: format!("listing {} is scripted to fail", category.plural()),
            });
        }

        let index = match cursor {
            None => 0,
            Some(cursor) => cursor.parse::<usize>().map_err(|_| ListError::Rejected {
                status: 400,
                body: format!("InvalidCursor: {cursor}"),
            })?,
        };

        let pages = self
            .pages
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let records = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());

        Ok(Page::new(records, next))
    }

    async fn delete(&self, record: &Record, category: Category) -> Result<(), DeleteError> {
        let succeeded = !self.failing_deletes.contains(&record.uri);
        self.delete_calls.borrow_mut().push(DeleteCall {
            category,
            uri: record.uri.clone(),
            succeeded,
        });

        if succeeded {
            Ok(())
        } else {
            Err(DeleteError::Rejected {
                status: 500,
                body: "InternalServerError".to_string(),
            })
        }
    }
}
