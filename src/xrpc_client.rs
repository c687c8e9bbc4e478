use std::time::Duration;

use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, Secret};

use crate::domain::{Category, Page, Record, RecordKey};
use crate::utils::{error_chain_fmt, truncate_body};

const CREATE_SESSION: &str = "com.atproto.server.createSession";
const LIST_RECORDS: &str = "com.atproto.repo.listRecords";
const DELETE_RECORD: &str = "com.atproto.repo.deleteRecord";

// Longest slice of a rejected response body kept in error messages.
const MAX_BODY_CHARS: usize = 300;

/// Thin client for the three XRPC methods a sweep needs.
#[derive(Debug)]
pub struct XrpcClient {
    http_client: Client,
    base_url: Url,
}

/// Credentials returned by `createSession`, held for the rest of the run.
#[derive(Debug)]
pub struct Session {
    pub access_jwt: Secret<String>,
    pub did: String,
}

#[derive(serde::Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: Secret<String>,
    did: String,
}

#[derive(serde::Deserialize)]
struct ListRecordsResponse {
    records: Vec<Record>,
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(serde::Serialize)]
struct DeleteRecordRequest<'a> {
    repo: &'a str,
    collection: &'a str,
    rkey: &'a str,
    cid: &'a str,
}

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Login rejected with status {status}: {}", truncate_body(.body, MAX_BODY_CHARS))]
    Rejected { status: u16, body: String },

    #[error("Failed to create a session.")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[derive(thiserror::Error)]
pub enum ListError {
    #[error("Listing rejected with status {status}: {}", truncate_body(.body, MAX_BODY_CHARS))]
    Rejected { status: u16, body: String },

    #[error("Failed to fetch or decode a page of records.")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[derive(thiserror::Error)]
pub enum DeleteError {
    #[error("Delete rejected with status {status}: {}", truncate_body(.body, MAX_BODY_CHARS))]
    Rejected { status: u16, body: String },

    #[error("{0}")]
    InvalidUri(String),

    #[error("Failed to send the delete request.")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}

macro_rules! impl_chain_debug {
    ($($error:ty),*) => {
        $(
            impl std::fmt::Debug for $error {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    error_chain_fmt(self, f)
                }
            }
        )*
    };
}

impl_chain_debug!(AuthError, ListError, DeleteError);

impl XrpcClient {
    /// `base_url` must end in `/` (see `configuration::Settings`).
    /// Without a `timeout` the reqwest defaults apply.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(method)
    }

    #[tracing::instrument(name = "Create session", skip_all, fields(identifier = %identifier))]
    pub async fn create_session(
        &self,
        identifier: &str,
        password: &Secret<String>,
    ) -> Result<Session, AuthError> {
        let url = self.method_url(CREATE_SESSION)?;

        let request_body = CreateSessionRequest {
            identifier,
            password: password.expose_secret(),
        };

        let response = self
            .http_client
            .post(url)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = rejection(response).await;
            return Err(AuthError::Rejected { status, body });
        }

        let session = response.json::<CreateSessionResponse>().await?;
        tracing::info!(did = %session.did, "Session created");

        Ok(Session {
            access_jwt: session.access_jwt,
            did: session.did,
        })
    }

    #[tracing::instrument(
        name = "List records",
        skip(self, session),
        fields(did = %session.did, collection = category.collection())
    )]
    pub async fn list_records(
        &self,
        session: &Session,
        category: Category,
        cursor: Option<&str>,
    ) -> Result<Page, ListError> {
        let url = self.method_url(LIST_RECORDS)?;

        let mut request = self
            .http_client
            .get(url)
            .bearer_auth(session.access_jwt.expose_secret())
            .query(&[
                ("repo", session.did.as_str()),
                ("collection", category.collection()),
            ]);
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let (status, body) = rejection(response).await;
            return Err(ListError::Rejected { status, body });
        }

        let page = response.json::<ListRecordsResponse>().await?;
        tracing::debug!(records = page.records.len(), "Fetched a page");

        Ok(Page::new(page.records, page.cursor))
    }

    #[tracing::instrument(
        name = "Delete record",
        skip(self, session, record),
        fields(did = %session.did, uri = %record.uri)
    )]
    pub async fn delete_record(
        &self,
        session: &Session,
        record: &Record,
        category: Category,
    ) -> Result<(), DeleteError> {
        let rkey = RecordKey::parse(&record.uri).map_err(DeleteError::InvalidUri)?;
        let url = self.method_url(DELETE_RECORD)?;

        let request_body = DeleteRecordRequest {
            repo: &session.did,
            collection: category.collection(),
            rkey: rkey.as_ref(),
            cid: &record.cid,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(session.access_jwt.expose_secret())
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = rejection(response).await;
            return Err(DeleteError::Rejected { status, body });
        }

        Ok(())
    }
}

async fn rejection(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                status,
                "Failed to read the body of a rejected request."
            );
            String::new()
        }
    };
    (status, body)
}
