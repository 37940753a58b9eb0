// src/sync.rs

//! `push` and `diff` for a single component file.

use crate::client::{RecordClient, RowId, Transport};
use crate::files::{read_component, template_id};

use anyhow::{bail, Result};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    Updated { template_id: String, row_id: RowId },
    Created { template_id: String, row_id: Option<RowId> },
}

impl fmt::Display for PushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushOutcome::Updated { template_id, row_id } => {
                write!(f, "✓ Update {} (row {})", template_id, row_id)
            }
            PushOutcome::Created { template_id, row_id } => match row_id {
                Some(id) => write!(f, "✓ Create {} (row {})", template_id, id),
                None => write!(f, "✓ Create {} (row ?)", template_id),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStatus {
    NotFound,
    Identical,
    Different,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    pub template_id: String,
    pub status: DiffStatus,
}

impl fmt::Display for DiffOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            DiffStatus::NotFound => "not found remotely",
            DiffStatus::Identical => "identical",
            DiffStatus::Different => "different",
        };
        write!(f, "{}: {}", self.template_id, status)
    }
}

/// Create or update the row for `file`.
pub async fn push_component<T: Transport>(
    client: &RecordClient<T>,
    file: &Path,
) -> Result<PushOutcome> {
    let template_id = template_id(file)?;
    let code = read_component(file)?;

    match client.fetch_by_template_id(&template_id).await? {
        Some(record) => {
            if record.id.is_missing() {
                bail!("Grist record for template_id={} has no id", template_id);
            }
            client.update(&record.id, &code).await?;
            Ok(PushOutcome::Updated {
                template_id,
                row_id: record.id,
            })
        }
        None => {
            let row_id = client.create(&template_id, &code).await?;
            Ok(PushOutcome::Created {
                template_id,
                row_id,
            })
        }
    }
}

/// Compare `file` with the remote `component_code`, byte for byte.
pub async fn diff_component<T: Transport>(
    client: &RecordClient<T>,
    file: &Path,
) -> Result<DiffOutcome> {
    let template_id = template_id(file)?;
    let local = read_component(file)?;

    let status = match client.fetch_by_template_id(&template_id).await? {
        None => DiffStatus::NotFound,
        Some(record) if record.component_code() == local => DiffStatus::Identical,
        Some(_) => DiffStatus::Different,
    };

    Ok(DiffOutcome {
        template_id,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{env, FakeTransport};
    use reqwest::Method;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn component(name: &str, code: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(name);
        fs::write(&path, code).expect("write");
        (tmp, path)
    }

    #[tokio::test]
    async fn push_creates_when_no_remote_match() {
        let (_tmp, path) = component("home", "<Home/>");
        let fake = FakeTransport::new()
            .respond(200, r#"{"records":[]}"#)
            .respond(200, r#"{"records":[{"id":11}]}"#);
        let client = RecordClient::new(&env(), &fake);

        let outcome = push_component(&client, &path).await.unwrap();
        assert_eq!(
            outcome,
            PushOutcome::Created {
                template_id: "home".to_string(),
                row_id: Some(RowId(json!(11))),
            }
        );
        assert_eq!(outcome.to_string(), "✓ Create home (row 11)");

        let reqs = fake.requests();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[1].method, Method::POST);
        assert_eq!(
            reqs[1].body,
            Some(json!({"records":[{"fields":{"template_id":"home","component_code":"<Home/>"}}]}))
        );
    }

    #[tokio::test]
    async fn push_create_without_returned_id_reports_unknown() {
        let (_tmp, path) = component("home", "x");
        let fake = FakeTransport::new()
            .respond(200, r#"{"records":[]}"#)
            .respond(200, r#"{}"#);
        let client = RecordClient::new(&env(), &fake);

        let outcome = push_component(&client, &path).await.unwrap();
        assert_eq!(outcome.to_string(), "✓ Create home (row ?)");
    }

    #[tokio::test]
    async fn push_updates_existing_row() {
        let (_tmp, path) = component("card", "new");
        let fake = FakeTransport::new()
            .respond(200, r#"{"records":[{"id":4,"fields":{"component_code":"old"}}]}"#)
            .respond(200, "{}");
        let client = RecordClient::new(&env(), &fake);

        let outcome = push_component(&client, &path).await.unwrap();
        assert_eq!(outcome.to_string(), "✓ Update card (row 4)");

        let reqs = fake.requests();
        assert_eq!(reqs[1].method, Method::PATCH);
        assert_eq!(
            reqs[1].body,
            Some(json!({"records":[{"id":4,"fields":{"component_code":"new"}}]}))
        );
    }

    #[tokio::test]
    async fn push_with_duplicates_updates_first_row() {
        let (_tmp, path) = component("dup", "code");
        let fake = FakeTransport::new()
            .respond(200, r#"{"records":[{"id":8,"fields":{}},{"id":2,"fields":{}}]}"#)
            .respond(200, "{}");
        let client = RecordClient::new(&env(), &fake);

        let outcome = push_component(&client, &path).await.unwrap();
        assert_eq!(
            outcome,
            PushOutcome::Updated {
                template_id: "dup".to_string(),
                row_id: RowId(json!(8)),
            }
        );
    }

    #[tokio::test]
    async fn push_stops_on_lookup_failure() {
        let (_tmp, path) = component("home", "x");
        let fake = FakeTransport::new().respond(401, "bad key");
        let client = RecordClient::new(&env(), &fake);

        let err = push_component(&client, &path).await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn push_missing_file_fails_before_network() {
        let tmp = TempDir::new().expect("tmp");
        let fake = FakeTransport::new();
        let client = RecordClient::new(&env(), &fake);

        assert!(push_component(&client, &tmp.path().join("ghost")).await.is_err());
        assert!(fake.requests().is_empty());
    }

    #[tokio::test]
    async fn diff_reports_not_found() {
        let (_tmp, path) = component("home", "x");
        let fake = FakeTransport::new().respond(200, r#"{"records":[]}"#);
        let client = RecordClient::new(&env(), &fake);

        let outcome = diff_component(&client, &path).await.unwrap();
        assert_eq!(outcome.status, DiffStatus::NotFound);
        assert_eq!(outcome.to_string(), "home: not found remotely");
    }

    #[tokio::test]
    async fn diff_reports_identical_on_exact_match() {
        let (_tmp, path) = component("home", "<div>\n  hi\n</div>\n");
        let fake = FakeTransport::new().respond(
            200,
            r#"{"records":[{"id":1,"fields":{"component_code":"<div>\n  hi\n</div>\n"}}]}"#,
        );
        let client = RecordClient::new(&env(), &fake);

        let outcome = diff_component(&client, &path).await.unwrap();
        assert_eq!(outcome.to_string(), "home: identical");
    }

    #[tokio::test]
    async fn diff_reports_different_on_trailing_whitespace() {
        let (_tmp, path) = component("home", "<div/>\n");
        let fake = FakeTransport::new()
            .respond(200, r#"{"records":[{"id":1,"fields":{"component_code":"<div/>"}}]}"#);
        let client = RecordClient::new(&env(), &fake);

        let outcome = diff_component(&client, &path).await.unwrap();
        assert_eq!(outcome.status, DiffStatus::Different);
        assert_eq!(outcome.to_string(), "home: different");
    }

    #[tokio::test]
    async fn push_refuses_record_without_id() {
        let (_tmp, path) = component("home", "x");
        let fake = FakeTransport::new()
            .respond(200, r#"{"records":[{"fields":{"component_code":"old"}}]}"#);
        let client = RecordClient::new(&env(), &fake);

        let err = push_component(&client, &path).await.unwrap_err();
        assert!(err.to_string().contains("has no id"), "{err}");
        assert_eq!(fake.requests().len(), 1);
    }

    #[tokio::test]
    async fn diff_ignores_missing_record_id() {
        let (_tmp, path) = component("home", "same");
        let fake = FakeTransport::new()
            .respond(200, r#"{"records":[{"fields":{"component_code":"same"}}]}"#);
        let client = RecordClient::new(&env(), &fake);

        let outcome = diff_component(&client, &path).await.unwrap();
        assert_eq!(outcome.status, DiffStatus::Identical);
    }

    #[tokio::test]
    async fn diff_treats_missing_remote_code_as_empty() {
        let (_tmp, path) = component("empty", "");
        let fake = FakeTransport::new().respond(200, r#"{"records":[{"id":1,"fields":{}}]}"#);
        let client = RecordClient::new(&env(), &fake);

        let outcome = diff_component(&client, &path).await.unwrap();
        assert_eq!(outcome.status, DiffStatus::Identical);
    }
}
