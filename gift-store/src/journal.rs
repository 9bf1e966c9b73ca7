//! Append-only audit journal for administrative and review actions.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gift_primitives::{DeclarationId, PrincipalId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::StoreResult;

/// Category of an audited action.
///
/// `AdminOverride` is deliberately distinct from `ReviewDecision`: a direct
/// status write outside the review flow must be tellable apart in the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// A review decision moved the declaration status.
    ReviewDecision,
    /// An administrative status override, bypassing the review flow.
    AdminOverride,
    /// A declaration was permanently deleted.
    Deletion,
}

/// Single entry in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    id: Uuid,
    at: DateTime<Utc>,
    kind: AuditKind,
    declaration: DeclarationId,
    actor: PrincipalId,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    detail: Map<String, Value>,
}

impl AuditEvent {
    /// Creates an event attributing `kind` on `declaration` to `actor`.
    #[must_use]
    pub fn new(kind: AuditKind, declaration: DeclarationId, actor: PrincipalId) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            kind,
            declaration,
            actor,
            detail: Map::new(),
        }
    }

    /// Attaches a detail entry and returns the updated event.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.detail.insert(key.into(), value);
        self
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the event timestamp.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> AuditKind {
        self.kind
    }

    /// Returns the declaration the event concerns.
    #[must_use]
    pub const fn declaration(&self) -> DeclarationId {
        self.declaration
    }

    /// Returns the acting principal.
    #[must_use]
    pub const fn actor(&self) -> PrincipalId {
        self.actor
    }

    /// Returns the detail map.
    #[must_use]
    pub fn detail(&self) -> &Map<String, Value> {
        &self.detail
    }
}

/// Trait implemented by audit trail backends.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Appends an event to the trail.
    async fn append(&self, event: &AuditEvent) -> StoreResult<()>;

    /// Returns the most recent `limit` events, ordered oldest to newest.
    async fn tail(&self, limit: usize) -> StoreResult<Vec<AuditEvent>>;

    /// Clears the trail contents.
    async fn clear(&self) -> StoreResult<()>;
}

/// File-backed audit log writing newline-delimited JSON entries.
pub struct FileAuditLog {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl FileAuditLog {
    /// Opens (or creates) an audit log file at the provided path.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors encountered while preparing the file.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Returns the underlying path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditLog for FileAuditLog {
    async fn append(&self, event: &AuditEvent) -> StoreResult<()> {
        let line = serde_json::to_vec(event)?;
        let mut guard = self.file.lock().await;
        guard.write_all(&line).await?;
        guard.write_u8(b'\n').await?;
        guard.flush().await?;
        Ok(())
    }

    async fn tail(&self, limit: usize) -> StoreResult<Vec<AuditEvent>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let data = fs::read(&self.path).await?;
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        for chunk in data
            .split(|byte| *byte == b'\n')
            .filter(|chunk| !chunk.is_empty())
        {
            let event: AuditEvent = serde_json::from_slice(chunk)?;
            events.push(event);
        }

        if events.len() <= limit {
            return Ok(events);
        }

        let skip = events.len() - limit;
        Ok(events.into_iter().skip(skip).collect())
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut guard = self.file.lock().await;
        guard.rewind().await?;
        guard.set_len(0).await?;
        guard.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("gift-audit-{}.log", Uuid::new_v4()));
        path
    }

    #[tokio::test]
    async fn append_and_tail_roundtrip() {
        let path = temp_path();
        let log = FileAuditLog::open(&path).await.unwrap();
        let declaration = DeclarationId::random();
        let actor = PrincipalId::random();

        for kind in [
            AuditKind::ReviewDecision,
            AuditKind::AdminOverride,
            AuditKind::Deletion,
        ] {
            let event = AuditEvent::new(kind, declaration, actor)
                .with_detail("note", Value::from("test"));
            log.append(&event).await.unwrap();
        }

        let tail = log.tail(2).await.unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].kind(), AuditKind::AdminOverride);
        assert_eq!(tail[1].kind(), AuditKind::Deletion);
        assert_eq!(tail[1].declaration(), declaration);
        assert_eq!(tail[1].detail().get("note").unwrap(), "test");

        log.clear().await.unwrap();
        assert!(log.tail(10).await.unwrap().is_empty());

        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
    }
}
