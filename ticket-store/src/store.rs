//! File-backed ticket store.
//!
//! The whole document lives in memory behind a `RwLock`. Each write is
//! applied to a copy, persisted (temp file + rename), then swapped in, so a
//! failed write leaves both memory and disk unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::analytics::{DashboardOverview, dashboard_overview};
use crate::errors::StoreError;
use crate::model::{ConversationMessage, NewTicket, TIMESTAMP_FORMAT, Ticket, TicketDb, TicketStatus};

pub struct TicketStore {
    path: PathBuf,
    db: RwLock<TicketDb>,
}

impl TicketStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let db = if path.exists() {
            let bytes = fs::read(&path)?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                TicketDb::default()
            } else {
                serde_json::from_slice(&bytes)?
            }
        } else {
            TicketDb::default()
        };
        info!(
            path = %path.display(),
            unresolved = db.unresolved.len(),
            resolved = db.resolved.len(),
            "ticket store opened"
        );
        Ok(Self {
            path,
            db: RwLock::new(db),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a new ticket in the unresolved table and returns its id.
    #[instrument(skip_all, fields(team = %new.assigned_team))]
    pub async fn create_ticket(&self, new: NewTicket) -> Result<String, StoreError> {
        self.write(|db| {
            let id = db.next_ticket_id();
            db.unresolved.push(Ticket {
                ticket_id: id.clone(),
                issue_summary: new.issue_summary,
                sentiment: new.sentiment,
                priority: new.priority,
                solution: String::new(),
                status: TicketStatus::Open,
                opened_at: now(),
                resolved_at: None,
                assigned_team: new.assigned_team,
                suggested_solution: new.suggested_solution,
                estimated_resolution_hours: new.estimated_resolution_hours,
                conversation: Vec::new(),
            });
            debug!(ticket_id = %id, "ticket created");
            Ok(id)
        })
        .await
    }

    /// Appends a timestamped message to a ticket in either table.
    pub async fn append_message(&self, id: &str, role: &str, content: &str) -> Result<(), StoreError> {
        self.write(|db| {
            let ticket = db
                .find_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            ticket.conversation.push(ConversationMessage {
                role: role.to_string(),
                content: content.to_string(),
                timestamp: now(),
            });
            Ok(())
        })
        .await
    }

    /// Moves an unresolved ticket to the resolved table with `solution`.
    #[instrument(skip(self, solution))]
    pub async fn mark_resolved(&self, id: &str, solution: &str) -> Result<Ticket, StoreError> {
        self.write(|db| resolve_in(db, id, |_| solution.to_string())).await
    }

    /// Resolves a ticket with the fix suggested when it was opened.
    #[instrument(skip(self))]
    pub async fn resolve_with_suggestion(&self, id: &str) -> Result<Ticket, StoreError> {
        self.write(|db| resolve_in(db, id, |t| t.suggested_solution.clone())).await
    }

    /// Marks a ticket as needing a human agent; its table does not change.
    pub async fn flag_for_human_agent(&self, id: &str) -> Result<Ticket, StoreError> {
        self.write(|db| {
            let ticket = db
                .find_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            ticket.status = TicketStatus::NeedsHumanAgent;
            Ok(ticket.clone())
        })
        .await
    }

    pub async fn get(&self, id: &str) -> Option<Ticket> {
        self.db.read().await.find(id).cloned()
    }

    pub async fn resolved(&self) -> Vec<Ticket> {
        self.db.read().await.resolved.clone()
    }

    pub async fn unresolved(&self) -> Vec<Ticket> {
        self.db.read().await.unresolved.clone()
    }

    /// Case-insensitive text search; unresolved matches come first.
    pub async fn search(
        &self,
        query: &str,
        include_resolved: bool,
        include_unresolved: bool,
    ) -> Vec<Ticket> {
        let needle = query.trim().to_lowercase();
        let db = self.db.read().await;

        let mut out = Vec::new();
        if include_unresolved {
            out.extend(db.unresolved.iter().filter(|t| t.mentions(&needle)).cloned());
        }
        if include_resolved {
            out.extend(db.resolved.iter().filter(|t| t.mentions(&needle)).cloned());
        }
        out
    }

    pub async fn dashboard_overview(&self) -> DashboardOverview {
        let db = self.db.read().await;
        dashboard_overview(&db.resolved, &db.unresolved, Local::now().naive_local())
    }

    async fn write<T>(
        &self,
        apply: impl FnOnce(&mut TicketDb) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.db.write().await;
        let mut next = guard.clone();
        let out = apply(&mut next)?;
        persist(&self.path, &next)?;
        *guard = next;
        Ok(out)
    }
}

fn resolve_in(
    db: &mut TicketDb,
    id: &str,
    solution: impl FnOnce(&Ticket) -> String,
) -> Result<Ticket, StoreError> {
    let Some(pos) = db.unresolved.iter().position(|t| t.ticket_id == id) else {
        return Err(if db.find(id).is_some() {
            StoreError::AlreadyResolved(id.to_string())
        } else {
            StoreError::NotFound(id.to_string())
        });
    };
    let mut ticket = db.unresolved.remove(pos);
    ticket.status = TicketStatus::Resolved;
    ticket.resolved_at = Some(now());
    ticket.solution = solution(&ticket);
    db.resolved.push(ticket.clone());
    Ok(ticket)
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn persist(path: &Path, db: &TicketDb) -> Result<(), StoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(db)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_ticket(summary: &str, team: &str) -> NewTicket {
        NewTicket {
            issue_summary: summary.into(),
            sentiment: "Annoyed".into(),
            priority: "High".into(),
            assigned_team: team.into(),
            suggested_solution: "Restart it".into(),
            estimated_resolution_hours: Some(6.0),
        }
    }

    #[tokio::test]
    async fn ids_start_at_200_and_increase() {
        let dir = tempfile::tempdir().unwrap();
        let store = TicketStore::open(dir.path().join("db.json")).unwrap();

        let a = store.create_ticket(new_ticket("App crashes", "Software")).await.unwrap();
        let b = store.create_ticket(new_ticket("Wifi drops", "Network")).await.unwrap();
        assert_eq!(a, "TECH_200");
        assert_eq!(b, "TECH_201");

        let t = store.get(&a).await.unwrap();
        assert_eq!(t.status, TicketStatus::Open);
        assert!(t.solution.is_empty());
        assert!(t.resolved_at.is_none());
        assert_eq!(t.opened_at.len(), 19);
        assert_eq!(t.suggested_solution, "Restart it");
        assert_eq!(t.initial_question(), None);
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");
        {
            let store = TicketStore::open(&path).unwrap();
            let id = store.create_ticket(new_ticket("Hub offline", "Device")).await.unwrap();
            store.append_message(&id, "user", "my hub is offline").await.unwrap();
            store.mark_resolved(&id, "Reset the hub").await.unwrap();
        }

        let store = TicketStore::open(&path).unwrap();
        assert!(store.unresolved().await.is_empty());
        let resolved = store.resolved().await;
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].solution, "Reset the hub");
        assert_eq!(resolved[0].status, TicketStatus::Resolved);
        assert_eq!(resolved[0].initial_question(), Some("my hub is offline"));

        let next = store.create_ticket(new_ticket("x", "Account")).await.unwrap();
        assert_eq!(next, "TECH_201");
    }

    #[tokio::test]
    async fn resolve_rules() {
        let dir = tempfile::tempdir().unwrap();
        let store = TicketStore::open(dir.path().join("db.json")).unwrap();
        let id = store.create_ticket(new_ticket("Refund", "Payments")).await.unwrap();

        store.mark_resolved(&id, "Refunded").await.unwrap();
        assert!(matches!(
            store.mark_resolved(&id, "again").await,
            Err(StoreError::AlreadyResolved(_))
        ));
        assert!(matches!(
            store.mark_resolved("TECH_999", "x").await,
            Err(StoreError::NotFound(_))
        ));
        // messages still land on resolved tickets
        store.append_message(&id, "assistant", "Glad it worked").await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().conversation.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_resolves_use_suggestion_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(TicketStore::open(dir.path().join("db.json")).unwrap());
        let id = store.create_ticket(new_ticket("Card declined", "Payments")).await.unwrap();

        let (a, b) = tokio::join!(
            store.resolve_with_suggestion(&id),
            store.resolve_with_suggestion(&id)
        );
        let (ok, err) = if a.is_ok() { (a, b) } else { (b, a) };
        assert_eq!(ok.unwrap().solution, "Restart it");
        assert!(matches!(err, Err(StoreError::AlreadyResolved(_))));
        assert_eq!(store.resolved().await.len(), 1);

        assert!(matches!(
            store.resolve_with_suggestion("TECH_404").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn flag_keeps_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = TicketStore::open(dir.path().join("db.json")).unwrap();
        let id = store.create_ticket(new_ticket("Login loop", "Account")).await.unwrap();

        let t = store.flag_for_human_agent(&id).await.unwrap();
        assert_eq!(t.status, TicketStatus::NeedsHumanAgent);
        assert_eq!(store.unresolved().await.len(), 1);
        assert!(matches!(
            store.flag_for_human_agent("nope").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn search_orders_unresolved_first_and_respects_filters() {
        let dir = tempfile::tempdir().unwrap();
        let store = TicketStore::open(dir.path().join("db.json")).unwrap();
        let a = store.create_ticket(new_ticket("Router reboot loop", "Network")).await.unwrap();
        store.mark_resolved(&a, "Firmware update").await.unwrap();
        let b = store.create_ticket(new_ticket("Camera offline", "Device")).await.unwrap();
        store.append_message(&b, "user", "Maybe the ROUTER is broken").await.unwrap();

        let ids: Vec<_> = store
            .search("router", true, true)
            .await
            .into_iter()
            .map(|t| t.ticket_id)
            .collect();
        assert_eq!(ids, [b.clone(), a.clone()]);

        assert_eq!(store.search("router", false, true).await.len(), 1);
        assert!(store.search("router", false, false).await.is_empty());
        assert_eq!(store.search("firmware", true, true).await[0].ticket_id, a);
    }

    #[tokio::test]
    async fn empty_file_opens_as_empty_db() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let store = TicketStore::open(f.path()).unwrap();
        assert!(store.resolved().await.is_empty());
    }
}
