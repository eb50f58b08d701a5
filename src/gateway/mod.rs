//! Collaborator seams: worker directory and notification transport.
//!
//! The engine's correctness (dedup, history, retry-next-run) must not
//! depend on which concrete transport is plugged in, so both collaborators
//! are traits. The console gateway is the default stand-alone transport;
//! deployments wire in WhatsApp/SMS bridges from the surrounding app.

use crate::core::cache::TtlCache;
use crate::db::workers;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::cell::RefCell;
use std::time::Duration;

/// Contact details for one worker, as the directory knows them.
#[derive(Debug, Clone)]
pub struct WorkerContact {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
}

/// Read-only view of the employee directory.
pub trait WorkerDirectory {
    fn worker(&self, id: &str) -> AppResult<Option<WorkerContact>>;
}

/// Outbound notification transport. A send either completes within the
/// transport's own bounded timeout or reports failure; the pipeline never
/// retries inline, it leaves the dedup record unwritten and lets the next
/// scheduled run retry.
pub trait NotificationGateway {
    fn send(&self, destination: &str, message: &str) -> AppResult<()>;
}

/// Directory backed by the local `workers` table.
pub struct SqliteDirectory<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteDirectory<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl WorkerDirectory for SqliteDirectory<'_> {
    fn worker(&self, id: &str) -> AppResult<Option<WorkerContact>> {
        workers::get_worker(self.conn, id)
    }
}

/// Directory wrapper with a bounded TTL cache, owned by the caller.
/// The long-running watch loop uses this so repeated reminder passes do
/// not re-query the directory for the same workers every cycle.
pub struct CachedDirectory<D: WorkerDirectory> {
    inner: D,
    cache: RefCell<TtlCache<String, Option<WorkerContact>>>,
}

impl<D: WorkerDirectory> CachedDirectory<D> {
    pub fn new(inner: D, capacity: usize, ttl: Duration) -> Self {
        Self {
            inner,
            cache: RefCell::new(TtlCache::new(capacity, ttl)),
        }
    }
}

impl<D: WorkerDirectory> WorkerDirectory for CachedDirectory<D> {
    fn worker(&self, id: &str) -> AppResult<Option<WorkerContact>> {
        if let Some(hit) = self.cache.borrow_mut().get(id) {
            return Ok(hit);
        }
        let contact = self.inner.worker(id)?;
        self.cache
            .borrow_mut()
            .put(id.to_string(), contact.clone());
        Ok(contact)
    }
}

/// Transport that prints to the console and always succeeds. Useful for
/// stand-alone installs and for demos; real deployments plug a bridge in.
pub struct ConsoleGateway;

impl NotificationGateway for ConsoleGateway {
    fn send(&self, destination: &str, message: &str) -> AppResult<()> {
        crate::ui::messages::info(format!("[notify {}] {}", destination, message));
        Ok(())
    }
}
