//! Single source of truth for loaded sales data.
//!
//! The store owns the product, its sales rows, and the load lifecycle
//! (`Idle -> Loading -> Succeeded | Failed`). Views read immutable snapshots
//! and can register listeners that fire after every transition.

use std::sync::Arc;

use crate::domain::{Product, SaleRecord};
use crate::error::AppError;

use super::repository::SalesRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl LoadStatus {
    pub fn label(self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Succeeded => "succeeded",
            LoadStatus::Failed => "failed",
        }
    }
}

/// Immutable view of the store at one revision.
///
/// Cloning is cheap: product and rows are shared.
#[derive(Debug, Clone)]
pub struct SalesSnapshot {
    pub revision: u64,
    pub status: LoadStatus,
    pub product: Option<Arc<Product>>,
    pub sales: Arc<[SaleRecord]>,
    pub error: Option<String>,
}

type Listener = Box<dyn Fn(&SalesSnapshot) + Send>;

pub struct SalesStore {
    snapshot: SalesSnapshot,
    listeners: Vec<Listener>,
}

impl Default for SalesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesStore {
    pub fn new() -> Self {
        Self {
            snapshot: SalesSnapshot {
                revision: 0,
                status: LoadStatus::Idle,
                product: None,
                sales: Arc::from(Vec::new()),
                error: None,
            },
            listeners: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> SalesSnapshot {
        self.snapshot.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.snapshot.status
    }

    pub fn revision(&self) -> u64 {
        self.snapshot.revision
    }

    /// Register a change listener. It is called after each lifecycle signal.
    pub fn subscribe(&mut self, listener: impl Fn(&SalesSnapshot) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Mark a fetch as in flight. Previously loaded data stays readable.
    pub fn begin_load(&mut self) {
        self.snapshot.status = LoadStatus::Loading;
        self.commit();
    }

    pub fn load_succeeded(&mut self, product: Product, sales: Vec<SaleRecord>) {
        self.snapshot.status = LoadStatus::Succeeded;
        self.snapshot.product = Some(Arc::new(product));
        self.snapshot.sales = Arc::from(sales);
        self.snapshot.error = None;
        self.commit();
    }

    pub fn load_failed(&mut self, error: &AppError) {
        self.snapshot.status = LoadStatus::Failed;
        self.snapshot.error = Some(error.message().to_string());
        self.commit();
    }

    /// Run one fetch through the full lifecycle.
    ///
    /// The error is recorded in the store and also returned to the caller.
    pub fn load_from(&mut self, repo: &SalesRepository) -> Result<(), AppError> {
        self.begin_load();
        match repo.fetch().and_then(|raw| raw.into_parts()) {
            Ok((product, sales)) => {
                self.load_succeeded(product, sales);
                Ok(())
            }
            Err(err) => {
                self.load_failed(&err);
                Err(err)
            }
        }
    }

    fn commit(&mut self) {
        self.snapshot.revision += 1;
        tracing::debug!(
            revision = self.snapshot.revision,
            status = self.snapshot.status.label(),
            rows = self.snapshot.sales.len(),
            "sales store updated"
        );
        for listener in &self.listeners {
            listener(&self.snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::DataSource;

    #[test]
    fn starts_idle_and_empty() {
        let store = SalesStore::new();
        let snap = store.snapshot();
        assert_eq!(snap.status, LoadStatus::Idle);
        assert_eq!(snap.revision, 0);
        assert!(snap.product.is_none());
        assert!(snap.sales.is_empty());
    }

    #[test]
    fn successful_load_notifies_each_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut store = SalesStore::new();
        store.subscribe(move |snap| sink.lock().unwrap().push(snap.status));
        store.load_from(&SalesRepository::new(DataSource::Bundled)).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![LoadStatus::Loading, LoadStatus::Succeeded]
        );
        let snap = store.snapshot();
        assert_eq!(snap.revision, 2);
        assert!(snap.product.is_some());
        assert_eq!(snap.sales.len(), 52);
    }

    #[test]
    fn failed_load_records_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SalesRepository::new(DataSource::File(dir.path().join("missing.json")));

        let mut store = SalesStore::new();
        assert!(store.load_from(&repo).is_err());
        let snap = store.snapshot();
        assert_eq!(snap.status, LoadStatus::Failed);
        assert!(snap.error.as_deref().unwrap_or("").contains("missing.json"));
    }

    #[test]
    fn snapshots_are_isolated_from_later_loads() {
        let mut store = SalesStore::new();
        let before = store.snapshot();
        store.load_succeeded(Product::default(), Vec::new());
        assert_eq!(before.status, LoadStatus::Idle);
        assert_eq!(store.status(), LoadStatus::Succeeded);
        assert!(store.revision() > before.revision);
    }
}
