use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use festiva_atoms::packages::model::EventPackage;
use festiva_atoms::reviews::model::Review;
use festiva_atoms::tasks::model::VendorTask;
use festiva_atoms::users::model::User;

/// Collections the dashboard mirrors in full.
pub const MIRRORED_COLLECTIONS: [&str; 4] = ["vendors", "tasks", "reviews", "packages"];

/// One full-collection emission broadcast from the stream processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub collection: String,
    pub documents: Vec<serde_json::Value>,
}

/// Decode a snapshot's documents into typed records. Fails on the first
/// document that does not match the expected shape, so a bad emission never
/// partially replaces a mirror.
pub fn parse_snapshot<T: DeserializeOwned>(snapshot: &CollectionSnapshot) -> Result<Vec<T>, String> {
    let mut records = Vec::with_capacity(snapshot.documents.len());
    for (i, doc) in snapshot.documents.iter().enumerate() {
        let record = serde_json::from_value(doc.clone())
            .map_err(|e| format!("document {} of {}: {}", i, snapshot.collection, e))?;
        records.push(record);
    }
    Ok(records)
}

/// Continuously-replaced local copy of one collection.
#[derive(Debug, Clone)]
pub struct Mirror<T> {
    data: Arc<RwLock<Vec<T>>>,
}

impl<T: Clone> Mirror<T> {
    pub fn new() -> Self {
        Mirror {
            data: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn snapshot(&self) -> Vec<T> {
        self.data.read().await.clone()
    }

    async fn replace(&self, records: Vec<T>) {
        *self.data.write().await = records;
    }
}

impl<T: Clone> Default for Mirror<T> {
    fn default() -> Self {
        Mirror::new()
    }
}

fn spawn_mirror<T>(
    mirror: Mirror<T>,
    collection: &'static str,
    mut rx: broadcast::Receiver<CollectionSnapshot>,
) -> JoinHandle<()>
where
    T: Clone + DeserializeOwned + Send + Sync + 'static,
{
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    if snapshot.collection != collection {
                        continue;
                    }
                    match parse_snapshot::<T>(&snapshot) {
                        Ok(records) => mirror.replace(records).await,
                        Err(e) => {
                            tracing::warn!("Dropping malformed {} snapshot: {}", collection, e);
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("{} mirror lagged, skipped {} emissions", collection, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// The four dashboard mirrors plus the tasks keeping them fresh. Each
/// collection is an independent failure domain: a bad emission for one never
/// disturbs the others.
pub struct LiveMirrors {
    pub vendors: Mirror<User>,
    pub tasks: Mirror<VendorTask>,
    pub reviews: Mirror<Review>,
    pub packages: Mirror<EventPackage>,
    handles: Vec<JoinHandle<()>>,
}

impl LiveMirrors {
    /// Attach a fresh set of mirrors to a snapshot broadcast channel.
    pub fn subscribe(tx: &broadcast::Sender<CollectionSnapshot>) -> Self {
        let vendors = Mirror::new();
        let tasks = Mirror::new();
        let reviews = Mirror::new();
        let packages = Mirror::new();

        let handles = vec![
            spawn_mirror(vendors.clone(), "vendors", tx.subscribe()),
            spawn_mirror(tasks.clone(), "tasks", tx.subscribe()),
            spawn_mirror(reviews.clone(), "reviews", tx.subscribe()),
            spawn_mirror(packages.clone(), "packages", tx.subscribe()),
        ];

        LiveMirrors {
            vendors,
            tasks,
            reviews,
            packages,
            handles,
        }
    }

    /// Stop all mirror tasks.
    pub fn shutdown(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for LiveMirrors {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn vendor_doc(uid: &str, name: &str) -> serde_json::Value {
        json!({
            "uid": uid,
            "name": name,
            "email": format!("{}@example.com", uid),
            "role": "vendor",
            "status": "active",
            "created_at": "2024-01-01T00:00:00Z",
        })
    }

    fn snapshot(collection: &str, documents: Vec<serde_json::Value>) -> CollectionSnapshot {
        CollectionSnapshot {
            collection: collection.to_string(),
            documents,
        }
    }

    async fn wait_for<T: Clone>(mirror: &Mirror<T>, len: usize) -> Vec<T> {
        for _ in 0..50 {
            let records = mirror.snapshot().await;
            if records.len() == len {
                return records;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        mirror.snapshot().await
    }

    #[test]
    fn parse_snapshot_rejects_malformed_documents() {
        let snap = snapshot("vendors", vec![vendor_doc("v1", "Ada"), json!("not an object")]);
        assert!(parse_snapshot::<User>(&snap).is_err());

        let snap = snapshot("vendors", vec![vendor_doc("v1", "Ada")]);
        let vendors = parse_snapshot::<User>(&snap).unwrap();
        assert_eq!(vendors[0].name, "Ada");
    }

    #[tokio::test]
    async fn emission_replaces_wholesale() {
        let (tx, _) = broadcast::channel(16);
        let mirrors = LiveMirrors::subscribe(&tx);

        tx.send(snapshot(
            "vendors",
            vec![vendor_doc("v1", "Ada"), vendor_doc("v2", "Grace")],
        ))
        .unwrap();
        let vendors = wait_for(&mirrors.vendors, 2).await;
        assert_eq!(vendors.len(), 2);

        tx.send(snapshot("vendors", vec![vendor_doc("v3", "Edsger")]))
            .unwrap();
        let vendors = wait_for(&mirrors.vendors, 1).await;
        assert_eq!(vendors[0].uid, "v3");
    }

    #[tokio::test]
    async fn collections_fail_independently() {
        let (tx, _) = broadcast::channel(16);
        let mirrors = LiveMirrors::subscribe(&tx);

        tx.send(snapshot("vendors", vec![vendor_doc("v1", "Ada")]))
            .unwrap();
        wait_for(&mirrors.vendors, 1).await;

        // A malformed vendors emission leaves the prior data in place and
        // does not disturb the other mirrors.
        tx.send(snapshot("vendors", vec![json!(42)])).unwrap();
        tx.send(snapshot(
            "packages",
            vec![json!({
                "package_id": "p1",
                "name": "Gold",
                "category": "catering",
                "price": 1200.0,
                "description": "",
                "created_at": "2024-01-01T00:00:00Z",
            })],
        ))
        .unwrap();

        let packages = wait_for(&mirrors.packages, 1).await;
        assert_eq!(packages[0].package_id, "p1");
        assert_eq!(mirrors.vendors.snapshot().await.len(), 1);
    }
}
