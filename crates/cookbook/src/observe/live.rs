//! Live query handles and the bridge task behind them.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_stream::Stream;

use cookbook_core::recipe::Recipe;
use cookbook_core::storage::{LocalStore, StoreChange};

use super::Query;

/// First wait before re-running a query whose evaluation failed.
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Upper bound for the retry backoff.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// A registered query whose result is re-delivered after every relevant commit.
///
/// Delivery goes through a watch channel, so a slow reader skips straight to
/// the latest result. Dropping the handle stops the bridge task.
pub struct LiveQuery<T> {
    receiver: watch::Receiver<Option<T>>,
    bridge: JoinHandle<()>,
}

impl<T> LiveQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Registers `query` and starts its bridge task.
    ///
    /// Must be called within a Tokio runtime. `project` shapes the raw
    /// recipe list into the delivered value.
    pub(crate) fn spawn(
        store: Arc<dyn LocalStore>,
        query: Query,
        project: fn(Vec<Recipe>) -> T,
    ) -> Self {
        let (sender, receiver) = watch::channel(None);
        let changes = store.subscribe_changes();
        tracing::debug!(?query, "Registered live query");

        let bridge = tokio::spawn(run_bridge(store, query, project, changes, sender));
        Self { receiver, bridge }
    }

    /// Waits for the next delivery not yet seen by this handle.
    ///
    /// The first call resolves with the initial evaluation. Returns `None`
    /// once the bridge has stopped.
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        self.receiver.borrow_and_update().clone()
    }

    /// The most recent delivery, `None` before the first evaluation lands.
    pub fn latest(&self) -> Option<T> {
        self.receiver.borrow().clone()
    }

    /// Converts the handle into a stream of deliveries.
    ///
    /// The bridge stops when the stream is dropped.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send {
        let mut live = self;
        async_stream::stream! {
            while let Some(result) = live.next().await {
                yield result;
            }
        }
    }

    /// Runs `callback` for every delivery on the runtime behind `handle`.
    ///
    /// Dropping the returned [`Subscription`] stops delivery and releases
    /// the query.
    pub fn deliver_on<F>(self, handle: &Handle, mut callback: F) -> Subscription
    where
        F: FnMut(T) + Send + 'static,
    {
        let mut live = self;
        let task = handle.spawn(async move {
            while let Some(result) = live.next().await {
                callback(result);
            }
        });
        Subscription { task }
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.bridge.abort();
    }
}

/// Callback registration created by [`LiveQuery::deliver_on`].
///
/// Delivery stops when this is dropped.
#[must_use = "delivery stops as soon as the subscription is dropped"]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Stops delivery. Same as dropping the subscription.
    pub fn cancel(self) {}

    /// Returns true if delivery has stopped on its own.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_bridge<T>(
    store: Arc<dyn LocalStore>,
    query: Query,
    project: fn(Vec<Recipe>) -> T,
    mut changes: broadcast::Receiver<StoreChange>,
    sender: watch::Sender<Option<T>>,
) {
    let mut retry_in: Option<Duration> = None;
    loop {
        match query.evaluate(store.as_ref()).await {
            Ok(recipes) => {
                if sender.send(Some(project(recipes))).is_err() {
                    break;
                }
                retry_in = None;
            }
            // Keep the last good result and try again after a backoff, or
            // sooner if a relevant commit lands.
            Err(e) => {
                let delay = match retry_in {
                    Some(previous) => (previous * 2).min(MAX_RETRY_DELAY),
                    None => RETRY_DELAY,
                };
                tracing::warn!(?query, error = %e, ?delay, "Failed to evaluate live query");
                retry_in = Some(delay);
            }
        }

        if !wait_for_relevant_change(&query, &mut changes, &sender, retry_in).await {
            break;
        }
    }
    tracing::debug!(?query, "Live query stopped");
}

/// Returns false when the bridge should stop.
///
/// With `retry_in` set, also returns true once that delay has passed.
async fn wait_for_relevant_change<T>(
    query: &Query,
    changes: &mut broadcast::Receiver<StoreChange>,
    sender: &watch::Sender<Option<T>>,
    retry_in: Option<Duration>,
) -> bool {
    let retry = async {
        match retry_in {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(retry);

    loop {
        tokio::select! {
            _ = sender.closed() => return false,
            _ = &mut retry => return true,
            received = changes.recv() => match received {
                Ok(change) if query.is_affected_by(&change) => return true,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(?query, skipped, "Change feed lagged, re-evaluating");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::mpsc;
    use tokio_stream::StreamExt;

    use super::*;
    use crate::storage::{ChangeNotifier, InMemoryStore};
    use cookbook_core::recipe::User;
    use cookbook_core::storage::{
        ChangeFeed, RecipeStore, RepositoryError, Result as StoreResult, UserStore,
    };

    // Store whose change feed is published by hand and whose first
    // `failing_reads` scans fail.
    struct ScriptedStore {
        data: InMemoryStore,
        feed: ChangeNotifier,
        failing_reads: AtomicUsize,
    }

    impl ScriptedStore {
        fn new(failing_reads: usize) -> Self {
            Self {
                data: InMemoryStore::new(),
                feed: ChangeNotifier::new(),
                failing_reads: AtomicUsize::new(failing_reads),
            }
        }
    }

    #[async_trait]
    impl RecipeStore for ScriptedStore {
        async fn all_recipes(&self) -> StoreResult<Vec<Recipe>> {
            let failed = self
                .failing_reads
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failed {
                return Err(RepositoryError::QueryFailed("database is locked".to_string()));
            }
            self.data.all_recipes().await
        }

        async fn recipe(&self, id: &str) -> StoreResult<Option<Recipe>> {
            self.data.recipe(id).await
        }

        async fn upsert_recipe(&self, recipe: &Recipe) -> StoreResult<()> {
            self.data.upsert_recipe(recipe).await
        }

        async fn upsert_recipes(&self, recipes: &[Recipe]) -> StoreResult<()> {
            self.data.upsert_recipes(recipes).await
        }

        async fn delete_recipe(&self, id: &str) -> StoreResult<()> {
            self.data.delete_recipe(id).await
        }
    }

    #[async_trait]
    impl UserStore for ScriptedStore {
        async fn user(&self, id: &str) -> StoreResult<Option<User>> {
            self.data.user(id).await
        }

        async fn upsert_user(&self, user: &User) -> StoreResult<()> {
            self.data.upsert_user(user).await
        }
    }

    impl ChangeFeed for ScriptedStore {
        fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
            self.feed.subscribe()
        }
    }

    fn recipe(id: &str, last_updated: i64) -> Recipe {
        Recipe::new("alice", format!("Recipe {id}"), "")
            .with_id(id)
            .with_last_updated(last_updated)
    }

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    fn first(recipes: Vec<Recipe>) -> Option<Recipe> {
        recipes.into_iter().next()
    }

    #[tokio::test]
    async fn test_initial_evaluation_then_updates() {
        let store = Arc::new(InMemoryStore::new());
        store.upsert_recipe(&recipe("r1", 100)).await.unwrap();

        let mut live = LiveQuery::spawn(store.clone(), Query::AllRecipes, |all| all);
        assert_eq!(ids(&live.next().await.unwrap()), vec!["r1"]);

        store.upsert_recipe(&recipe("r2", 200)).await.unwrap();
        assert_eq!(ids(&live.next().await.unwrap()), vec!["r2", "r1"]);

        store.delete_recipe("r1").await.unwrap();
        assert_eq!(ids(&live.next().await.unwrap()), vec!["r2"]);
        assert_eq!(ids(&live.latest().unwrap()), vec!["r2"]);
    }

    #[tokio::test]
    async fn test_by_id_ignores_unrelated_commits() {
        let store = Arc::new(InMemoryStore::new());
        let mut live = LiveQuery::spawn(
            store.clone(),
            Query::RecipeById("r1".to_string()),
            first,
        );
        assert_eq!(live.next().await.unwrap(), None);

        store.upsert_recipe(&recipe("r2", 200)).await.unwrap();
        store.upsert_user(&User::new("alice", "Alice")).await.unwrap();
        let quiet = tokio::time::timeout(Duration::from_millis(50), live.next()).await;
        assert!(quiet.is_err());

        store.upsert_recipe(&recipe("r1", 100)).await.unwrap();
        assert_eq!(live.next().await.unwrap(), Some(recipe("r1", 100)));
    }

    #[tokio::test]
    async fn test_into_stream() {
        let store = Arc::new(InMemoryStore::new());
        let live = LiveQuery::spawn(store.clone(), Query::AllRecipes, |all| all);
        let stream = live.into_stream();
        tokio::pin!(stream);

        assert!(stream.next().await.unwrap().is_empty());

        store.upsert_recipe(&recipe("r1", 100)).await.unwrap();
        assert_eq!(ids(&stream.next().await.unwrap()), vec!["r1"]);
    }

    #[tokio::test]
    async fn test_deliver_on_runs_callback_until_dropped() {
        let store = Arc::new(InMemoryStore::new());
        let live = LiveQuery::spawn(store.clone(), Query::AllRecipes, |all| all);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let subscription = live.deliver_on(&Handle::current(), move |all: Vec<Recipe>| {
            let _ = tx.send(all.len());
        });
        assert_eq!(rx.recv().await, Some(0));

        store.upsert_recipe(&recipe("r1", 100)).await.unwrap();
        assert_eq!(rx.recv().await, Some(1));

        drop(subscription);
        store.upsert_recipe(&recipe("r2", 200)).await.unwrap();

        // The aborted task drops the callback and with it the sender.
        while let Some(len) = rx.recv().await {
            assert!(len <= 2);
        }
    }

    #[tokio::test]
    async fn test_dropping_live_query_stops_bridge() {
        let store = Arc::new(InMemoryStore::new());
        let mut live = LiveQuery::spawn(store.clone(), Query::AllRecipes, |all| all);
        live.next().await.unwrap();

        let bridge = live.bridge.abort_handle();
        drop(live);

        tokio::time::timeout(Duration::from_secs(1), async {
            while !bridge.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_lagged_feed_still_delivers_latest() {
        // More changes than the feed buffers.
        const BURST: usize = 300;

        let store = Arc::new(ScriptedStore::new(0));
        let mut live = LiveQuery::spawn(store.clone(), Query::AllRecipes, |all| all);
        assert!(live.next().await.unwrap().is_empty());

        for n in 0..BURST {
            let stamped = recipe(&format!("r{n}"), n as i64);
            store.data.upsert_recipe(&stamped).await.unwrap();
        }
        // Single-threaded runtime: the bridge cannot drain the feed during this loop.
        for n in 0..BURST {
            store.feed.publish(StoreChange::recipe_upserted(format!("r{n}")));
        }

        let latest = tokio::time::timeout(Duration::from_secs(1), live.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.len(), BURST);
        assert_eq!(latest[0].id, format!("r{}", BURST - 1));
    }

    #[tokio::test]
    async fn test_failed_first_evaluation_is_retried() {
        let store = Arc::new(ScriptedStore::new(2));
        store.data.upsert_recipe(&recipe("r1", 100)).await.unwrap();

        let mut live = LiveQuery::spawn(store.clone(), Query::AllRecipes, |all| all);

        // No commit is published, so only the retry can deliver.
        let first = tokio::time::timeout(Duration::from_secs(2), live.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ids(&first), vec!["r1"]);
        assert_eq!(store.failing_reads.load(Ordering::SeqCst), 0);
    }
}
