use std::{
    sync::{
        mpsc,
        Arc,
    },
    time::Duration,
};

use tokio::runtime::{
    Builder,
    Runtime,
};
use tracing::debug;

use super::TaskResult;
use crate::{
    core::{
        Coordinate,
        EnrichmentTicket,
        TaberuError,
    },
    directory::DirectoryClient,
    reviews::{
        enrich,
        ReviewsClient,
    },
};

/// Runs network calls on a background runtime and hands their results back to
/// the control thread, which applies them with [`TaskManager::poll_results`].
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    directory: Arc<dyn DirectoryClient>,
    reviews: Arc<dyn ReviewsClient>,
}

impl TaskManager {
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        reviews: Arc<dyn ReviewsClient>,
    ) -> Result<Self, TaberuError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("taberu-net")
            .enable_all()
            .build()?;

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime: Arc::new(runtime), receiver, sender, directory, reviews })
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    /// Blocks up to `timeout` for the first result, then drains whatever else is ready.
    pub fn wait_results(&mut self, timeout: Duration) -> Vec<TaskResult> {
        match self.receiver.recv_timeout(timeout) {
            Ok(first) => {
                let mut results = vec![first];
                results.extend(self.poll_results());
                results
            }
            Err(_) => Vec::new(),
        }
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    pub fn fetch_directory(&self, at: Coordinate) {
        let (sender, runtime) = self.task_context();
        let directory = self.directory.clone();

        runtime.spawn(async move {
            let result = directory
                .nearby(at)
                .await
                .map_err(|e| TaberuError::DirectoryFetchFailed(e.to_string()));
            let _ = sender.send(TaskResult::Directory(result));
        });
    }

    /// Issues the resolve-then-fetch pair for one ticket. Never cancelled.
    pub fn enrich(&self, ticket: EnrichmentTicket, at: Coordinate) {
        let (sender, runtime) = self.task_context();
        let client = self.reviews.clone();

        debug!(issued_id = ticket.issued_id, name = ticket.candidate.display_name(), "Enriching");
        runtime.spawn(async move {
            let result = enrich(client.as_ref(), &ticket.candidate, at).await;
            let _ = sender.send(TaskResult::Enrichment { issued_id: ticket.issued_id, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{
        core::Candidate,
        reviews::Review,
    };

    struct FixedDirectory(Vec<&'static str>);

    #[async_trait]
    impl DirectoryClient for FixedDirectory {
        async fn nearby(&self, _at: Coordinate) -> Result<Vec<Candidate>, TaberuError> {
            Ok(self
                .0
                .iter()
                .map(|name| Candidate { name: Some(name.to_string()), ..Default::default() })
                .collect())
        }
    }

    struct DownDirectory;

    #[async_trait]
    impl DirectoryClient for DownDirectory {
        async fn nearby(&self, _at: Coordinate) -> Result<Vec<Candidate>, TaberuError> {
            Err(TaberuError::Http { status: 502, url: "http://localhost/local".to_string() })
        }
    }

    /// "Alpha" resolves last so completions arrive out of issue order.
    struct SlowReviews;

    #[async_trait]
    impl ReviewsClient for SlowReviews {
        async fn resolve_business(
            &self,
            name: &str,
            _at: Coordinate,
        ) -> Result<Option<String>, TaberuError> {
            let delay = if name == "Alpha" { 150 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(Some(format!("id-{name}")))
        }

        async fn fetch_reviews(&self, _business_id: &str) -> Result<Vec<Review>, TaberuError> {
            Ok(vec![Review::new(4.0, "Solid")])
        }
    }

    fn collect(manager: &mut TaskManager, expected: usize) -> Vec<TaskResult> {
        let mut results = Vec::new();
        while results.len() < expected {
            let batch = manager.wait_results(Duration::from_secs(5));
            assert!(!batch.is_empty(), "timed out waiting for task results");
            results.extend(batch);
        }
        results
    }

    fn ticket(issued_id: u32, name: &str) -> EnrichmentTicket {
        EnrichmentTicket {
            issued_id,
            candidate: Candidate { name: Some(name.to_string()), ..Default::default() },
        }
    }

    #[test]
    fn test_directory_results_come_back() {
        let mut manager = TaskManager::new(
            Arc::new(FixedDirectory(vec!["Lazo", "Qdoba"])),
            Arc::new(SlowReviews),
        )
        .unwrap();

        manager.fetch_directory(Coordinate::new(39.74, -104.99));
        let results = collect(&mut manager, 1);

        assert_eq!(results[0].task_type(), "directory");
        match &results[0] {
            TaskResult::Directory(Ok(candidates)) => assert_eq!(candidates.len(), 2),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_directory_failure_is_classified() {
        let mut manager = TaskManager::new(
            Arc::new(DownDirectory),
            Arc::new(SlowReviews),
        )
        .unwrap();

        manager.fetch_directory(Coordinate::new(0.0, 0.0));
        let results = collect(&mut manager, 1);
        assert!(matches!(
            results[0],
            TaskResult::Directory(Err(TaberuError::DirectoryFetchFailed(_)))
        ));
    }

    #[test]
    fn test_enrichments_complete_out_of_order() {
        let mut manager = TaskManager::new(
            Arc::new(FixedDirectory(Vec::new())),
            Arc::new(SlowReviews),
        )
        .unwrap();

        let at = Coordinate::new(0.0, 0.0);
        manager.enrich(ticket(1, "Alpha"), at);
        manager.enrich(ticket(2, "Beta"), at);

        let order: Vec<u32> = collect(&mut manager, 2)
            .into_iter()
            .map(|result| match result {
                TaskResult::Enrichment { issued_id, result } => {
                    assert!(result.is_ok());
                    issued_id
                }
                other => panic!("unexpected result {other:?}"),
            })
            .collect();

        assert_eq!(order, vec![2, 1]);
    }
}
