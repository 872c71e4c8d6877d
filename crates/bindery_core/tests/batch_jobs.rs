use bindery_core::{
    BatchItem, ItemOutcome, JobFailure, JobOutcome, JobQueue, JobState, Progress,
    ReconcileReport,
};
use pretty_assertions::assert_eq;

fn items(names: &[&str]) -> Vec<BatchItem> {
    names
        .iter()
        .map(|name| BatchItem::new(*name, format!("Convert {name}")))
        .collect()
}

fn outcome_of(queue: &JobQueue, identity: &str) -> (JobState, Option<JobOutcome>) {
    let job = queue
        .jobs()
        .iter()
        .find(|job| job.identity == identity)
        .expect("job exists");
    (job.state, job.outcome.clone())
}

#[test]
fn submitted_jobs_are_pending_in_order() {
    let mut queue = JobQueue::new();
    let batch = queue.submit_batch(items(&["a", "b", "c"]));

    let labels: Vec<_> = queue.batch_jobs(batch).map(|job| job.label.as_str()).collect();
    assert_eq!(labels, vec!["Convert a", "Convert b", "Convert c"]);
    assert!(queue.jobs().iter().all(|job| job.state == JobState::Pending));
    assert_eq!(queue.progress(batch), Progress { done: 0, total: 3 });
}

#[test]
fn partial_response_fails_missing_items() {
    let mut queue = JobQueue::new();
    let batch = queue.submit_batch(items(&["a", "b", "c"]));

    let report = queue.reconcile(batch, Ok(vec![ItemOutcome::success("b")]));

    assert_eq!(
        report,
        ReconcileReport {
            succeeded: 1,
            failed: 0,
            missing: 2
        }
    );
    assert_eq!(outcome_of(&queue, "b"), (JobState::Done, Some(JobOutcome::Success)));
    for missing in ["a", "c"] {
        let (state, outcome) = outcome_of(&queue, missing);
        assert_eq!(state, JobState::Done);
        let Some(JobOutcome::Failure(failure)) = outcome else {
            panic!("expected failure for {missing}");
        };
        assert_eq!(failure, JobFailure::MissingOutcome);
        assert_eq!(failure.to_string(), "missing from response");
    }
}

#[test]
fn network_failure_fails_whole_batch() {
    let mut queue = JobQueue::new();
    let batch = queue.submit_batch(items(&["a", "b"]));

    queue.reconcile(batch, Err("connection refused".to_string()));

    for name in ["a", "b"] {
        assert_eq!(
            outcome_of(&queue, name),
            (
                JobState::Done,
                Some(JobOutcome::Failure(JobFailure::Batch(
                    "connection refused".to_string()
                )))
            )
        );
    }
    assert_eq!(queue.progress(batch).percent(), 100);
}

#[test]
fn every_job_settles_for_any_response_length() {
    let names = ["a", "b", "c", "d", "e"];
    for answered in 0..=names.len() {
        let mut queue = JobQueue::new();
        let batch = queue.submit_batch(items(&names));
        let outcomes = names[..answered]
            .iter()
            .rev()
            .map(|name| ItemOutcome::failure(*name, "bad epub"))
            .collect();

        queue.reconcile(batch, Ok(outcomes));

        assert!(
            queue.jobs().iter().all(|job| job.state == JobState::Done),
            "pending job left with {answered} outcomes"
        );
        assert_eq!(queue.progress(batch), Progress { done: 5, total: 5 });
    }
}

#[test]
fn item_failure_does_not_affect_siblings() {
    let mut queue = JobQueue::new();
    let batch = queue.submit_batch(items(&["a", "b"]));

    queue.reconcile(
        batch,
        Ok(vec![
            ItemOutcome::failure("a", "pandoc exited 1"),
            ItemOutcome::success("b"),
            ItemOutcome::success("not-requested"),
        ]),
    );

    assert_eq!(
        outcome_of(&queue, "a").1,
        Some(JobOutcome::Failure(JobFailure::Item("pandoc exited 1".to_string())))
    );
    assert_eq!(outcome_of(&queue, "b").1, Some(JobOutcome::Success));
    assert_eq!(queue.jobs().len(), 2);
}

#[test]
fn matching_is_exact() {
    let mut queue = JobQueue::new();
    let batch = queue.submit_batch(items(&["Book.epub"]));

    queue.reconcile(batch, Ok(vec![ItemOutcome::success("book.epub")]));

    assert_eq!(
        outcome_of(&queue, "Book.epub").1,
        Some(JobOutcome::Failure(JobFailure::MissingOutcome))
    );
}

#[test]
fn batches_reconcile_independently() {
    let mut queue = JobQueue::new();
    let first = queue.submit_batch(items(&["a"]));
    let second = queue.submit_batch(items(&["a", "b"]));

    queue.reconcile(second, Ok(vec![ItemOutcome::success("a")]));

    assert_eq!(queue.progress(first), Progress { done: 0, total: 1 });
    assert_eq!(queue.progress(second), Progress { done: 2, total: 2 });
    assert_eq!(queue.overall_progress(), Progress { done: 2, total: 3 });
    assert_eq!(queue.overall_progress().percent(), 67);

    queue.reconcile(first, Err("timeout".to_string()));
    assert_eq!(queue.overall_progress().percent(), 100);
}

#[test]
fn settled_batch_is_not_reconciled_twice() {
    let mut queue = JobQueue::new();
    let batch = queue.submit_batch(items(&["a"]));
    queue.reconcile(batch, Ok(vec![ItemOutcome::success("a")]));

    let report = queue.reconcile(batch, Err("late failure".to_string()));

    assert_eq!(report, ReconcileReport::default());
    assert_eq!(outcome_of(&queue, "a").1, Some(JobOutcome::Success));
}

#[test]
fn complete_settles_single_result_batches() {
    let mut queue = JobQueue::new();
    let ok = queue.submit_batch([BatchItem::new("book", "Merge 3 md files")]);
    let failed = queue.submit_batch([BatchItem::new("book", "Merge 2 md files")]);

    queue.complete(ok, Ok(()));
    queue.complete(failed, Err("500 Internal Server Error".to_string()));

    let outcomes: Vec<_> = queue.jobs().iter().map(|job| job.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            Some(JobOutcome::Success),
            Some(JobOutcome::Failure(JobFailure::Batch(
                "500 Internal Server Error".to_string()
            ))),
        ]
    );
}

#[test]
fn clear_empties_queue_and_progress() {
    let mut queue = JobQueue::new();
    let batch = queue.submit_batch(items(&["a", "b"]));
    queue.clear();

    assert!(queue.is_empty());
    assert_eq!(queue.overall_progress().percent(), 0);
    // A response for a cleared batch has nothing left to settle.
    let report = queue.reconcile(batch, Ok(vec![ItemOutcome::success("a")]));
    assert_eq!(report, ReconcileReport::default());
}
