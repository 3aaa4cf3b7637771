mod common;
use bill_analyst::{Run, RunStatus};
use common::{client_for, RunSequence};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

const POLL: Duration = Duration::from_millis(10);

fn created_run(status: RunStatus) -> Run {
    Run {
        id: "run_1".to_string(),
        thread_id: "thread_1".to_string(),
        assistant_id: "asst_1".to_string(),
        status,
    }
}

async fn mount_run_sequence(server: &MockServer, statuses: Vec<&'static str>, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/threads/thread_1/runs/run_1"))
        .respond_with(RunSequence::new(statuses))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_completed_on_first_poll_stops_after_one_request() {
    let server = MockServer::start().await;
    mount_run_sequence(&server, vec!["completed"], 1).await;

    let client = client_for(&server);
    let mut out = Vec::new();
    let run = client
        .wait_for_run(created_run(RunStatus::Queued), POLL, &mut out)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(String::from_utf8(out).unwrap(), "Run status: completed\n");
}

#[tokio::test]
async fn test_polls_through_non_terminal_statuses() {
    let server = MockServer::start().await;
    mount_run_sequence(
        &server,
        vec!["queued", "in_progress", "requires_action", "expired", "incomplete", "failed"],
        6,
    )
    .await;

    let client = client_for(&server);
    let mut out = Vec::new();
    let run = client
        .wait_for_run(created_run(RunStatus::Queued), POLL, &mut out)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Failed);
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.lines().count(), 6);
    assert!(out.contains("Run status: expired\n"));
    assert!(out.ends_with("Run status: failed\n"));
}

#[tokio::test]
async fn test_unknown_status_keeps_polling_until_cancelled() {
    let server = MockServer::start().await;
    mount_run_sequence(&server, vec!["something_new", "cancelling", "cancelled"], 3).await;

    let client = client_for(&server);
    let mut out = Vec::new();
    let run = client
        .wait_for_run(created_run(RunStatus::InProgress), POLL, &mut out)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Cancelled);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Run status: something_new\nRun status: cancelling\nRun status: cancelled\n"
    );
}

#[tokio::test]
async fn test_already_terminal_run_is_not_polled() {
    let server = MockServer::start().await;
    mount_run_sequence(&server, vec!["completed"], 0).await;

    let client = client_for(&server);
    let mut out: Vec<u8> = Vec::new();
    let run = client
        .wait_for_run(created_run(RunStatus::Completed), POLL, &mut out)
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert!(out.is_empty());
}
