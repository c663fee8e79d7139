use roster_core::{
    AutoRefresh, MemoryKeyValueStore, ParticipantRepository, ParticipantSnapshot,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn counting_repo() -> (
    Arc<ParticipantRepository<MemoryKeyValueStore>>,
    Arc<AtomicUsize>,
) {
    let repo = Arc::new(ParticipantRepository::new(MemoryKeyValueStore::new()));
    let pushes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pushes);
    repo.subscribe(move |_: &ParticipantSnapshot| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (repo, pushes)
}

#[tokio::test(start_paused = true)]
async fn reloads_once_per_period_until_stopped() {
    let (repo, pushes) = counting_repo();
    let mut refresher = AutoRefresh::start(Arc::clone(&repo), Duration::from_secs(30)).unwrap();
    assert!(refresher.is_running());

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(pushes.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(66)).await;
    assert_eq!(pushes.load(Ordering::SeqCst), 3);

    refresher.stop();
    refresher.stop();
    assert!(!refresher.is_running());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(pushes.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_reloads() {
    let (repo, pushes) = counting_repo();
    {
        let _refresher = AutoRefresh::start(Arc::clone(&repo), Duration::from_secs(10)).unwrap();
        tokio::time::sleep(Duration::from_secs(15)).await;
    }
    assert_eq!(pushes.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(pushes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_period_is_rejected() {
    let (repo, _) = counting_repo();
    let err = AutoRefresh::start(repo, Duration::ZERO).err().unwrap();
    assert!(err.contains("greater than zero"));
}

#[test]
fn start_outside_runtime_is_rejected() {
    let (repo, _) = counting_repo();
    let err = AutoRefresh::start(repo, Duration::from_secs(1)).err().unwrap();
    assert!(err.contains("tokio runtime"));
}
