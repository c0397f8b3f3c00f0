use std::time::Duration;

use contactbook_signals::*;
use tokio::time::{sleep, Instant};
mod common;
use common::change_watcher;

#[tokio::test(start_paused = true)]
async fn test_search_shaped_pipeline() {
    let query = Mut::cold();
    let start = Instant::now();
    let results = query.read().distinct().debounce(Duration::from_millis(300)).switch_latest(|term: String| {
        let loading = format!("loading {term}");
        Read::from_future(async move {
            sleep(Duration::from_millis(50)).await;
            format!("results for {term}")
        })
        .start_with(loading)
    });

    let (watcher, check) = change_watcher();
    let _sub = results.subscribe(move |v: String| watcher((v, start.elapsed().as_millis())));

    query.set("a".to_string());
    sleep(Duration::from_millis(100)).await;
    query.set("ab".to_string());
    query.set("ab".to_string());
    sleep(Duration::from_millis(500)).await;

    assert_eq!(check(), [("loading ab".to_string(), 400), ("results for ab".to_string(), 450)]);
}

#[tokio::test(start_paused = true)]
async fn test_take_ends_async_pipeline() {
    let source = Mut::cold();
    let first_two = source.read().then(|v: u32| async move { v * 2 }).take(2);

    let (watcher, check) = change_watcher();
    let _sub = first_two.subscribe(watcher);

    for v in 1..=4 {
        source.set(v);
        tokio::task::yield_now().await;
    }
    sleep(Duration::from_millis(1)).await;
    assert_eq!(check(), [2, 4]);
    assert!(first_two.is_closed());
}

#[tokio::test]
async fn test_into_stream_ends_with_signal() {
    use futures::StreamExt;

    let source = Mut::cold();
    let stream = source.read().map(|v: u8| v * 10).into_stream();
    source.set(1);
    source.set(2);
    source.close();
    assert_eq!(stream.collect::<Vec<_>>().await, vec![10, 20]);
}
