use nomenclator_lib::export::PairLog;
use nomenclator_lib::names::RemoteNames;
use nomenclator_lib::runner::{stop_signal, Outcome, RunConfig, Runner};
use nomenclator_lib::store::PairStore;
use nomenclator_lib::NomenError;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

enum Reply {
    Answer(u16, &'static str),
    // read the request, then keep the connection open without answering
    Silent,
}

// answers one request per canned reply, then stops listening
async fn serve(replies: Vec<Reply>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for reply in replies {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let (status, body) = match reply {
                Reply::Answer(status, body) => (status, body),
                Reply::Silent => {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        drop(stream);
                    });
                    continue;
                }
            };
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });

    format!("http://{}/name", addr)
}

#[tokio::test]
async fn name_is_read_from_payload() {
    let url = serve(vec![Reply::Answer(200, r#"{"name":"quiet-heron"}"#)]).await;
    let names = RemoteNames::new(url);
    assert_eq!(names.request_name().await.unwrap(), "quiet-heron");
}

#[tokio::test]
async fn malformed_payload_is_source_unavailable() {
    let url = serve(vec![
        Reply::Answer(200, r#"{"title":"quiet-heron"}"#),
        Reply::Answer(200, r#"{"name":"  "}"#),
    ])
    .await;
    let names = RemoteNames::new(url);

    let err = names.request_name().await.unwrap_err();
    assert!(matches!(err, NomenError::SourceUnavailable(_)), "{}", err);
    let err = names.request_name().await.unwrap_err();
    assert!(matches!(err, NomenError::SourceUnavailable(_)), "{}", err);
}

#[tokio::test]
async fn error_status_is_source_unavailable() {
    let url = serve(vec![Reply::Answer(503, "{}")]).await;
    let err = RemoteNames::new(url).request_name().await.unwrap_err();
    assert!(matches!(err, NomenError::SourceUnavailable(_)));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn unreachable_source_is_source_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = RemoteNames::new(format!("http://{}/name", addr))
        .request_name()
        .await
        .unwrap_err();
    assert!(matches!(err, NomenError::SourceUnavailable(_)));
}

#[tokio::test]
async fn repeated_remote_names_overwrite() {
    let url = serve(vec![
        Reply::Answer(200, r#"{"name":"red-fox"}"#),
        Reply::Answer(500, "{}"),
        Reply::Answer(200, r#"{"name":"blue-owl"}"#),
        Reply::Answer(200, r#"{"name":"red-fox"}"#),
    ])
    .await;

    let dir = tempfile::tempdir().unwrap();
    let store = PairStore::open(dir.path().join("keys.db")).unwrap();
    let log = PairLog::new();
    let (_handle, stop) = stop_signal();

    let mut runner = Runner::new(RemoteNames::new(url), store.clone(), RunConfig::new(3))
        .with_pair_log(log.clone());
    let report = runner.run(&stop).await;

    assert!(matches!(report.outcome, Outcome::Completed));
    assert_eq!(report.state.completed, 3);

    let pairs = log.snapshot().await;
    let names: Vec<&str> = pairs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["red-fox", "blue-owl", "red-fox"]);

    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(store.get("red-fox").unwrap(), Some(pairs[2].key));
    assert_ne!(pairs[0].key, pairs[2].key);
}

#[tokio::test]
async fn silent_source_times_out_and_run_moves_on() {
    let url = serve(vec![
        Reply::Answer(200, r#"{"name":"red-fox"}"#),
        Reply::Silent,
        Reply::Answer(200, r#"{"name":"blue-owl"}"#),
    ])
    .await;

    let dir = tempfile::tempdir().unwrap();
    let store = PairStore::open(dir.path().join("keys.db")).unwrap();
    let log = PairLog::new();
    let (_handle, stop) = stop_signal();

    let config = RunConfig::new(2).with_timeout(Duration::from_millis(200));
    let mut runner = Runner::new(RemoteNames::new(url), store.clone(), config)
        .with_pair_log(log.clone());
    let report = runner.run(&stop).await;

    assert!(matches!(report.outcome, Outcome::Completed));
    assert_eq!(report.state.completed, 2);
    assert_eq!(report.state.in_flight, 0);

    let pairs = log.snapshot().await;
    let names: Vec<&str> = pairs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["red-fox", "blue-owl"]);
    assert_eq!(store.len().unwrap(), 2);
    for pair in &pairs {
        assert_eq!(store.get(&pair.name).unwrap(), Some(pair.key));
    }
}
