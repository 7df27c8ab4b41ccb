//! Client integration tests.
//!
//! Wire-level tests run against an in-process scripted TCP server that
//! asserts each incoming request line and answers with raw reply bytes.
//! Executor-level tests drive the client against scripted executors.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time;

use kvlink::client::Client;
use kvlink::connection::reply::Reply;
use kvlink::consts::TTL_NO_EXPIRY;
use kvlink::error::{CommandError, TransportError};
use kvlink::executor::Executor;
use kvlink::result::Outcome;

/// Spawn a server that accepts one connection, asserts each request line
/// against the script, and answers with the scripted raw bytes.
async fn serve_script(script: Vec<(&'static str, &'static [u8])>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        for (expected, reply) in script {
            let line = lines.next_line().await.unwrap().expect("client hung up");
            assert_eq!(line, expected);
            write_half.write_all(reply).await.unwrap();
        }
    });

    addr
}

/// An address with nothing listening on it.
async fn refused_addr() -> String {
    // Bind to an OS-assigned port, then drop the listener so connecting
    // to the port is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

#[tokio::test]
async fn connect_uses_first_reachable_address() {
    let unreachable = refused_addr().await;
    let reachable = serve_script(vec![("PING", b"+PONG\r\n")]).await;

    let mut client = Client::connect(&unreachable, &[reachable.as_str()])
        .await
        .expect("second address should be adopted");

    // The failure from the first address is gone from the success path.
    let pong = client.ping(None, None).await;
    assert!(pong.err().is_none());
    assert_eq!(pong.value(), Some("PONG"));
}

#[tokio::test]
async fn connect_reports_every_failed_address_in_order() {
    let first = refused_addr().await;
    let second = refused_addr().await;

    let err = Client::connect(&first, &[second.as_str()])
        .await
        .expect_err("no address is reachable");

    let attempts = err.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].addr, first);
    assert_eq!(attempts[1].addr, second);

    // Display enumerates each failure.
    let rendered = err.to_string();
    assert!(rendered.contains(&first));
    assert!(rendered.contains(&second));
}

#[tokio::test]
async fn set_then_get_roundtrip_over_the_wire() {
    let addr = serve_script(vec![
        ("SET foo bar", b"+OK\r\n"),
        ("GET foo", b"$3\r\nbar\r\n"),
    ])
    .await;

    let mut client = Client::connect(&addr, &[]).await.unwrap();

    let status = client.set("foo", "bar", None).await;
    assert!(status.is_ok());
    assert_eq!(status.message(), Some("OK"));

    let value = client.get("foo", None).await;
    assert!(value.err().is_none());
    assert_eq!(value.value(), Some("bar"));
}

#[tokio::test]
async fn hash_and_list_verbs_route_to_list_results() {
    let addr = serve_script(vec![
        ("HKEYS missing", b"*0\r\n"),
        ("LRANGE letters 0 -1", b"*2\r\n$1\r\na\r\n$1\r\nb\r\n"),
    ])
    .await;

    let mut client = Client::connect(&addr, &[]).await.unwrap();

    // Empty sequence is a valid outcome, distinct from an error.
    let keys = client.hkeys("missing", None).await;
    assert!(keys.err().is_none());
    assert!(keys.is_empty());

    let range = client.lrange("letters", 0, -1, None).await;
    assert!(range.err().is_none());
    assert_eq!(range.items(), ["a", "b"]);
}

#[tokio::test]
async fn ttl_without_expiration_decodes_to_the_sentinel() {
    let addr = serve_script(vec![("TTL eternal", b":-1\r\n")]).await;

    let mut client = Client::connect(&addr, &[]).await.unwrap();

    let ttl = client.ttl("eternal", None).await;
    assert!(ttl.err().is_none());
    assert_eq!(ttl.as_i64(), Some(TTL_NO_EXPIRY));
}

#[tokio::test]
async fn server_failure_lands_in_the_result() {
    let addr = serve_script(vec![("GET wrong", b"-ERR wrong kind of value\r\n")]).await;

    let mut client = Client::connect(&addr, &[]).await.unwrap();

    let value = client.get("wrong", None).await;
    match value.err() {
        Some(CommandError::Server(msg)) => assert_eq!(msg, "ERR wrong kind of value"),
        other => panic!("expected server error, got {:?}", other),
    }
    assert_eq!(value.value(), None);
    assert_eq!(value.as_i64(), None);
}

#[tokio::test]
async fn expire_and_del_report_status() {
    let addr = serve_script(vec![
        ("EXPIRE foo 10", b":1\r\n"),
        ("DEL foo", b":1\r\n"),
    ])
    .await;

    let mut client = Client::connect(&addr, &[]).await.unwrap();

    let expired = client.expire("foo", 10, None).await;
    assert!(expired.is_ok());
    assert_eq!(expired.message(), Some("1"));

    let deleted = client.del("foo", None).await;
    assert!(deleted.is_ok());
}

/// Executor that records request lines and pops scripted replies.
struct ScriptedExecutor {
    seen: Arc<Mutex<Vec<String>>>,
    replies: VecDeque<Result<Reply, TransportError>>,
}

impl ScriptedExecutor {
    fn new(replies: Vec<Result<Reply, TransportError>>) -> (ScriptedExecutor, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            ScriptedExecutor {
                seen: seen.clone(),
                replies: replies.into_iter().collect(),
            },
            seen,
        )
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn execute(&mut self, request: &str) -> Result<Reply, TransportError> {
        self.seen.lock().unwrap().push(request.to_string());
        self.replies.pop_front().expect("no scripted reply left")
    }
}

#[tokio::test]
async fn operations_compose_encode_execute_decode() {
    let (executor, seen) = ScriptedExecutor::new(vec![
        Ok(Reply::Status("OK".into())),
        Ok(Reply::Value("bar".into())),
        Ok(Reply::Int(2)),
    ]);
    let mut client = Client::with_executor(executor);

    let status = client.set("foo", "bar", None).await;
    assert!(status.is_ok());

    let value = client.get("foo", None).await;
    assert_eq!(value.value(), Some("bar"));

    let removed = client.hdel("h", "f1", &["f2"], None).await;
    assert_eq!(removed.as_i64(), Some(2));

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, ["SET foo bar", "GET foo", "HDEL h f1 f2"]);
}

#[tokio::test]
async fn transport_failure_is_wrapped_with_the_verb() {
    let (executor, _) = ScriptedExecutor::new(vec![Err(TransportError::Disconnect)]);
    let mut client = Client::with_executor(executor);

    let value = client.get("foo", None).await;
    match value.err() {
        Some(CommandError::Transport { verb, .. }) => assert_eq!(*verb, "GET"),
        other => panic!("expected transport error, got {:?}", other),
    }
    assert_eq!(value.value(), None);
}

/// Executor that never replies within any reasonable deadline.
struct StalledExecutor;

#[async_trait]
impl Executor for StalledExecutor {
    async fn execute(&mut self, _request: &str) -> Result<Reply, TransportError> {
        time::sleep(Duration::from_secs(3600)).await;
        Ok(Reply::Status("OK".into()))
    }
}

#[tokio::test(start_paused = true)]
async fn deadline_aborts_a_stalled_operation() {
    let mut client = Client::with_executor(StalledExecutor);

    let status = client.set("foo", "bar", Some(Duration::from_millis(50))).await;
    match status.err() {
        Some(CommandError::DeadlineExceeded { verb, limit }) => {
            assert_eq!(*verb, "SET");
            assert_eq!(*limit, Duration::from_millis(50));
        }
        other => panic!("expected deadline error, got {:?}", other),
    }
    assert!(!status.is_ok());
    assert!(status.message().is_none());
}
