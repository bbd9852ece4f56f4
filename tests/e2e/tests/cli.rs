use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;
use rpcli_e2e::bank::bank_server::{Bank, BankServer};
use rpcli_e2e::bank::Amount;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::Stream;
use tonic::{Request, Response, Status, Streaming};

type AmountStream = Pin<Box<dyn Stream<Item = Result<Amount, Status>> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Received(i64),
    Completed(i64),
    Failed,
}

/// Records what the server saw of each call.
#[derive(Clone, Default)]
struct Ledger(Arc<Mutex<Vec<Event>>>);

impl Ledger {
    fn record(&self, event: Event) { self.0.lock().unwrap().push(event); }

    fn events(&self) -> Vec<Event> { self.0.lock().unwrap().clone() }

    async fn drain(&self, mut requests: Streaming<Amount>) -> Result<Vec<i64>, Status> {
        let mut units = Vec::new();
        loop {
            match requests.message().await {
                Ok(Some(amount)) => {
                    self.record(Event::Received(amount.units));
                    units.push(amount.units);
                }
                Ok(None) => return Ok(units),
                Err(status) => {
                    self.record(Event::Failed);
                    return Err(status);
                }
            }
        }
    }
}

#[tonic::async_trait]
impl Bank for Ledger {
    async fn deposit(&self, request: Request<Amount>) -> Result<Response<Amount>, Status> {
        let units = request.into_inner().units;
        self.record(Event::Completed(units));
        Ok(Response::new(Amount { units: units + 100 }))
    }

    async fn upload(&self, request: Request<Streaming<Amount>>) -> Result<Response<Amount>, Status> {
        let total: i64 = self.drain(request.into_inner()).await?.iter().sum();
        self.record(Event::Completed(total));
        Ok(Response::new(Amount { units: total }))
    }

    type WatchStream = AmountStream;

    async fn watch(&self, request: Request<Amount>) -> Result<Response<Self::WatchStream>, Status> {
        let units = request.into_inner().units;
        let updates = (1..=units).map(|units| Ok(Amount { units }));
        Ok(Response::new(Box::pin(tokio_stream::iter(updates))))
    }

    type ExchangeStream = AmountStream;

    async fn exchange(&self, request: Request<Streaming<Amount>>) -> Result<Response<Self::ExchangeStream>, Status> {
        let units = self.drain(request.into_inner()).await?;
        self.record(Event::Completed(units.len() as i64));
        let replies: Vec<_> = units.into_iter().map(|units| Ok(Amount { units: units * 2 })).collect();
        Ok(Response::new(Box::pin(tokio_stream::iter(replies))))
    }
}

struct TestServer {
    _runtime: Runtime,
    addr: SocketAddr,
    ledger: Ledger,
}

fn serve() -> TestServer {
    let runtime = Runtime::new().unwrap();
    let ledger = Ledger::default();
    let listener = runtime.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
    let addr = listener.local_addr().unwrap();
    runtime.spawn(
        tonic::transport::Server::builder()
            .add_service(BankServer::new(ledger.clone()))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );
    TestServer { _runtime: runtime, addr, ledger }
}

fn bank(args: &[&str]) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bank"));
    for var in [
        "SERVER_ADDR",
        "REQUEST_FILE",
        "PRINT_SAMPLE_REQUEST",
        "RESPONSE_FORMAT",
        "TIMEOUT",
        "TLS",
        "AUTH_TOKEN",
        "JWT_KEY",
        "JWT_KEY_FILE",
    ] {
        cmd.env_remove(var);
    }
    cmd.args(args);
    cmd
}

fn call(server: &TestServer, method: &str, stdin: &str) -> Command {
    let addr = server.addr.to_string();
    let mut cmd = bank(&[method, "-s", &addr]);
    cmd.write_stdin(stdin.to_string());
    cmd
}

/// Give the server time to observe a call the client already gave up on.
fn settle() { std::thread::sleep(Duration::from_millis(300)); }

#[test]
fn test_sample_request_is_printed_without_connecting() {
    bank(&["deposit", "-p", "-s", "127.0.0.1:1"])
        .assert()
        .success()
        .stdout("{\"units\":0}\n");
}

#[test]
fn test_sample_request_honors_response_format() {
    bank(&["upload", "-p", "-o", "yaml", "-s", "127.0.0.1:1"])
        .assert()
        .success()
        .stdout("units: 0\n");
}

#[test]
fn test_unary_call() {
    let server = serve();
    call(&server, "deposit", "{\"units\":5}\n").assert().success().stdout("{\"units\":105}\n");
    assert_eq!(server.ledger.events(), [Event::Completed(5)]);
}

#[test]
fn test_unary_call_without_input_fails() {
    let server = serve();
    call(&server, "deposit", "")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no request found in input"));
    assert!(server.ledger.events().is_empty());
}

#[test]
fn test_client_stream_sends_each_request_then_receives_once() {
    let server = serve();
    call(&server, "upload", "{\"units\":10}\n{\"units\":20}\n{\"units\":30}\n")
        .assert()
        .success()
        .stdout("{\"units\":60}\n");
    assert_eq!(
        server.ledger.events(),
        [Event::Received(10), Event::Received(20), Event::Received(30), Event::Completed(60)]
    );
}

#[test]
fn test_client_stream_decode_failure_cancels_the_call() {
    let server = serve();
    call(&server, "upload", "{\"units\":10}\n{\"units\":20}\n{garbage\n{\"units\":30}\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("json:"));
    settle();
    let events = server.ledger.events();
    assert!(!events.iter().any(|e| matches!(e, Event::Completed(_))), "{events:?}");
    assert!(!events.contains(&Event::Received(30)));
}

#[test]
fn test_server_stream_receives_until_completion() {
    let server = serve();
    call(&server, "watch", "{\"units\":3}\n")
        .assert()
        .success()
        .stdout("{\"units\":1}\n{\"units\":2}\n{\"units\":3}\n");
}

#[test]
fn test_bidirectional_closes_sending_before_receiving() {
    let server = serve();
    call(&server, "exchange", "{\"units\":1}\n{\"units\":2}\n{\"units\":3}\n")
        .assert()
        .success()
        .stdout("{\"units\":2}\n{\"units\":4}\n{\"units\":6}\n");
    assert_eq!(
        server.ledger.events(),
        [Event::Received(1), Event::Received(2), Event::Received(3), Event::Completed(3)]
    );
}

#[test]
fn test_bidirectional_decode_failure_sends_nothing() {
    let server = serve();
    call(&server, "exchange", "{\"units\":1}\n{garbage\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("json:"));
    settle();
    assert!(server.ledger.events().is_empty());
}

#[test]
fn test_unreachable_server_fails() {
    bank(&["deposit", "-s", "127.0.0.1:1", "--timeout", "1s"])
        .write_stdin("{\"units\":1}\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("transport error"));
}

#[test]
fn test_compound_and_oversized_timeouts() {
    bank(&["deposit", "-p", "--timeout", "1m30s"]).assert().success();
    bank(&["deposit", "-p", "--timeout", "400000000000000000m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));
}
