//! Client against a live server on a loopback port.
//!
//! # Design
//! Each test starts the server on a random port in a background runtime, then
//! drives it through `LiveSession` exactly as the menu would. TLS tests use
//! the checked-in `certificate/` PKI: the server presents `server.pem`, the
//! client trusts only the CA in `cert.pem`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{http::StatusCode, routing::get, Router};
use courier_client::{LiveSession, Session};
use courier_core::{ApiError, Availability, Backoff, Person, TlsReport, TrustPool, User};
use courier_server::{app_with_inbox, load_server_config, Received, GREETING, UPLOAD_OK};
use tokio::sync::mpsc;

const TIMEOUT: Duration = Duration::from_secs(10);

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(name)
}

fn trust_pool() -> TrustPool {
    TrustPool::load(fixture("certificate/cert.pem")).unwrap()
}

fn fast_backoff() -> Backoff {
    Backoff {
        initial: Duration::from_millis(10),
        max: Duration::from_millis(50),
        factor: 2,
    }
}

/// Serve `app` on a random loopback port; returns the base URL.
fn spawn(app: Router, tls: bool) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            if tls {
                let config = load_server_config(
                    &fixture("certificate/server.pem"),
                    &fixture("certificate/server.key"),
                )
                .unwrap();
                courier_server::serve_tls(listener, config, app).await
            } else {
                courier_server::serve(listener, app).await
            }
        })
        .unwrap();
    });

    let scheme = if tls { "https" } else { "http" };
    format!("{scheme}://{addr}")
}

fn spawn_courier(tls: bool) -> (String, mpsc::UnboundedReceiver<Received>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (spawn(app_with_inbox(tx), tls), rx)
}

fn scratch_file(contents: &[u8]) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let path = std::env::temp_dir().join(format!(
        "courier-e2e-{}-{}.txt",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn tls_session_round_trip() {
    let (url, mut inbox) = spawn_courier(true);
    let contents = b"courier payload\nwith two lines\n";
    let file = scratch_file(contents);
    let mut session = LiveSession::new(&url, trust_pool(), &file, TIMEOUT);

    // Step 1: the server becomes available.
    let availability = session.wait_for_server(Duration::from_secs(5), &fast_backoff());
    assert!(matches!(availability, Availability::Available { .. }));

    // Step 2: greeting.
    assert_eq!(session.get_message().unwrap(), GREETING);

    // Step 3: JSON user, answered with 202.
    let user = User {
        first: "Marvel".to_string(),
        last: "Cokro".to_string(),
    };
    session.send_user(&user).unwrap();
    match inbox.blocking_recv().unwrap() {
        Received::User(received) => {
            assert_eq!(received.first, user.first);
            assert_eq!(received.last, user.last);
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    // Step 4: multipart upload; the server sees the exact bytes.
    let person = Person {
        name: "Ana".to_string(),
        age: 30,
    };
    let reply = session.send_file(&person).unwrap();
    assert!(reply.contains(UPLOAD_OK));
    match inbox.blocking_recv().unwrap() {
        Received::Upload(upload) => {
            assert_eq!(upload.person.name, "Ana");
            assert_eq!(upload.person.age, 30);
            assert_eq!(upload.file_name, file.file_name().unwrap().to_str().unwrap());
            assert_eq!(&upload.content[..], contents);
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    // Step 5: negotiated session parameters.
    match session.tls_report().unwrap() {
        TlsReport::Negotiated {
            version,
            cipher_suite,
            issuer_organization,
        } => {
            assert!(version == "TLS 1.3" || version == "TLS 1.2", "{version}");
            assert_ne!(cipher_suite, "Unknown");
            assert_eq!(issuer_organization.as_deref(), Some("Courier Test Authority"));
        }
        TlsReport::Missing => panic!("expected a TLS session"),
    }

    std::fs::remove_file(file).unwrap();
}

#[test]
fn plaintext_session_has_no_tls_state() {
    let (url, _inbox) = spawn_courier(false);
    let mut session = LiveSession::new(&url, trust_pool(), fixture("file.txt"), TIMEOUT);

    assert!(!session
        .wait_for_server(Duration::from_secs(5), &fast_backoff())
        .timed_out());
    assert_eq!(session.get_message().unwrap(), GREETING);
    assert_eq!(session.tls_report().unwrap(), TlsReport::Missing);
}

#[test]
fn untrusted_server_is_rejected() {
    let (url, _inbox) = spawn_courier(true);
    // The pool holds the server's own certificate, not the authority that signed it.
    let wrong_pool = TrustPool::load(fixture("certificate/server.pem")).unwrap();
    let mut session = LiveSession::new(&url, wrong_pool, fixture("file.txt"), TIMEOUT);

    let err = session.get_message().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err}");
}

#[test]
fn idle_peer_does_not_block_other_clients() {
    let (url, _inbox) = spawn_courier(true);
    let mut warm = LiveSession::new(&url, trust_pool(), fixture("file.txt"), TIMEOUT);
    assert_eq!(warm.get_message().unwrap(), GREETING);

    // Connects but never sends a ClientHello.
    let addr = url.trim_start_matches("https://");
    let _idle = std::net::TcpStream::connect(addr).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    let mut session = LiveSession::new(&url, trust_pool(), fixture("file.txt"), TIMEOUT);
    let start = Instant::now();
    assert_eq!(session.get_message().unwrap(), GREETING);
    assert!(start.elapsed() < Duration::from_secs(2), "{:?}", start.elapsed());
}

#[test]
fn missing_upload_file_fails_locally() {
    let (url, mut inbox) = spawn_courier(false);
    let mut session = LiveSession::new(&url, trust_pool(), "/no/such/upload.txt", TIMEOUT);
    let person = Person {
        name: "Ana".to_string(),
        age: 1,
    };

    let err = session.send_file(&person).unwrap_err();
    assert!(matches!(err, ApiError::Io(_)));
    assert!(inbox.try_recv().is_err());
}

#[test]
fn waits_for_server_that_starts_late() {
    let ready_at = Instant::now() + Duration::from_millis(300);
    let requests = Arc::new(AtomicU32::new(0));
    let counter = requests.clone();
    let app = Router::new().route(
        "/",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::Relaxed);
                if Instant::now() < ready_at {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::OK
                }
            }
        }),
    );
    let url = spawn(app, false);
    let session = LiveSession::new(&url, trust_pool(), fixture("file.txt"), TIMEOUT);

    let availability = session.wait_for_server(Duration::from_secs(5), &fast_backoff());

    assert!(Instant::now() >= ready_at);
    match availability {
        Availability::Available { attempts } => {
            assert!(attempts > 1);
            assert_eq!(attempts, requests.load(Ordering::Relaxed));
        }
        Availability::TimedOut { .. } => panic!("server never became available"),
    }
}

#[test]
fn times_out_when_nothing_listens() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let session = LiveSession::new(&format!("http://{addr}"), trust_pool(), fixture("file.txt"), TIMEOUT);

    let start = Instant::now();
    let availability = session.wait_for_server(Duration::from_millis(300), &fast_backoff());

    assert!(availability.timed_out());
    assert!(start.elapsed() < Duration::from_secs(5));
}
