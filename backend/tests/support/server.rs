//! Full-stack server harness for integration tests.
//!
//! Runs the real application on `127.0.0.1:0` inside its own actix system,
//! with in-memory storage, development sign-in and a revalidation worker
//! that calls back into the same server over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use actix_web::dev::ServerHandle;
use actix_web::{HttpServer, web};
use folio::domain::{CipherAlgorithm, PathCodec, RevalidationWorker, RevalidationWorkerConfig};
use folio::inbound::http::health::HealthState;
use folio::inbound::http::session_config::SessionSettings;
use folio::outbound::revalidation::HttpRevalidationClient;
use folio::server::{AppDependencies, Storage, build_app, build_services};
use mockable::{Clock, DefaultClock};
use url::Url;

const CODEC_KEY: &[u8] = b"integration-test-key-32-bytes!!!";

/// Handle to a running server; stops it on drop.
pub struct TestServer {
    addr: SocketAddr,
    handle: ServerHandle,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start() -> Self {
        let (tx, rx) = mpsc::channel();
        let thread = std::thread::spawn(move || {
            actix_rt::System::new().block_on(async move {
                let codec = Arc::new(
                    PathCodec::new(CipherAlgorithm::default(), CODEC_KEY).expect("codec"),
                );
                let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
                let storage = Storage::in_memory_with_demo_user().expect("demo storage");
                let services = build_services(storage, codec.clone(), 16, clock.clone());
                let deps = AppDependencies {
                    health_state: web::Data::new(HealthState::new()),
                    http_state: web::Data::new(services.http_state),
                    session: SessionSettings {
                        key: Key::generate(),
                        cookie_secure: false,
                        same_site: SameSite::Lax,
                    },
                    dev_login: true,
                };

                let server = HttpServer::new(move || build_app(deps.clone()))
                    .workers(1)
                    .bind(("127.0.0.1", 0))
                    .expect("bind test server");
                let addr = server.addrs().first().copied().expect("bound address");

                let base_url = Url::parse(&format!("http://{addr}")).expect("base url");
                let client = HttpRevalidationClient::new(base_url, codec, Duration::from_secs(5))
                    .expect("revalidation client");
                let worker = RevalidationWorker::new(
                    Arc::new(client),
                    clock,
                    RevalidationWorkerConfig {
                        max_attempts: 3,
                        initial_backoff: Duration::from_millis(10),
                        max_backoff: Duration::from_millis(50),
                    },
                );
                actix_rt::spawn(services.jobs.run(worker));

                let server = server.run();
                tx.send((addr, server.handle())).expect("report address");
                server.await.expect("server runs");
            });
        });
        let (addr, handle) = rx.recv().expect("server started");
        Self {
            addr,
            handle,
            thread: Some(thread),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Key used to encrypt revalidation paths for this server.
    pub fn codec() -> PathCodec {
        PathCodec::new(CipherAlgorithm::default(), CODEC_KEY).expect("codec")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("shutdown runtime");
        runtime.block_on(self.handle.stop(false));
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
