//! Behavioural tests for the daemon bootstrap sequence.

use std::cell::RefCell;
use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use fieldwork_config::{
    Config, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_POOL_SIZE, ListenEndpoint, default_log_filter,
    default_log_format,
};
use ortho_config::OrthoError;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use crate::bootstrap::{BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, bootstrap_with};
use crate::process::{LaunchError, ShutdownError, ShutdownSignal, run_daemon_with};
use crate::transport::ListenerHandle;

use super::support::{HealthEvent, RecordingHealthReporter, TechnicianClient};

/// Loader that resolves the configuration from a fixed argument list, the
/// way the daemon does from its own command line.
struct ArgumentConfigLoader {
    args: Vec<OsString>,
}

impl ArgumentConfigLoader {
    fn new<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut all = vec![OsString::from("fieldworkd")];
        all.extend(args.into_iter().map(Into::into));
        Self { args: all }
    }
}

impl ConfigLoader for ArgumentConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter(self.args.clone())
    }
}

/// Shutdown signal that fires immediately.
struct ImmediateShutdown;

impl ShutdownSignal for ImmediateShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        Ok(())
    }
}

struct BootstrapWorld {
    dir: TempDir,
    loader: Box<dyn ConfigLoader>,
    reporter: Arc<RecordingHealthReporter>,
    daemon: Option<Daemon>,
    error: Option<BootstrapError>,
    launch: Option<Result<(), LaunchError>>,
    listener: Option<ListenerHandle>,
}

impl BootstrapWorld {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temporary directory");
        let mut world = Self {
            dir,
            loader: Box::new(ArgumentConfigLoader::new(["--listen", "no-port-here"])),
            reporter: Arc::new(RecordingHealthReporter::default()),
            daemon: None,
            error: None,
            launch: None,
            listener: None,
        };
        world.use_database("fieldwork.db");
        world
    }

    fn database_path(&self, relative: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(relative)).expect("temporary path is UTF-8")
    }

    fn use_database(&mut self, relative: &str) {
        let path = self.database_path(relative);
        self.loader = Box::new(StaticConfigLoader::new(Config {
            listen: ListenEndpoint::new("127.0.0.1", 0),
            database_path: path,
            ..Config::default()
        }));
    }

    fn bootstrap(&mut self) {
        match bootstrap_with(self.loader.as_ref(), self.reporter.clone()) {
            Ok(daemon) => self.daemon = Some(daemon),
            Err(error) => self.error = Some(error),
        }
    }

    fn events(&self) -> Vec<HealthEvent> {
        self.reporter.events()
    }
}

impl Drop for BootstrapWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            handle.shutdown();
            let _ = handle.join();
        }
    }
}

#[fixture]
fn world() -> RefCell<BootstrapWorld> {
    RefCell::new(BootstrapWorld::new())
}

#[given("a configuration pointing at a fresh database")]
fn given_fresh_database(world: &RefCell<BootstrapWorld>) {
    world.borrow_mut().use_database("fieldwork.db");
}

#[given("a configuration pointing at a database in a missing directory")]
fn given_missing_directory(world: &RefCell<BootstrapWorld>) {
    world.borrow_mut().use_database("missing/dir/fieldwork.db");
}

#[given("a configuration loader that rejects its arguments")]
fn given_failing_loader(world: &RefCell<BootstrapWorld>) {
    world.borrow_mut().loader = Box::new(ArgumentConfigLoader::new(["--listen", "no-port-here"]));
}

#[given("a command line naming only the listen address and a fresh database")]
fn given_minimal_command_line(world: &RefCell<BootstrapWorld>) {
    let mut world = world.borrow_mut();
    let path = world.database_path("fieldwork.db");
    world.loader = Box::new(ArgumentConfigLoader::new([
        "--listen",
        "127.0.0.1:0",
        "--database-path",
        path.as_str(),
    ]));
}

#[when("the daemon bootstrap runs")]
fn when_bootstrap_runs(world: &RefCell<BootstrapWorld>) {
    world.borrow_mut().bootstrap();
}

#[when("the daemon starts accepting connections")]
fn when_daemon_spawns(world: &RefCell<BootstrapWorld>) {
    let mut world = world.borrow_mut();
    let daemon = world.daemon.take().expect("daemon bootstrapped");
    world.listener = Some(daemon.spawn().expect("start listener"));
}

#[when("the daemon runs until shutdown is signalled")]
fn when_daemon_runs(world: &RefCell<BootstrapWorld>) {
    let mut world = world.borrow_mut();
    let result = run_daemon_with(
        world.loader.as_ref(),
        world.reporter.clone(),
        &ImmediateShutdown,
    );
    world.launch = Some(result);
}

#[then("bootstrap succeeds")]
fn then_bootstrap_succeeds(world: &RefCell<BootstrapWorld>) {
    let world = world.borrow();
    assert!(world.error.is_none(), "bootstrap error: {:?}", world.error);
    assert!(world.daemon.is_some(), "daemon should be ready");
}

#[then("bootstrap fails with a {kind} error")]
fn then_bootstrap_fails(world: &RefCell<BootstrapWorld>, kind: String) {
    let world = world.borrow();
    let error = world.error.as_ref().expect("bootstrap should fail");
    let matched = match kind.as_str() {
        "configuration" => matches!(error, BootstrapError::Configuration { .. }),
        "store" => matches!(error, BootstrapError::Store { .. }),
        other => panic!("unknown error kind {other}"),
    };
    assert!(matched, "unexpected bootstrap error: {error:?}");
}

#[then("the daemon uses the built-in pool, deadline and log settings")]
fn then_builtin_settings(world: &RefCell<BootstrapWorld>) {
    let world = world.borrow();
    let config = world.daemon.as_ref().expect("daemon bootstrapped").config();
    assert_eq!(config.pool_size(), DEFAULT_POOL_SIZE);
    assert_eq!(config.connection_timeout_secs, DEFAULT_CONNECTION_TIMEOUT_SECS);
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
}

#[then("the reporter recorded the store and listener becoming ready")]
fn then_reporter_ready(world: &RefCell<BootstrapWorld>) {
    let events = world.borrow().events();
    assert_eq!(events.first(), Some(&HealthEvent::BootstrapStarting));
    assert!(events.contains(&HealthEvent::StoreReady), "{events:?}");
    assert!(
        events
            .iter()
            .any(|event| matches!(event, HealthEvent::ListenerBound(addr) if addr.port() != 0)),
        "{events:?}"
    );
    assert_eq!(events.last(), Some(&HealthEvent::BootstrapSucceeded));
}

#[then("the reporter recorded bootstrap failure")]
fn then_reporter_failure(world: &RefCell<BootstrapWorld>) {
    let events = world.borrow().events();
    assert!(
        matches!(events.last(), Some(HealthEvent::BootstrapFailed(_))),
        "{events:?}"
    );
    assert!(!events.contains(&HealthEvent::BootstrapSucceeded));
}

#[then("a device asking for \"{line}\" receives \"{token}\"")]
fn then_device_receives(world: &RefCell<BootstrapWorld>, line: String, token: String) {
    let world = world.borrow();
    let addr = world
        .listener
        .as_ref()
        .expect("listener running")
        .local_addr();
    let response = TechnicianClient::new(addr).send(line.trim_matches('"'));
    assert_eq!(response.line(), token.trim_matches('"'));
}

#[then("the daemon stopped cleanly")]
fn then_daemon_stopped(world: &RefCell<BootstrapWorld>) {
    let world = world.borrow();
    let result = world.launch.as_ref().expect("daemon ran");
    assert!(result.is_ok(), "daemon run failed: {result:?}");
}

#[scenario(path = "tests/features/daemon_bootstrap.feature")]
fn daemon_bootstrap(#[from(world)] world: RefCell<BootstrapWorld>) {
    drop(world);
}
