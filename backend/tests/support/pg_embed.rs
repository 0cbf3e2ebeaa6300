//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every test gets its own `pg-embed-setup-unpriv` cluster and a freshly
//! migrated database. `PG_RUNTIME_DIR` and `PG_DATA_DIR` are pointed at
//! unique directories under the target dir for the duration of the bootstrap
//! unless the caller already set both.
//!
//! When a cluster cannot be started the tests print a `SKIP-TEST-CLUSTER`
//! marker and return early. Set `REQUIRE_TEST_CLUSTER=1` to turn setup
//! failures into test failures.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use flowboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

const TEST_DB: &str = "flowboard_test";

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn pg_embed_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("flowboard-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((runtime_dir, data_dir))
}

fn start_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_dirs =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_dirs {
        let (runtime_dir, data_dir) = pg_embed_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            (
                "PG_RUNTIME_DIR",
                Some(runtime_dir.to_string_lossy().into_owned()),
            ),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    TestCluster::new().map_err(|err| format!("{err:?}"))
}

fn create_database(admin_url: &str, name: &str) -> Result<(), String> {
    let mut client = Client::connect(admin_url, NoTls).map_err(|err| describe(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| describe(&err))
}

fn describe(error: &postgres::Error) -> String {
    error.as_db_error().map_or_else(
        || error.to_string(),
        |db| format!("postgres error {:?}: {}", db.code(), db.message()),
    )
}

/// A migrated database on a private cluster, with a pool over it.
///
/// Fields drop in order, so the pool closes before the cluster stops.
pub struct TestDatabase {
    pub pool: DbPool,
    pub runtime: Runtime,
    _cluster: TestCluster,
}

impl TestDatabase {
    fn start() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = start_cluster()?;
        create_database(&cluster.connection().database_url("postgres"), TEST_DB)?;
        let url = cluster.connection().database_url(TEST_DB);

        runtime
            .block_on(run_pending_migrations(&url))
            .map_err(|err| err.to_string())?;
        let pool = runtime
            .block_on(DbPool::new(PoolConfig::new(&url).with_max_size(2)))
            .map_err(|err| err.to_string())?;

        Ok(Self {
            pool,
            runtime,
            _cluster: cluster,
        })
    }
}

fn cluster_required() -> bool {
    std::env::var("REQUIRE_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Start a database, or skip the calling test when no cluster is available.
pub fn test_database() -> Option<TestDatabase> {
    match TestDatabase::start() {
        Ok(database) => Some(database),
        Err(reason) if cluster_required() => {
            panic!("test cluster setup failed: {reason}");
        }
        Err(reason) => {
            eprintln!("SKIP-TEST-CLUSTER: {reason} (set REQUIRE_TEST_CLUSTER=1 to fail instead)");
            None
        }
    }
}
