use anyhow::{Context, Result};
use atelier_creation_registry::{
    CallContext, ContentHash, ContractError, CreationDetails, CreationId, CreationRegistration,
    CreationRegistry, Principal, RegistryError,
};
use atelier_storage::SledStore;
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new creation owned by the caller
    Register(RegisterCommand),
    /// Show a creation record
    Get {
        /// Creation id
        id: String,
    },
    /// Replace title, description and category of a creation
    Update {
        /// Creation id
        id: String,
        #[command(flatten)]
        details: DetailsArgs,
    },
    /// List creation ids registered by a creator, oldest first
    List {
        /// Creator identity (defaults to the caller)
        #[arg(long)]
        creator: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct DetailsArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub category: String,
}

impl From<DetailsArgs> for CreationDetails {
    fn from(args: DetailsArgs) -> Self {
        CreationDetails::new(args.title, args.description, args.category)
    }
}

#[derive(Args, Debug)]
pub struct RegisterCommand {
    /// Creation id, unique across the registry
    pub id: String,
    #[command(flatten)]
    pub details: DetailsArgs,
    /// Content digest as 64 hex characters
    #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
    pub content_hash: Option<ContentHash>,
    /// File whose SHA-256 digest becomes the content hash
    #[arg(long, value_name = "PATH")]
    pub content_file: Option<PathBuf>,
    /// Block height to record; defaults to the next height of the local counter
    #[arg(long)]
    pub height: Option<u64>,
}

/// Result of one command, as printed to stdout.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Output(Value),
    Rejected(ContractError),
}

impl Outcome {
    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Output(value) => value.clone(),
            Outcome::Rejected(err) => json!({ "err": err.code() }),
        }
    }
}

/// Local stand-in for the ledger host: owns the store and supplies caller
/// identity and block height to each call.
///
/// The persisted height counter only moves when a registration succeeds.
pub struct Host {
    store: Arc<SledStore>,
    registry: CreationRegistry<Arc<SledStore>>,
    caller: Option<Principal>,
}

impl Host {
    pub fn open(db_path: &std::path::Path, caller: Option<Principal>) -> Result<Self> {
        let store = Arc::new(
            SledStore::open(db_path)
                .with_context(|| format!("failed to open store at {}", db_path.display()))?,
        );
        Ok(Self {
            registry: CreationRegistry::with_store(Arc::clone(&store)),
            store,
            caller,
        })
    }

    fn caller(&self) -> Result<Principal> {
        self.caller
            .clone()
            .context("no caller identity: pass --caller or set ATELIER_CALLER")
    }

    pub fn execute(&self, command: Commands) -> Result<Outcome> {
        let outcome = match command {
            Commands::Register(cmd) => self.register(cmd)?,
            Commands::Get { id } => {
                let record = self.registry.get(&CreationId::new(id))?;
                Outcome::Output(serde_json::to_value(record)?)
            }
            Commands::Update { id, details } => {
                let ctx = CallContext::new(self.caller()?, self.store.latest_height()?);
                let result = self
                    .registry
                    .update(&CreationId::new(id), details.into(), &ctx);
                settle(result.map(|()| json!({ "ok": true })))?
            }
            Commands::List { creator } => {
                let creator = match creator {
                    Some(creator) => Principal::new(creator),
                    None => self.caller()?,
                };
                let ids = self.registry.creations_by_creator(&creator)?;
                Outcome::Output(serde_json::to_value(ids)?)
            }
        };
        self.store.flush()?;
        Ok(outcome)
    }

    fn register(&self, cmd: RegisterCommand) -> Result<Outcome> {
        let caller = self.caller()?;
        let content_hash = match (cmd.content_hash, &cmd.content_file) {
            (Some(hash), _) => hash,
            (None, Some(path)) => {
                let content = fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                ContentHash::digest(&content)
            }
            (None, None) => anyhow::bail!("either --content-hash or --content-file is required"),
        };

        let latest = self.store.latest_height()?;
        let height = match cmd.height {
            Some(height) if height < latest => {
                anyhow::bail!("height {height} is below the latest recorded height {latest}");
            }
            Some(height) => height,
            None => self.store.next_height()?,
        };

        let ctx = CallContext::new(caller, height);
        let registration = CreationRegistration::new(cmd.details.into(), content_hash);
        let result = self
            .registry
            .register(CreationId::new(cmd.id), registration, &ctx);
        if result.is_ok() {
            self.store.observe_height(height)?;
        }
        settle(result.map(|id| json!({ "ok": id })))
    }
}

/// Contract rejections become an [`Outcome`]; storage failures stay errors.
fn settle(result: Result<Value, RegistryError>) -> Result<Outcome> {
    match result {
        Ok(value) => Ok(Outcome::Output(value)),
        Err(RegistryError::Contract(err)) => Ok(Outcome::Rejected(err)),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn details(title: &str, category: &str) -> DetailsArgs {
        DetailsArgs {
            title: title.into(),
            description: "desc".into(),
            category: category.into(),
        }
    }

    fn register(id: &str, height: Option<u64>) -> Commands {
        Commands::Register(RegisterCommand {
            id: id.into(),
            details: details("T", "art"),
            content_hash: Some(ContentHash::from_bytes([4u8; 32])),
            content_file: None,
            height,
        })
    }

    #[test]
    fn register_then_get_prints_record() {
        let dir = TempDir::new().unwrap();
        let host = Host::open(dir.path(), Some(Principal::new("alice"))).unwrap();

        let outcome = host.execute(register("c1", Some(100))).unwrap();
        assert_eq!(outcome.to_json(), json!({ "ok": "c1" }));

        let outcome = host.execute(Commands::Get { id: "c1".into() }).unwrap();
        let record = outcome.to_json();
        assert_eq!(record["creator"], "alice");
        assert_eq!(record["timestamp"], 100);
        assert_eq!(record["content_hash"], "04".repeat(32));
    }

    #[test]
    fn rejections_print_error_codes() {
        let dir = TempDir::new().unwrap();
        let alice = Host::open(&dir.path().join("db"), Some(Principal::new("alice"))).unwrap();
        alice.execute(register("c1", None)).unwrap();

        let dup = alice.execute(register("c1", None)).unwrap();
        assert_eq!(dup, Outcome::Rejected(ContractError::AlreadyRegistered));
        assert_eq!(dup.to_json(), json!({ "err": 101 }));

        let missing = alice
            .execute(Commands::Update {
                id: "nope".into(),
                details: details("T2", "craft"),
            })
            .unwrap();
        assert_eq!(missing.to_json(), json!({ "err": 102 }));
        drop(alice);

        let bob = Host::open(&dir.path().join("db"), Some(Principal::new("bob"))).unwrap();
        let denied = bob
            .execute(Commands::Update {
                id: "c1".into(),
                details: details("T2", "craft"),
            })
            .unwrap();
        assert_eq!(denied.to_json(), json!({ "err": 100 }));
    }

    #[test]
    fn counter_heights_advance_and_explicit_heights_cannot_go_back() {
        let dir = TempDir::new().unwrap();
        let host = Host::open(dir.path(), Some(Principal::new("alice"))).unwrap();

        host.execute(register("first", None)).unwrap();
        host.execute(register("second", Some(10))).unwrap();
        assert!(host.execute(register("third", Some(5))).is_err());

        let first = host.execute(Commands::Get { id: "first".into() }).unwrap();
        assert_eq!(first.to_json()["timestamp"], 1);

        let listed = host.execute(Commands::List { creator: None }).unwrap();
        assert_eq!(listed.to_json(), json!(["first", "second"]));
    }

    #[test]
    fn rejected_registration_keeps_height_counter() {
        let dir = TempDir::new().unwrap();
        let host = Host::open(dir.path(), Some(Principal::new("alice"))).unwrap();

        host.execute(register("a", None)).unwrap();
        assert_eq!(host.store.latest_height().unwrap(), 1);

        let dup = host.execute(register("a", None)).unwrap();
        assert_eq!(dup, Outcome::Rejected(ContractError::AlreadyRegistered));
        assert_eq!(host.store.latest_height().unwrap(), 1);

        let dup = host.execute(register("a", Some(40))).unwrap();
        assert_eq!(dup, Outcome::Rejected(ContractError::AlreadyRegistered));
        assert_eq!(host.store.latest_height().unwrap(), 1);

        host.execute(register("b", None)).unwrap();
        let record = host.execute(Commands::Get { id: "b".into() }).unwrap();
        assert_eq!(record.to_json()["timestamp"], 2);
    }

    #[test]
    fn content_file_is_hashed() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("work.txt");
        fs::write(&file, b"hello").unwrap();
        let host = Host::open(&dir.path().join("db"), Some(Principal::new("alice"))).unwrap();

        host.execute(Commands::Register(RegisterCommand {
            id: "hashed".into(),
            details: details("T", "art"),
            content_hash: None,
            content_file: Some(file),
            height: None,
        }))
        .unwrap();

        let record = host.execute(Commands::Get { id: "hashed".into() }).unwrap();
        assert_eq!(
            record.to_json()["content_hash"],
            ContentHash::digest(b"hello").to_hex()
        );
    }

    #[test]
    fn mutations_need_a_caller() {
        let dir = TempDir::new().unwrap();
        let host = Host::open(dir.path(), None).unwrap();
        assert!(host.execute(register("c1", None)).is_err());
        assert_eq!(
            host.execute(Commands::Get { id: "c1".into() })
                .unwrap()
                .to_json(),
            Value::Null
        );
    }
}
