//! Shared rig for the behavioral specs.

use chrono::{TimeZone, Utc};
use drover_adapters::{FakeCloudProvider, FakeFaultSink, FakeNotifier, FakeShell};
use drover_agents::{sweep_agents, talk_agents, Config};
use drover_core::{
    Agent, Clock, FakeClock, Request, RequestKind, SuperAgent, Talk, Talks, Wire,
};
use drover_storage::TalkStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const CLOUD_CONFIG: &str = r#"
    [cloud]
    image = "ami-123"
    instance_type = "t3.medium"
    security_group = "sg-1"
    subnet = "subnet-1"
    key = "/etc/drover/cloud_rsa"

    [cloud.limits]
    shoot_after_mins = 20
    kill_after_mins = 180
    prune_after_mins = 1440

    [cloud.types]
    standard = ["t3.medium"]
    elevated = ["c5.4xlarge"]
    elevated_orgs = ["acme"]
"#;

pub struct Rig {
    _dir: TempDir,
    pub talks: TalkStore,
    pub api: FakeCloudProvider,
    pub shell: FakeShell,
    pub notifier: FakeNotifier,
    pub sink: Arc<FakeFaultSink>,
    pub clock: Arc<FakeClock>,
    pub chain: Box<dyn Agent>,
    pub sweep: Box<dyn SuperAgent>,
}

impl Rig {
    pub fn new(config_toml: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let talks = TalkStore::open(dir.path()).unwrap();
        let config = Config::parse(config_toml).unwrap();
        let api = FakeCloudProvider::new();
        let shell = FakeShell::new();
        let notifier = FakeNotifier::new();
        let sink = Arc::new(FakeFaultSink::new());
        let clock = Arc::new(FakeClock::at(
            Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap(),
        ));
        // Launch times line up with the fake clock so age-based guards
        // see deterministic ages.
        api.launch_at(clock.now());
        let chain = talk_agents(
            &config,
            api.clone(),
            shell.clone(),
            notifier.clone(),
            sink.clone(),
            clock.clone(),
        )
        .unwrap();
        let sweep = sweep_agents(&config, api.clone(), clock.clone());
        Self {
            _dir: dir,
            talks,
            api,
            shell,
            notifier,
            sink,
            clock,
            chain,
            sweep,
        }
    }

    /// Create a talk with wire and request, the way an external intake
    /// would.
    pub fn submit(&self, name: &str, kind: RequestKind) -> Talk {
        let mut talk = self.talks.create(name).unwrap();
        talk.wire = Some(Wire {
            repo: "acme/widget".to_string(),
            issue: 42,
            href: "https://ci.example.com/talks/42".to_string(),
        });
        talk.request = Some(Request {
            id: format!("r-{}", talk.number),
            kind,
            args: BTreeMap::new(),
            index: None,
            success: None,
        });
        self.talks.save(&talk).unwrap();
        talk
    }

    /// One scheduler round: sweep, then the chain over every active
    /// talk, persisting as the daemon would.
    pub async fn round(&self) {
        self.sweep.execute(&self.talks).await.unwrap();
        for name in self.talks.active().unwrap() {
            let mut talk = self.talks.get(&name).unwrap();
            if self.chain.execute(&mut talk).await.unwrap() {
                self.talks.save(&talk).unwrap();
            }
        }
    }
}
