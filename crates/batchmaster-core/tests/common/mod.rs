#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use batchmaster_core::{
    models::{BatchPlan, Ingredient, Phase, PlanDocument, PlanSummary, Quantity, Section, Task},
    storage::SqliteStore,
    CookingSession, KeyValueStore, ManualClock, PlanProvider, Result, SessionBuilder,
    SessionError,
};
use jiff::Timestamp;
use tempfile::TempDir;

/// In-memory plan source that counts document fetches.
#[derive(Default)]
pub struct CountingProvider {
    plans: HashMap<String, PlanDocument>,
    fetches: AtomicUsize,
}

impl CountingProvider {
    pub fn new() -> Self {
        let mut plans = HashMap::new();
        plans.insert("P1".to_string(), plan_p1());
        plans.insert("P2".to_string(), plan_p2());
        plans.insert("1".to_string(), plan_p1());
        Self {
            plans,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn lookup(&self, key: &str) -> Result<PlanDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.plans
            .get(key)
            .cloned()
            .ok_or_else(|| SessionError::fetch(format!("unknown plan {key}")))
    }
}

#[async_trait]
impl PlanProvider for CountingProvider {
    async fn fetch_plan_by_id(&self, id: &str) -> Result<PlanDocument> {
        self.lookup(id)
    }

    async fn fetch_plans_summary(&self) -> Result<Vec<PlanSummary>> {
        Ok(self
            .plans
            .keys()
            .map(|id| PlanSummary {
                id: id.clone(),
                title: format!("Plan {id}"),
                ..Default::default()
            })
            .collect())
    }

    async fn fetch_week_data(&self, week: u32) -> Result<PlanDocument> {
        self.lookup(&week.to_string())
    }
}

fn task(time: &str, instruction: &str) -> Task {
    Task {
        time: time.to_string(),
        instruction: instruction.to_string(),
        ..Default::default()
    }
}

/// Two phases: phase 1 has one section with two tasks, phase 2 one section
/// with one task.
pub fn plan_p1() -> PlanDocument {
    let phases = vec![
        Phase {
            num: "1".to_string(),
            name: "Prep".to_string(),
            sections: vec![Section {
                name: "Vegetables".to_string(),
                tasks: vec![task("10min", "Dice onions"), task("5min", "Boil water")],
            }],
            ..Default::default()
        },
        Phase {
            num: "2".to_string(),
            name: "Cook".to_string(),
            sections: vec![Section {
                name: "Oven".to_string(),
                tasks: vec![task("1h", "Roast vegetables")],
            }],
            ..Default::default()
        },
    ];

    PlanDocument {
        ingredients: vec![Ingredient {
            id: "ing1".to_string(),
            category: "Produce".to_string(),
            name: "Onion".to_string(),
            quantity: Quantity::Number(2.0),
            unit: "pcs".to_string(),
            ..Default::default()
        }],
        plan: BatchPlan {
            duration: "1h30".to_string(),
            phases,
        },
        ..Default::default()
    }
}

/// Single phase `A` with one task.
pub fn plan_p2() -> PlanDocument {
    let phases = vec![Phase {
        num: "A".to_string(),
        name: "Assemble".to_string(),
        sections: vec![Section {
            name: "Salads".to_string(),
            tasks: vec![task("15min", "Toss salad")],
        }],
        ..Default::default()
    }];

    PlanDocument {
        plan: BatchPlan {
            duration: "15min".to_string(),
            phases,
        },
        ..Default::default()
    }
}

pub fn epoch() -> Timestamp {
    Timestamp::from_second(1_700_000_000).expect("valid timestamp")
}

/// A session environment on a temporary SQLite file.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub provider: Arc<CountingProvider>,
    pub clock: Arc<ManualClock>,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        Self {
            temp_dir,
            db_path,
            provider: Arc::new(CountingProvider::new()),
            clock: Arc::new(ManualClock::new(epoch())),
        }
    }

    pub async fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(
            SqliteStore::open(&self.db_path)
                .await
                .expect("Failed to open store"),
        )
    }

    /// Builds and hydrates a session, as on app start.
    pub async fn session(&self) -> CookingSession {
        SessionBuilder::new()
            .with_store(self.store().await)
            .with_provider(self.provider.clone())
            .with_clock(self.clock.clone())
            .build()
            .await
            .expect("Failed to create session")
    }
}
