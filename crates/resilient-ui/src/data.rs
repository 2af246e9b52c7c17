// Test data factory for user records
//
// Records come from a handful of named templates. Uniqueness within a run is
// carried by an injectable `IdSource`; randomness by a seedable generator, so
// `DataFactory::seeded` reproduces the same records on every CI run.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Departments the random templates pick from
pub const DEPARTMENTS: [&str; 8] = [
    "Engineering",
    "Quality Assurance",
    "Marketing",
    "Sales",
    "Human Resources",
    "Finance",
    "Operations",
    "Customer Support",
];

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A row of the user table.
///
/// Age and salary are numeric-looking strings; the target application owns
/// validation and identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub salary: String,
    pub department: String,
}

impl UserRecord {
    /// Non-empty fields usable as search terms, in column order.
    pub fn search_terms(&self) -> Vec<&str> {
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.department.as_str(),
            self.salary.as_str(),
        ]
        .into_iter()
        .filter(|term| !term.trim().is_empty())
        .collect()
    }
}

/// Partial record applied by an edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl UserUpdate {
    pub fn search_terms(&self) -> Vec<&str> {
        [
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.department.as_deref(),
            self.salary.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|term| !term.trim().is_empty())
        .collect()
    }
}

/// Records that the target application should reject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSet {
    pub empty: UserRecord,
    pub invalid_email: UserRecord,
    pub invalid_age: UserRecord,
}

/// Login credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `USERNAME` / `PASSWORD` from the environment, else the demo defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            username: lookup("USERNAME").unwrap_or_else(|| "testuser".to_string()),
            password: lookup("PASSWORD").unwrap_or_else(|| "Test@123".to_string()),
        }
    }
}

/// Source of run-unique tokens embedded in generated records.
pub trait IdSource: Send + Sync {
    /// A token never returned before by this source within the process.
    fn next_token(&self) -> String;
}

static CLOCK_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Last six digits of the wall clock in milliseconds plus a process-wide
/// sequence number.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockIds;

impl IdSource for ClockIds {
    fn next_token(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis().rem_euclid(1_000_000);
        let seq = CLOCK_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        format!("{:06}{}", millis, seq)
    }
}

/// Zero-padded counter; identical sequences on every run.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_token(&self) -> String {
        format!("{:06}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Generates user records from named templates.
pub struct DataFactory {
    rng: Mutex<StdRng>,
    ids: Box<dyn IdSource>,
}

impl DataFactory {
    /// Entropy-seeded generator with clock-based tokens.
    pub fn new() -> Self {
        Self::with_sources(StdRng::from_entropy(), Box::new(ClockIds))
    }

    /// Reproducible generator for CI: same seed, same records.
    pub fn seeded(seed: u64) -> Self {
        Self::with_sources(StdRng::seed_from_u64(seed), Box::new(SequentialIds::default()))
    }

    pub fn with_sources(rng: StdRng, ids: Box<dyn IdSource>) -> Self {
        Self {
            rng: Mutex::new(rng),
            ids,
        }
    }

    /// Fresh user with a unique email.
    pub fn random_user(&self) -> UserRecord {
        let token = self.ids.next_token();
        let mut rng = self.rng.lock();
        let suffix: u32 = rng.gen_range(0..999);

        UserRecord {
            first_name: format!("John{}", token),
            last_name: format!("Doe{}", suffix),
            email: format!("john.doe{}{:03}@test.com", token, suffix),
            age: rng.gen_range(25..40).to_string(),
            salary: rng.gen_range(40_000..100_000).to_string(),
            department: pick_department(&mut rng),
        }
    }

    /// Changes applied by an edit: names, salary and department.
    pub fn updated_user(&self) -> UserUpdate {
        let token = self.ids.next_token();
        let mut rng = self.rng.lock();
        let suffix: u32 = rng.gen_range(0..999);

        UserUpdate {
            first_name: Some(format!("Jane{}", token)),
            last_name: Some(format!("Smith{}", suffix)),
            salary: Some(rng.gen_range(50_000..100_000).to_string()),
            department: Some(pick_department(&mut rng)),
        }
    }

    /// Fixed record used by search scenarios.
    pub fn search_target(&self) -> UserRecord {
        UserRecord {
            first_name: "SearchTest".to_string(),
            last_name: "User".to_string(),
            email: "search.test@example.com".to_string(),
            age: "30".to_string(),
            salary: "55000".to_string(),
            department: "Testing".to_string(),
        }
    }

    /// Apostrophes, hyphens, plus-addressing and ampersands.
    pub fn special_characters(&self) -> UserRecord {
        let token = self.ids.next_token();
        UserRecord {
            first_name: format!("O'Connor{}", token),
            last_name: "Smith-Jones".to_string(),
            email: format!("o.connor.smith+test{}@example.com", token),
            age: "28".to_string(),
            salary: "45000".to_string(),
            department: "R&D".to_string(),
        }
    }

    pub fn validation_set(&self) -> ValidationSet {
        let invalid = |last_name: &str, email: &str, age: &str| UserRecord {
            first_name: "Invalid".to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            age: age.to_string(),
            salary: "50000".to_string(),
            department: "Testing".to_string(),
        };

        ValidationSet {
            empty: UserRecord {
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                age: String::new(),
                salary: String::new(),
                department: String::new(),
            },
            invalid_email: invalid("Email", "not-an-email", "25"),
            invalid_age: invalid("Age", "invalid.age@test.com", "not-a-number"),
        }
    }

    /// `count` distinct users numbered from 1.
    pub fn multiple_users(&self, count: usize) -> Vec<UserRecord> {
        (1..=count)
            .map(|n| {
                let token = self.ids.next_token();
                UserRecord {
                    first_name: format!("TestUser{}{}", n, token),
                    last_name: format!("LastName{}", n),
                    email: format!("testuser{}.{}@example.com", n, token),
                    age: (20 + n * 5).to_string(),
                    salary: (30_000 + n * 10_000).to_string(),
                    department: pick_department(&mut self.rng.lock()),
                }
            })
            .collect()
    }

    pub fn random_department(&self) -> String {
        pick_department(&mut self.rng.lock())
    }

    /// Alphanumeric string of `len` characters.
    pub fn random_string(&self, len: usize) -> String {
        let mut rng = self.rng.lock();
        (0..len)
            .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
            .collect()
    }

    pub fn random_email(&self) -> String {
        format!("{}@{}.com", self.random_string(8), self.random_string(6))
    }

    /// Identifier for naming a test run's artifacts.
    pub fn test_id(&self) -> String {
        format!("test_{}_{}", self.ids.next_token(), self.random_string(9).to_lowercase())
    }
}

impl Default for DataFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn pick_department(rng: &mut StdRng) -> String {
    DEPARTMENTS
        .choose(rng)
        .copied()
        .unwrap_or(DEPARTMENTS[0])
        .to_string()
}
