/// Worker registry for the site safety monitoring service.
///
/// Defines the RFID badges known to this deployment, together with the
/// attributes the feed itself does not carry (age, working level) and the
/// role-tuned limits used to classify their readings. This is the single
/// source of truth for badge uids; a uid missing from the registry is a
/// normal case and resolves to the default profile.

use crate::model::{Profile, Reading, WorkerRole, WorkingLevel, UNKNOWN_WORKER};

// ---------------------------------------------------------------------------
// Worker metadata
// ---------------------------------------------------------------------------

/// Metadata for a single badge holder.
pub struct Worker {
    /// RFID badge uid as sent in field5 of the feed (8 hex characters).
    pub uid: &'static str,
    pub name: &'static str,
    pub role: WorkerRole,
    pub age: u32,
    pub working_level: WorkingLevel,
    /// Role-tuned limits. Heavier physical work gets a lower temperature limit.
    pub profile: Profile,
}

/// All badges registered on site.
pub static WORKER_REGISTRY: &[Worker] = &[
    Worker {
        uid: "A3F29C11",
        name: "Ravi Kumar",
        role: WorkerRole::Engineer,
        age: 28,
        working_level: WorkingLevel::High,
        profile: Profile { temp_threshold: 35.0, gas_threshold: 3000 },
    },
    Worker {
        uid: "5B0E7D42",
        name: "Anita Sharma",
        role: WorkerRole::Supervisor,
        age: 45,
        working_level: WorkingLevel::Medium,
        profile: Profile { temp_threshold: 36.0, gas_threshold: 3000 },
    },
    Worker {
        uid: "C7194A8E",
        name: "Joseph Mathew",
        role: WorkerRole::Engineer,
        age: 56,
        working_level: WorkingLevel::High,
        profile: Profile { temp_threshold: 33.0, gas_threshold: 2500 },
    },
    Worker {
        uid: "0D62B3F5",
        name: "Meera Nair",
        role: WorkerRole::Visitor,
        age: 34,
        working_level: WorkingLevel::Low,
        profile: Profile { temp_threshold: 34.0, gas_threshold: 2500 },
    },
    Worker {
        uid: "9E48C2A7",
        name: "Suresh Pillai",
        role: WorkerRole::Supervisor,
        age: 61,
        working_level: WorkingLevel::Low,
        profile: Profile { temp_threshold: 34.0, gas_threshold: 2800 },
    },
];

/// Looks up a worker by badge uid. Matching ignores case and surrounding
/// whitespace, since some readers report lowercase hex.
pub fn find_worker(uid: &str) -> Option<&'static Worker> {
    let uid = uid.trim();
    WORKER_REGISTRY.iter().find(|w| w.uid.eq_ignore_ascii_case(uid))
}

/// Returns the classification profile for a badge uid, or the default
/// profile when the badge is not registered.
pub fn resolve_profile(uid: &str) -> Profile {
    find_worker(uid).map(|w| w.profile).unwrap_or_default()
}

/// Fills in the attributes the feed does not carry.
///
/// Age and working level always come from the registry. Name and role are
/// taken from the registry only when the feed left them unidentified, so a
/// station that does send them stays authoritative.
pub fn enrich(mut reading: Reading) -> Reading {
    let Some(worker) = find_worker(&reading.worker_uid) else {
        return reading;
    };

    reading.worker_age = Some(worker.age);
    reading.working_level = Some(worker.working_level);
    if reading.worker_name.trim().is_empty() || reading.worker_name == UNKNOWN_WORKER {
        reading.worker_name = worker.name.to_string();
    }
    if reading.worker_role == WorkerRole::Unknown {
        reading.worker_role = worker.role;
    }
    reading
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
