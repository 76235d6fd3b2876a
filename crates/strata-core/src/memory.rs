//! # Memory
//!
//! Request-scoped execution traces keyed by correlation id, and the store
//! contract backends implement.
//!
//! A [`MemoryRecord`] is a short-lived diagnostic trace: which agent ran last
//! under a correlation id and what it returned. Records are created on the
//! first dispatch that carries a given id, updated in place afterwards, and
//! never deleted; they live as long as the store does.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MemoryResult;
use crate::identifiers::CorrelationId;
use crate::tier::Tier;

/// Diagnostic trace for one correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub correlation_id: CorrelationId,
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Open payload; holds at least [`LAST_AGENT`](Self::LAST_AGENT) and
    /// [`LAST_OUTPUT`](Self::LAST_OUTPUT) after a successful dispatch.
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl MemoryRecord {
    /// Key under which the name of the last agent run is kept.
    pub const LAST_AGENT: &'static str = "last_agent";
    /// Key under which the last successful output is kept.
    pub const LAST_OUTPUT: &'static str = "last_output";

    /// Create an empty record stamped with the current time.
    pub fn new(correlation_id: CorrelationId, tier: Tier) -> Self {
        let now = Utc::now();
        Self {
            correlation_id,
            tier,
            created_at: now,
            updated_at: now,
            data: Map::new(),
        }
    }

    /// Note a successful agent run.
    pub fn record_run(&mut self, agent: &str, output: Value) {
        self.data
            .insert(Self::LAST_AGENT.to_string(), Value::String(agent.to_string()));
        self.data.insert(Self::LAST_OUTPUT.to_string(), output);
    }

    pub fn last_agent(&self) -> Option<&str> {
        self.data.get(Self::LAST_AGENT).and_then(Value::as_str)
    }

    pub fn last_output(&self) -> Option<&Value> {
        self.data.get(Self::LAST_OUTPUT)
    }

    /// Stamp `updated_at` with the current time, always moving it forward.
    ///
    /// Two upserts inside one clock tick would otherwise leave `updated_at`
    /// unchanged, so the new value is at least one microsecond past the old.
    pub fn touch(&mut self) {
        self.updated_at = advance(self.updated_at);
    }
}

fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Correlation-id-keyed table of memory records.
///
/// Implementations must be safe to share across threads. Operations on
/// distinct ids are independent; concurrent writers on the same id are
/// last-writer-wins.
pub trait MemoryStore: Send + Sync {
    /// Fetch a record by correlation id.
    fn get(&self, correlation_id: &CorrelationId) -> MemoryResult<Option<MemoryRecord>>;

    /// Get-or-create.
    ///
    /// Returns the existing record untouched if there is one; otherwise
    /// stores and returns a new record for `tier`. Repeated calls with the
    /// same id never create a second record.
    fn ensure(&self, correlation_id: &CorrelationId, tier: Tier) -> MemoryResult<MemoryRecord>;

    /// Refresh `updated_at` and store the record under its correlation id,
    /// replacing any previous value.
    fn upsert(&self, record: MemoryRecord) -> MemoryResult<MemoryRecord>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
