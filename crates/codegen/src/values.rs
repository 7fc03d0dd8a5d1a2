//! Synthetic value generation
//!
//! Produces type-appropriate realistic values for declared column types,
//! used to build test fixtures and payloads. The generator is seedable so
//! fixture output can be made byte-reproducible; without a seed it draws
//! from OS entropy and two calls may differ.

use forge_core::ColumnType;
use forge_ir::Attribute;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value, json};

/// Default length bound for short text values.
const TEXT_BOUND: u32 = 10;

/// Length bound for long text values.
const LONG_TEXT_BOUND: u32 = 100;

// ============================================================================
// ValueGenerator
// ============================================================================

/// Generates pseudo-random values whose shape matches a [`ColumnType`].
#[derive(Debug)]
pub struct ValueGenerator {
    rng: StdRng,
}

impl ValueGenerator {
    /// Create a generator seeded from OS entropy (non-reproducible output).
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic generator for reproducible fixtures.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    // ========================================================================
    // Single values
    // ========================================================================

    /// Generate one value for the given column type.
    ///
    /// `length` bounds textual values; `0` means "use the default bound".
    /// An unrecognized type yields an empty string — a deliberate permissive
    /// fallback, never an error.
    pub fn generate(&mut self, column_type: &ColumnType, length: u32) -> Value {
        match column_type {
            ColumnType::String => {
                let bound = if length == 0 { TEXT_BOUND } else { length.min(TEXT_BOUND) };
                let len = self.rng.gen_range(0..=bound) as usize;
                Value::String(self.random_text(len))
            }
            ColumnType::Text => {
                let len = self.rng.gen_range(0..=LONG_TEXT_BOUND) as usize;
                Value::String(self.random_text(len))
            }
            ColumnType::Integer => Value::from(self.rng.gen_range(0..=20)),
            ColumnType::Float => Value::from(self.rng.gen_range(1.5..=5.5)),
            ColumnType::Boolean => Value::Bool(self.rng.gen_bool(0.5)),
            ColumnType::DateTime => Value::String(
                chrono::Local::now()
                    .format("%Y-%m-%dT%H:%M:%S")
                    .to_string(),
            ),
            ColumnType::Date => {
                Value::String(chrono::Local::now().format("%Y-%m-%d").to_string())
            }
            ColumnType::Time => {
                let hour: u32 = self.rng.gen_range(0..=23);
                let minute: u32 = self.rng.gen_range(0..=59);
                let second: u32 = self.rng.gen_range(0..=59);
                Value::String(format!("{hour:02}:{minute:02}:{second:02}"))
            }
            ColumnType::Json => self.random_json(),
            ColumnType::Uuid => Value::String(uuid::Uuid::new_v4().to_string()),
            ColumnType::Unknown(name) => {
                tracing::debug!(column_type = %name, "unrecognized column type, using empty value");
                Value::String(String::new())
            }
        }
    }

    /// Random alphanumeric string of exactly `len` characters.
    fn random_text(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| self.rng.sample(Alphanumeric) as char)
            .collect()
    }

    /// Fixed-shape nested object used to exercise structured-field
    /// round-tripping: random integer, boolean, float, and two nested
    /// date-like string fields.
    fn random_json(&mut self) -> Value {
        let month: u32 = self.rng.gen_range(1..=12);
        let day: u32 = self.rng.gen_range(1..=28);
        let month2: u32 = self.rng.gen_range(1..=12);
        let day2: u32 = self.rng.gen_range(1..=28);
        let score = (self.rng.gen_range(0.0..=100.0_f64) * 100.0).round() / 100.0;

        json!({
            "id": self.rng.gen_range(1..=100),
            "is_active": self.rng.gen_bool(0.5),
            "score": score,
            "metadata": {
                "created_at": format!("2023-{month:02}-{day:02}"),
                "updated_at": format!("2023-{month2:02}-{day2:02}"),
            }
        })
    }

    // ========================================================================
    // Payloads
    // ========================================================================

    /// Build a create payload: one synthetic value per required attribute,
    /// skipping optional and auto-increment attributes. Foreign-key
    /// attributes receive a synthetic value here; the dependency resolver
    /// replaces them with the created parent's identifier.
    pub fn required_payload(&mut self, attributes: &[Attribute]) -> Map<String, Value> {
        let mut payload = Map::new();
        for attr in attributes {
            if attr.is_required && !attr.is_auto_increment {
                payload.insert(
                    attr.name.clone(),
                    self.generate(&attr.column_type, attr.length),
                );
            }
        }
        payload
    }
}

impl Default for ValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Update transform
// ============================================================================

/// Derive an update payload from a create payload by a fixed transform:
/// booleans flip, numbers increment by one, everything else gets an
/// `updated_` prefix. Callers exclude the identifier and foreign-key fields
/// before applying this; every transformed field is guaranteed to differ
/// from its pre-update value.
pub fn update_payload(payload: &Map<String, Value>) -> Map<String, Value> {
    let mut updated = Map::new();
    for (key, value) in payload {
        updated.insert(key.clone(), transform_value(value));
    }
    updated
}

fn transform_value(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::Bool(!b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i + 1)
            } else if let Some(f) = n.as_f64() {
                Value::from(f + 1.0)
            } else {
                value.clone()
            }
        }
        Value::String(s) => Value::String(format!("updated_{s}")),
        other => Value::String(format!("updated_{other}")),
    }
}

// ============================================================================
// Tests
// ============================================================================
