use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct ConversationLimits {
    /// Exchanges (one user turn plus one assistant turn) kept per caller.
    pub max_exchanges: usize,
    /// Callers tracked at once before the least recently active one is dropped.
    pub max_callers: usize,
    pub idle_ttl: Duration,
}

impl Default for ConversationLimits {
    fn default() -> Self {
        Self {
            max_exchanges: 10,
            max_callers: 10_000,
            idle_ttl: Duration::from_secs(3600),
        }
    }
}

impl ConversationLimits {
    fn max_turns(&self) -> usize {
        self.max_exchanges.max(1) * 2
    }
}

type CallerHistory = Arc<AsyncMutex<Vec<ConversationTurn>>>;
type SlotMap = Arc<Mutex<HashMap<String, CallerSlot>>>;

struct CallerSlot {
    history: CallerHistory,
    last_active: Instant,
}

impl CallerSlot {
    // The map holds one reference; any other means an exchange or read is in flight.
    fn in_use(&self) -> bool {
        Arc::strong_count(&self.history) > 1
    }
}

/// Process-lifetime conversation history keyed by caller identity.
///
/// Each caller's turns sit behind their own async lock so an exchange (read
/// history, wait on the model, record the reply) is serialized per caller
/// while different callers proceed independently. A new caller only counts
/// against `max_callers` once an exchange is recorded for them.
#[derive(Clone)]
pub struct ConversationStore {
    slots: SlotMap,
    limits: ConversationLimits,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(ConversationLimits::default())
    }
}

impl ConversationStore {
    pub fn new(limits: ConversationLimits) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            limits,
        }
    }

    /// Current history for `caller_id`, oldest first. Unknown callers get an
    /// empty history and no entry is created for them.
    pub async fn get(&self, caller_id: &str) -> Vec<ConversationTurn> {
        let history = lock_slots(&self.slots)
            .get(caller_id)
            .map(|slot| Arc::clone(&slot.history));

        match history {
            Some(history) => history.lock().await.clone(),
            None => Vec::new(),
        }
    }

    pub async fn append(
        &self,
        caller_id: &str,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) {
        let mut exchange = self.begin_exchange(caller_id).await;
        exchange.record(user_text, assistant_text);
    }

    /// Locks the caller's history for one full exchange.
    ///
    /// Dropping the exchange without recording leaves the store as it was:
    /// no caller is evicted and a slot opened for a new caller is removed.
    pub async fn begin_exchange(&self, caller_id: &str) -> ConversationExchange {
        let history = self.slot_history(caller_id, Instant::now());
        ConversationExchange {
            history: history.lock_owned().await,
            slots: Arc::clone(&self.slots),
            limits: self.limits,
        }
    }

    pub fn caller_count(&self) -> usize {
        lock_slots(&self.slots).len()
    }

    /// Drops callers idle for longer than the configured TTL. Returns how many were removed.
    pub fn prune_idle(&self) -> usize {
        self.prune_idle_at(Instant::now())
    }

    pub fn spawn_pruner(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = store.prune_idle();
                if removed > 0 {
                    debug!(removed, "pruned idle conversation histories");
                }
            }
        })
    }

    fn prune_idle_at(&self, now: Instant) -> usize {
        let mut slots = lock_slots(&self.slots);
        let before = slots.len();
        retain_active(&mut slots, now, self.limits.idle_ttl);
        before - slots.len()
    }

    fn slot_history(&self, caller_id: &str, now: Instant) -> CallerHistory {
        let mut slots = lock_slots(&self.slots);
        let slot = slots
            .entry(caller_id.to_string())
            .or_insert_with(|| CallerSlot {
                history: Arc::new(AsyncMutex::new(Vec::new())),
                last_active: now,
            });
        slot.last_active = now;
        Arc::clone(&slot.history)
    }
}

/// Exclusive access to one caller's history for the duration of an exchange.
pub struct ConversationExchange {
    history: OwnedMutexGuard<Vec<ConversationTurn>>,
    slots: SlotMap,
    limits: ConversationLimits,
}

impl ConversationExchange {
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Appends a user turn and an assistant turn, then drops whole exchanges
    /// from the front until the history fits.
    pub fn record(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        let first_exchange = self.history.is_empty();
        let now = Utc::now();
        self.history.push(ConversationTurn {
            role: TurnRole::User,
            content: user_text.into(),
            created_at: now,
        });
        self.history.push(ConversationTurn {
            role: TurnRole::Assistant,
            content: assistant_text.into(),
            created_at: now,
        });

        while self.history.len() > self.limits.max_turns() {
            self.history.drain(..2);
        }

        if first_exchange {
            let mut slots = lock_slots(&self.slots);
            enforce_capacity(&mut slots, Instant::now(), &self.limits);
        }
    }
}

impl Drop for ConversationExchange {
    fn drop(&mut self) {
        // Only never-recorded slots are empty; histories never trim below one exchange.
        if !self.history.is_empty() {
            return;
        }

        let mut slots = lock_slots(&self.slots);
        let abandoned = slots
            .iter()
            .find(|(_, slot)| Arc::ptr_eq(&slot.history, OwnedMutexGuard::mutex(&self.history)))
            .filter(|(_, slot)| Arc::strong_count(&slot.history) == 2)
            .map(|(caller_id, _)| caller_id.clone());
        if let Some(caller_id) = abandoned {
            slots.remove(&caller_id);
        }
    }
}

fn lock_slots(slots: &SlotMap) -> MutexGuard<'_, HashMap<String, CallerSlot>> {
    match slots.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn retain_active(slots: &mut HashMap<String, CallerSlot>, now: Instant, idle_ttl: Duration) {
    slots.retain(|_, slot| {
        slot.in_use() || now.saturating_duration_since(slot.last_active) <= idle_ttl
    });
}

fn enforce_capacity(
    slots: &mut HashMap<String, CallerSlot>,
    now: Instant,
    limits: &ConversationLimits,
) {
    retain_active(slots, now, limits.idle_ttl);
    while slots.len() > limits.max_callers {
        let Some(oldest) = least_recently_active(slots) else {
            break;
        };
        slots.remove(&oldest);
        debug!("evicted least recently active conversation history");
    }
}

fn least_recently_active(slots: &HashMap<String, CallerSlot>) -> Option<String> {
    slots
        .iter()
        .filter(|(_, slot)| !slot.in_use())
        .min_by_key(|(_, slot)| slot.last_active)
        .map(|(caller_id, _)| caller_id.clone())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{ConversationLimits, ConversationStore, TurnRole};

    fn store_with(max_callers: usize, idle_ttl: Duration) -> ConversationStore {
        ConversationStore::new(ConversationLimits {
            max_exchanges: 10,
            max_callers,
            idle_ttl,
        })
    }

    #[tokio::test]
    async fn append_then_get_returns_user_then_assistant() {
        let store = ConversationStore::default();
        store.append("patient-1", "I have a cough", "Rest and fluids.").await;

        let turns = store.get("patient-1").await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "I have a cough");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].content, "Rest and fluids.");
    }

    #[tokio::test]
    async fn keeps_only_the_most_recent_ten_exchanges() {
        let store = ConversationStore::default();
        for index in 0..11 {
            store
                .append("patient-1", format!("question {index}"), format!("answer {index}"))
                .await;
        }

        let turns = store.get("patient-1").await;
        assert_eq!(turns.len(), 20);
        assert_eq!(turns[0].content, "question 1");
        assert_eq!(turns[19].content, "answer 10");
        assert!(turns.chunks(2).all(|pair| {
            pair[0].role == TurnRole::User && pair[1].role == TurnRole::Assistant
        }));
    }

    #[tokio::test]
    async fn reading_an_unknown_caller_creates_no_entry() {
        let store = ConversationStore::default();
        assert!(store.get("nobody").await.is_empty());
        assert_eq!(store.caller_count(), 0);
    }

    #[tokio::test]
    async fn evicts_least_recently_active_caller_at_capacity() {
        let store = store_with(2, Duration::from_secs(3600));
        store.append("first", "q", "a").await;
        store.append("second", "q", "a").await;
        store.append("first", "q again", "a again").await;
        store.append("third", "q", "a").await;

        assert_eq!(store.caller_count(), 2);
        assert!(store.get("second").await.is_empty());
        assert_eq!(store.get("first").await.len(), 4);
        assert_eq!(store.get("third").await.len(), 2);
    }

    #[tokio::test]
    async fn prunes_callers_idle_past_ttl() {
        let store = store_with(10, Duration::from_secs(60));
        store.append("idle", "q", "a").await;

        assert_eq!(store.prune_idle_at(Instant::now()), 0);
        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(store.prune_idle_at(later), 1);
        assert_eq!(store.caller_count(), 0);
    }

    #[tokio::test]
    async fn in_flight_exchanges_survive_eviction() {
        let store = store_with(1, Duration::from_secs(60));
        let mut exchange = store.begin_exchange("busy").await;

        let later = Instant::now() + Duration::from_secs(120);
        assert_eq!(store.prune_idle_at(later), 0);

        store.append("other", "q", "a").await;
        exchange.record("still here", "yes");
        drop(exchange);

        assert_eq!(store.get("busy").await.len(), 2);
    }

    #[tokio::test]
    async fn abandoned_exchange_for_new_caller_evicts_nobody() {
        let store = store_with(1, Duration::from_secs(3600));
        store.append("alice", "q", "a").await;

        let exchange = store.begin_exchange("bob").await;
        assert!(exchange.turns().is_empty());
        drop(exchange);

        assert_eq!(store.caller_count(), 1);
        assert_eq!(store.get("alice").await.len(), 2);
        assert!(store.get("bob").await.is_empty());
    }

    #[tokio::test]
    async fn abandoned_exchange_keeps_existing_history() {
        let store = ConversationStore::default();
        store.append("alice", "q", "a").await;

        drop(store.begin_exchange("alice").await);

        assert_eq!(store.caller_count(), 1);
        assert_eq!(store.get("alice").await.len(), 2);
    }

    #[tokio::test]
    async fn recording_a_new_caller_at_capacity_evicts_the_oldest() {
        let store = store_with(1, Duration::from_secs(3600));
        store.append("alice", "q", "a").await;
        store.append("bob", "q", "a").await;

        assert_eq!(store.caller_count(), 1);
        assert!(store.get("alice").await.is_empty());
        assert_eq!(store.get("bob").await.len(), 2);
    }

    #[tokio::test]
    async fn exchanges_for_the_same_caller_are_serialized() {
        let store = ConversationStore::default();
        let first = store.begin_exchange("patient-1").await;

        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            store.begin_exchange("patient-1"),
        )
        .await;
        assert!(blocked.is_err(), "second exchange should wait for the first");

        let other_caller =
            tokio::time::timeout(Duration::from_millis(50), store.begin_exchange("patient-2"))
                .await;
        assert!(other_caller.is_ok(), "other callers should not be blocked");

        drop(first);
        let second =
            tokio::time::timeout(Duration::from_millis(50), store.begin_exchange("patient-1"))
                .await;
        assert!(second.is_ok());
    }
}
