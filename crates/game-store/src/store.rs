//! Shared session handle with per-field change broadcasting.
//!
//! Every write publishes a [`FieldChange`] before the call returns, while the
//! write lock is still held, so receivers see one field's changes in the
//! order they were written. The latest value is always available through
//! [`GameStore::get`], which makes lagging receivers harmless.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::session::{Field, FieldValue, GameMode, GameSession};

/// Notification published for every write to a field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldChange {
    pub field: Field,
    pub value: FieldValue,
    /// Revision of the write that produced this change.
    pub revision: u64,
}

struct State {
    session: GameSession,
    revision: u64,
}

struct Inner {
    state: RwLock<State>,
    fields: [broadcast::Sender<FieldChange>; Field::COUNT],
    all: broadcast::Sender<FieldChange>,
}

/// Cloneable handle to one shared [`GameSession`].
///
/// Clones refer to the same session; use [`GameStore::ptr_eq`] to check
/// identity.
#[derive(Clone)]
pub struct GameStore {
    inner: Arc<Inner>,
}

impl GameStore {
    /// Creates a store with default settings.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        let capacity = config.channel_capacity.max(1);

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(State {
                    session: GameSession::default(),
                    revision: 0,
                }),
                fields: std::array::from_fn(|_| broadcast::channel(capacity).0),
                all: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Returns a copy of all four fields.
    pub fn get(&self) -> GameSession {
        self.read_state().session.clone()
    }

    /// Alias of [`GameStore::get`].
    pub fn snapshot(&self) -> GameSession {
        self.get()
    }

    /// Returns the current value of one field.
    pub fn field(&self, field: Field) -> FieldValue {
        self.read_state().session.get(field)
    }

    pub fn mode(&self) -> String {
        self.read_state().session.mode.clone()
    }

    pub fn difficulty(&self) -> String {
        self.read_state().session.difficulty.clone()
    }

    pub fn points(&self) -> i64 {
        self.read_state().session.points
    }

    pub fn time_count(&self) -> i64 {
        self.read_state().session.time_count
    }

    /// Number of writes applied so far.
    pub fn revision(&self) -> u64 {
        self.read_state().revision
    }

    /// Assigns an untyped value to `field`.
    ///
    /// Fails only when the value kind does not match the field; the state is
    /// unchanged and nothing is published in that case.
    pub fn set(&self, field: Field, value: FieldValue) -> Result<()> {
        let mut state = self.write_state();
        state.session.set(field, value)?;
        self.commit(&mut state, &[field]);
        Ok(())
    }

    /// Assigns an untyped value to the field called `name`.
    pub fn set_by_name(&self, name: &str, value: FieldValue) -> Result<()> {
        let field = Field::from_name(name)?;
        self.set(field, value)
    }

    pub fn set_mode(&self, mode: impl Into<String>) {
        let mut state = self.write_state();
        state.session.mode = mode.into();
        self.commit(&mut state, &[Field::Mode]);
    }

    pub fn set_difficulty(&self, difficulty: impl Into<String>) {
        let mut state = self.write_state();
        state.session.difficulty = difficulty.into();
        self.commit(&mut state, &[Field::Difficulty]);
    }

    pub fn set_points(&self, points: i64) {
        let mut state = self.write_state();
        state.session.points = points;
        self.commit(&mut state, &[Field::Points]);
    }

    pub fn set_time_count(&self, time_count: i64) {
        let mut state = self.write_state();
        state.session.time_count = time_count;
        self.commit(&mut state, &[Field::TimeCount]);
    }

    /// Applies `f` to the session under the write lock.
    ///
    /// Publishes one change per field whose value differs afterwards, in
    /// field declaration order, all sharing one revision. Nothing is
    /// published and the revision stays put when no field changed.
    ///
    /// `f` must only touch the `&mut GameSession` it is given: calling any
    /// method of this store (or a clone of it) from inside `f` re-enters the
    /// write lock and deadlocks or panics.
    ///
    /// If `f` panics the session is restored to its previous value before
    /// the panic continues, so no partial write is ever visible.
    pub fn update<R>(&self, f: impl FnOnce(&mut GameSession) -> R) -> R {
        let mut state = self.write_state();
        let before = state.session.clone();
        let output = match panic::catch_unwind(AssertUnwindSafe(|| f(&mut state.session))) {
            Ok(output) => output,
            Err(payload) => {
                state.session = before;
                drop(state);
                panic::resume_unwind(payload);
            }
        };

        let changed: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|&field| before.get(field) != state.session.get(field))
            .collect();
        if !changed.is_empty() {
            self.commit(&mut state, &changed);
        }

        output
    }

    /// Adds `delta` to the score and returns the new score.
    pub fn add_points(&self, delta: i64) -> i64 {
        self.update(|session| {
            session.points = session.points.wrapping_add(delta);
            session.points
        })
    }

    /// Decrements the countdown by one and returns the remaining time.
    pub fn tick(&self) -> i64 {
        self.update(|session| {
            session.time_count = session.time_count.wrapping_sub(1);
            session.time_count
        })
    }

    /// Restores the initial values.
    pub fn reset(&self) {
        self.update(|session| *session = GameSession::default());
    }

    /// Parses the current mode tag, if it is one of the well-known ones.
    pub fn game_mode(&self) -> Option<GameMode> {
        self.read_state().session.game_mode()
    }

    /// Subscribes to changes of a single field.
    pub fn subscribe(&self, field: Field) -> broadcast::Receiver<FieldChange> {
        self.inner.fields[field.index()].subscribe()
    }

    /// Subscribes to changes of every field.
    pub fn subscribe_all(&self) -> broadcast::Receiver<FieldChange> {
        self.inner.all.subscribe()
    }

    /// Returns true if both handles refer to the same session.
    pub fn ptr_eq(&self, other: &GameStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn commit(&self, state: &mut State, fields: &[Field]) {
        state.revision += 1;
        for &field in fields {
            self.publish(FieldChange {
                field,
                value: state.session.get(field),
                revision: state.revision,
            });
        }
    }

    fn publish(&self, change: FieldChange) {
        let field = change.field;
        let field_tx = &self.inner.fields[field.index()];

        if field_tx.send(change.clone()).is_err() {
            tracing::trace!("No subscribers for field {}", field);
        }
        if self.inner.all.send(change).is_err() {
            // No subscribers at all - this is normal, not an error
            tracing::trace!("No store-wide subscribers for field {}", field);
        }
    }

    // Every write path, including an unwinding `update`, leaves a complete
    // session behind, so a poisoned lock is recovered instead of propagated.
    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read_state();
        f.debug_struct("GameStore")
            .field("session", &state.session)
            .field("revision", &state.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::session::FieldKind;

    #[test]
    fn fresh_store_has_initial_values() {
        let store = GameStore::new();
        assert_eq!(store.get(), GameSession::default());
        assert_eq!(store.mode(), "start");
        assert_eq!(store.difficulty(), "");
        assert_eq!(store.points(), 0);
        assert_eq!(store.time_count(), 59);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn clones_share_state() {
        let store = GameStore::new();
        let other = store.clone();
        other.set_points(7);
        assert_eq!(store.points(), 7);
        assert!(store.ptr_eq(&other));
        assert!(!store.ptr_eq(&GameStore::new()));
    }

    #[test]
    fn playing_scenario() {
        let store = GameStore::new();
        store.set(Field::Mode, "playing".into()).unwrap();
        store.set(Field::Points, FieldValue::Integer(10)).unwrap();

        assert_eq!(
            store.get(),
            GameSession {
                mode: "playing".to_string(),
                difficulty: String::new(),
                points: 10,
                time_count: 59,
            }
        );
    }

    #[test]
    fn negative_countdown_is_accepted() {
        let store = GameStore::new();
        store.set_time_count(0);
        store.set_time_count(-1);
        assert_eq!(store.time_count(), -1);
        assert_eq!(store.tick(), -2);
    }

    #[test]
    fn writes_do_not_touch_other_fields() {
        let store = GameStore::new();
        for field in Field::ALL {
            let before = store.get();
            let value = match field.kind() {
                FieldKind::Text => FieldValue::from("changed"),
                FieldKind::Integer => FieldValue::Integer(-42),
            };
            store.set(field, value.clone()).unwrap();
            assert_eq!(store.field(field), value);
            for other in Field::ALL.into_iter().filter(|&f| f != field) {
                assert_eq!(store.field(other), before.get(other));
            }
        }
    }

    #[test]
    fn rejected_writes_leave_state_and_revision() {
        let store = GameStore::new();
        assert_eq!(
            store.set_by_name("lives", FieldValue::Integer(3)),
            Err(StoreError::UnknownField("lives".to_string()))
        );
        assert!(matches!(
            store.set(Field::Difficulty, FieldValue::Integer(3)),
            Err(StoreError::KindMismatch { field: Field::Difficulty, .. })
        ));
        assert_eq!(store.get(), GameSession::default());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn update_without_change_keeps_revision() {
        let store = GameStore::new();
        store.update(|session| session.points = 0);
        assert_eq!(store.revision(), 0);

        assert_eq!(store.add_points(5), 5);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn reset_restores_initial_values() {
        let store = GameStore::new();
        store.set_mode(GameMode::Finished);
        store.set_difficulty("hard");
        store.add_points(12);
        store.tick();

        store.reset();
        assert_eq!(store.get(), GameSession::default());
        assert_eq!(store.game_mode(), Some(GameMode::Start));
    }

    #[test]
    fn countdown_wraps_below_minimum() {
        let store = GameStore::new();
        store.set_time_count(i64::MIN);
        assert_eq!(store.tick(), i64::MAX);
        assert_eq!(store.time_count(), i64::MAX);
    }

    #[test]
    fn points_wrap_above_maximum() {
        let store = GameStore::new();
        store.set_points(i64::MAX);
        assert_eq!(store.add_points(1), i64::MIN);
        assert_eq!(store.add_points(-1), i64::MAX);
    }

    #[test]
    fn every_field_round_trips_edge_values() {
        let texts = ["", "playing", "ノーマル", "très difficile 🐟", " padded "];
        let integers = [i64::MIN, -1, 0, 1, 59, i64::MAX];

        let store = GameStore::new();
        for field in Field::ALL {
            let values: Vec<FieldValue> = match field.kind() {
                FieldKind::Text => texts.iter().map(|&text| FieldValue::from(text)).collect(),
                FieldKind::Integer => integers.iter().map(|&n| FieldValue::Integer(n)).collect(),
            };
            for value in values {
                let others: Vec<FieldValue> = Field::ALL
                    .into_iter()
                    .filter(|&f| f != field)
                    .map(|f| store.field(f))
                    .collect();

                store.set(field, value.clone()).unwrap();
                assert_eq!(store.field(field), value);

                let after: Vec<FieldValue> = Field::ALL
                    .into_iter()
                    .filter(|&f| f != field)
                    .map(|f| store.field(f))
                    .collect();
                assert_eq!(after, others);
            }
        }

        store.set_mode("ノーマル");
        store.set_difficulty("");
        store.set_points(i64::MIN);
        store.set_time_count(i64::MAX);
        assert_eq!(
            store.get(),
            GameSession {
                mode: "ノーマル".to_string(),
                difficulty: String::new(),
                points: i64::MIN,
                time_count: i64::MAX,
            }
        );
    }

    #[test]
    fn panicking_update_restores_session() {
        let store = GameStore::new();
        let mut rx = store.subscribe_all();
        store.set_points(3);
        rx.try_recv().unwrap();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            store.update(|session| {
                session.points = 100;
                session.mode = "broken".to_string();
                panic!("update failed halfway");
            })
        }));
        assert!(result.is_err());

        assert_eq!(store.points(), 3);
        assert_eq!(store.mode(), "start");
        assert_eq!(store.revision(), 1);
        assert!(rx.try_recv().is_err());

        // The lock is still usable afterwards.
        assert_eq!(store.add_points(1), 4);
    }

    #[test]
    fn same_value_write_still_counts() {
        let store = GameStore::new();
        let mut rx = store.subscribe(Field::Mode);
        store.set_mode("start");
        assert_eq!(store.revision(), 1);
        assert_eq!(rx.try_recv().unwrap().value, FieldValue::from("start"));
    }
}
