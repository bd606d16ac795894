//! Optimistic list updates.
//!
//! A client holding a list of rows applies a pending mutation locally before the
//! server confirms it. Confirmation is a full refresh of the list, so the reducer
//! never has to reconcile: it only has to render the speculative state.

use std::fmt::Debug;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Identifier given to a row created locally and not yet persisted.
pub const PENDING_ID: &str = "optimistic";
/// Identifier given to a row whose deletion is in flight.
pub const DELETING_ID: &str = "delete";

pub trait OptimisticRecord: Clone + Debug {
    type Changes: Clone + Debug + PartialEq;

    fn record_id(&self) -> &str;
    fn set_record_id(&mut self, id: String);
    /// Overwrite the fields present in `changes`, keeping the rest.
    fn merge(&mut self, changes: &Self::Changes);

    fn is_pending(&self) -> bool {
        self.record_id() == PENDING_ID
    }

    fn is_deleting(&self) -> bool {
        self.record_id() == DELETING_ID
    }
}

/// Update payload: the target id plus the changed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch<C> {
    pub id: String,
    #[serde(flatten)]
    pub changes: C,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptimisticAction<T: OptimisticRecord> {
    Create(T),
    Update(Patch<T::Changes>),
    Delete(Target),
}

/// Untyped `{action, data}` message as dispatched by a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    pub action: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl<T> OptimisticAction<T>
where
    T: OptimisticRecord + DeserializeOwned,
    T::Changes: DeserializeOwned,
{
    /// `Ok(None)` for tags the reducer does not know.
    pub fn from_envelope(envelope: ActionEnvelope) -> serde_json::Result<Option<Self>> {
        let action = match envelope.action.as_str() {
            "create" => Self::Create(serde_json::from_value(envelope.data)?),
            "update" => Self::Update(serde_json::from_value(envelope.data)?),
            "delete" => Self::Delete(serde_json::from_value(envelope.data)?),
            _ => return Ok(None),
        };
        Ok(Some(action))
    }
}

pub fn apply<T: OptimisticRecord>(state: &mut Vec<T>, action: OptimisticAction<T>) {
    match action {
        OptimisticAction::Create(mut item) => {
            item.set_record_id(PENDING_ID.to_string());
            if state.is_empty() {
                *state = vec![item];
            } else {
                state.push(item);
            }
        }
        OptimisticAction::Update(patch) => {
            for item in state.iter_mut().filter(|item| item.record_id() == patch.id) {
                item.merge(&patch.changes);
            }
        }
        OptimisticAction::Delete(target) => {
            for item in state.iter_mut().filter(|item| item.record_id() == target.id) {
                item.set_record_id(DELETING_ID.to_string());
            }
        }
    }
}

pub fn reduce<T: OptimisticRecord>(mut state: Vec<T>, action: OptimisticAction<T>) -> Vec<T> {
    apply(&mut state, action);
    state
}

/// Apply an untyped action. Unknown tags leave the state untouched; malformed
/// data for a known tag is an error and also leaves the state untouched.
pub fn apply_envelope<T>(state: &mut Vec<T>, envelope: ActionEnvelope) -> serde_json::Result<()>
where
    T: OptimisticRecord + DeserializeOwned,
    T::Changes: DeserializeOwned,
{
    if let Some(action) = OptimisticAction::from_envelope(envelope)? {
        apply(state, action);
    }
    Ok(())
}

pub fn reduce_envelope<T>(mut state: Vec<T>, envelope: ActionEnvelope) -> serde_json::Result<Vec<T>>
where
    T: OptimisticRecord + DeserializeOwned,
    T::Changes: DeserializeOwned,
{
    apply_envelope(&mut state, envelope)?;
    Ok(state)
}

/// Server-confirmed rows plus the mutations still in flight.
#[derive(Debug, Clone)]
pub struct OptimisticList<T: OptimisticRecord> {
    confirmed: Vec<T>,
    pending: Vec<OptimisticAction<T>>,
}

impl<T: OptimisticRecord> OptimisticList<T> {
    pub fn new(confirmed: Vec<T>) -> Self {
        Self {
            confirmed,
            pending: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: OptimisticAction<T>) {
        self.pending.push(action);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The list as it should be rendered right now.
    pub fn view(&self) -> Vec<T> {
        self.pending
            .iter()
            .cloned()
            .fold(self.confirmed.clone(), reduce)
    }

    /// Replace the confirmed rows after a refresh; in-flight actions are settled.
    pub fn confirm(&mut self, refreshed: Vec<T>) {
        self.confirmed = refreshed;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        price: i64,
    }

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct RowChanges {
        name: Option<String>,
        price: Option<i64>,
    }

    impl OptimisticRecord for Row {
        type Changes = RowChanges;

        fn record_id(&self) -> &str {
            &self.id
        }

        fn set_record_id(&mut self, id: String) {
            self.id = id;
        }

        fn merge(&mut self, changes: &RowChanges) {
            if let Some(name) = &changes.name {
                self.name = name.clone();
            }
            if let Some(price) = changes.price {
                self.price = price;
            }
        }
    }

    fn row(id: &str, name: &str, price: i64) -> Row {
        Row {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    #[test]
    fn delete_marks_row_instead_of_removing_it() {
        let state = vec![row("a", "", 0)];
        let next = reduce(
            state,
            OptimisticAction::Delete(Target { id: "a".into() }),
        );
        assert_eq!(next, vec![row("delete", "", 0)]);
        assert!(next[0].is_deleting());
    }

    #[test]
    fn delete_from_envelope_matches_literal_example() {
        let mut state: Vec<Row> = serde_json::from_value(json!([{ "id": "a" }])).unwrap();
        let envelope: ActionEnvelope =
            serde_json::from_value(json!({ "action": "delete", "data": { "id": "a" } })).unwrap();

        apply_envelope(&mut state, envelope).unwrap();

        let rendered: Vec<String> = state.iter().map(|r| r.id.clone()).collect();
        assert_eq!(rendered, vec!["delete".to_string()]);
    }

    #[test]
    fn create_on_empty_list_replaces_it() {
        let next = reduce(Vec::new(), OptimisticAction::Create(row("ignored", "Mug", 1200)));
        assert_eq!(next, vec![row(PENDING_ID, "Mug", 1200)]);
        assert!(next[0].is_pending());
    }

    #[test]
    fn create_appends_with_placeholder_id() {
        let next = reduce(
            vec![row("a", "Hoodie", 5500)],
            OptimisticAction::Create(row("", "Mug", 1200)),
        );
        assert_eq!(next, vec![row("a", "Hoodie", 5500), row(PENDING_ID, "Mug", 1200)]);
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let next = reduce(
            vec![row("a", "Hoodie", 5500), row("b", "Mug", 1200)],
            OptimisticAction::Update(Patch {
                id: "b".into(),
                changes: RowChanges {
                    name: None,
                    price: Some(990),
                },
            }),
        );
        assert_eq!(next, vec![row("a", "Hoodie", 5500), row("b", "Mug", 990)]);
    }

    #[test]
    fn update_of_unknown_id_is_noop() {
        let state = vec![row("a", "Hoodie", 5500)];
        let next = reduce(
            state.clone(),
            OptimisticAction::Update(Patch {
                id: "zzz".into(),
                changes: RowChanges {
                    name: Some("Renamed".into()),
                    price: None,
                },
            }),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn unknown_tag_is_noop() {
        let mut state = vec![row("a", "Hoodie", 5500)];
        let envelope = ActionEnvelope {
            action: "archive".into(),
            data: json!({ "id": "a" }),
        };
        apply_envelope(&mut state, envelope).unwrap();
        assert_eq!(state, vec![row("a", "Hoodie", 5500)]);
    }

    #[test]
    fn malformed_data_for_known_tag_is_rejected() {
        let mut state = vec![row("a", "Hoodie", 5500)];
        let envelope = ActionEnvelope {
            action: "delete".into(),
            data: json!({ "name": "missing id" }),
        };
        assert!(apply_envelope(&mut state, envelope).is_err());
        assert_eq!(state, vec![row("a", "Hoodie", 5500)]);
    }

    #[test]
    fn update_envelope_reads_flattened_patch() {
        let mut state = vec![row("a", "Hoodie", 5500)];
        let envelope: ActionEnvelope = serde_json::from_value(json!({
            "action": "update",
            "data": { "id": "a", "name": "Zip Hoodie" }
        }))
        .unwrap();
        apply_envelope(&mut state, envelope).unwrap();
        assert_eq!(state, vec![row("a", "Zip Hoodie", 5500)]);
    }

    #[test]
    fn list_view_replays_pending_actions_until_confirmed() {
        let mut list = OptimisticList::new(vec![row("a", "Hoodie", 5500)]);
        list.dispatch(OptimisticAction::Create(row("", "Mug", 1200)));
        list.dispatch(OptimisticAction::Delete(Target { id: "a".into() }));

        assert_eq!(
            list.view(),
            vec![row(DELETING_ID, "Hoodie", 5500), row(PENDING_ID, "Mug", 1200)]
        );
        assert_eq!(list.pending_len(), 2);

        list.confirm(vec![row("m1", "Mug", 1200)]);
        assert_eq!(list.view(), vec![row("m1", "Mug", 1200)]);
        assert_eq!(list.pending_len(), 0);
    }
}
