//! In-memory kanban board.
//!
//! Cards are kept in one vector in display order; a column is the ordered
//! subset of cards whose record sits in it. New and moved cards go to the
//! top of their column.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::db::PersistedTask;
use crate::error::{Error, Result};
use crate::fields::Column;
use crate::task::{now_to_second, parse_timestamp, TaskRecord};

/// A task record together with its board id.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: u64,
    pub record: TaskRecord,
}

/// What removing a card means for its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    /// Finished card: removal hands out the reward.
    Claim,
    /// Unfinished card: removal is destructive and should be confirmed.
    Delete,
}

/// A card taken off the board.
#[derive(Debug, Clone, PartialEq)]
pub enum Removed {
    Claimed(TaskRecord),
    Deleted(TaskRecord),
}

impl Removed {
    pub fn record(&self) -> &TaskRecord {
        match self {
            Removed::Claimed(record) | Removed::Deleted(record) => record,
        }
    }
}

/// Persisted form of the board: column index ("0", "1", "2") to ordered records.
pub type PersistedColumns = BTreeMap<String, Vec<PersistedTask>>;

#[derive(Debug, Default)]
pub struct Board {
    cards: Vec<Card>,
    next_id: u64,
}

impl Board {
    pub fn new() -> Self {
        Board { cards: Vec::new(), next_id: 1 }
    }

    /// Insert a card at the top of its column and return its id.
    pub fn add_card(&mut self, record: TaskRecord) -> u64 {
        let id = self.allocate_id();
        debug!(id, title = %record.title, column = ?record.column, "add_card");
        self.cards.insert(0, Card { id, record });
        id
    }

    /// Move a card one column left (-1) or right (+1), wrapping around.
    pub fn move_card(&mut self, id: u64, delta: i64) -> Result<Column> {
        if delta != -1 && delta != 1 {
            return Err(Error::Validation(format!("Cards move one column at a time, got {delta}")));
        }
        let pos = self.position(id)?;
        let mut card = self.cards.remove(pos);
        let target = card.record.column.shifted(delta);
        debug!(id, from = ?card.record.column, to = ?target, "move_card");
        card.record.column = target;
        self.cards.insert(0, card);
        Ok(target)
    }

    /// How removing the card should be presented.
    pub fn removal_kind(&self, id: u64) -> Result<RemovalKind> {
        let card = self.get(id).ok_or(Error::NotFound(id))?;
        Ok(if card.record.column == Column::Done {
            RemovalKind::Claim
        } else {
            RemovalKind::Delete
        })
    }

    /// Remove a card; finished cards are reported as claimed.
    pub fn delete_card(&mut self, id: u64) -> Result<Removed> {
        let pos = self.position(id)?;
        let card = self.cards.remove(pos);
        debug!(id, column = ?card.record.column, "delete_card");
        Ok(if card.record.column == Column::Done {
            Removed::Claimed(card.record)
        } else {
            Removed::Deleted(card.record)
        })
    }

    pub fn get(&self, id: u64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Cards of one column, top first.
    pub fn column(&self, column: Column) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.record.column == column).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Group the records by column index for the state file.
    pub fn serialize(&self) -> PersistedColumns {
        let mut out = PersistedColumns::new();
        for column in Column::ALL {
            let records = self
                .column(column)
                .into_iter()
                .map(|card| PersistedTask::from_record(&card.record))
                .collect();
            out.insert(column.index().to_string(), records);
        }
        out
    }

    /// Rebuild a board from the state file's column map.
    ///
    /// Ids are handed out in load order. Unknown column keys and untitled
    /// records are skipped.
    pub fn deserialize(columns: &PersistedColumns) -> Board {
        let mut board = Board::new();
        for column in Column::ALL {
            let Some(records) = columns.get(&column.index().to_string()) else {
                continue;
            };
            for persisted in records {
                match record_from_persisted(persisted, column) {
                    Some(record) => {
                        let id = board.allocate_id();
                        board.cards.push(Card { id, record });
                    }
                    None => warn!(column = ?column, "deserialize: skipping task without a title"),
                }
            }
        }
        for key in columns.keys() {
            let known = key.parse::<usize>().ok().and_then(Column::from_index).is_some();
            if !known {
                warn!(%key, "deserialize: ignoring unknown column");
            }
        }
        board
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    fn position(&self, id: u64) -> Result<usize> {
        self.cards.iter().position(|c| c.id == id).ok_or(Error::NotFound(id))
    }
}

fn record_from_persisted(persisted: &PersistedTask, column: Column) -> Option<TaskRecord> {
    let title = persisted.title.trim();
    if title.is_empty() {
        return None;
    }
    let (created_at, raw_timestamp) = match persisted.timestamp.as_deref() {
        Some(text) => match parse_timestamp(text) {
            Some(at) => (at, None),
            None => {
                warn!(%text, "deserialize: unreadable timestamp kept verbatim");
                (now_to_second(), Some(text.to_string()))
            }
        },
        None => (now_to_second(), None),
    };
    Some(TaskRecord {
        title: persisted.title.clone(),
        description: persisted.desc.clone().unwrap_or_default(),
        reward: persisted.reward.clone().filter(|r| !r.is_empty()),
        deadline: persisted.deadline.clone(),
        created_at,
        raw_timestamp,
        column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> TaskRecord {
        TaskRecord::new(title, "desc", Some("cake"), None).unwrap()
    }

    fn titles(board: &Board, column: Column) -> Vec<String> {
        board.column(column).iter().map(|c| c.record.title.clone()).collect()
    }

    #[test]
    fn test_add_card_goes_to_top_of_pending() {
        let mut board = Board::new();
        let first = board.add_card(record("first"));
        let second = board.add_card(record("second"));
        assert_ne!(first, second);
        assert_eq!(titles(&board, Column::Pending), vec!["second", "first"]);
    }

    #[test]
    fn test_move_card_is_its_own_inverse() {
        for start in Column::ALL {
            let mut board = Board::new();
            let mut rec = record("card");
            rec.column = start;
            let id = board.add_card(rec);
            board.move_card(id, 1).unwrap();
            let back = board.move_card(id, -1).unwrap();
            assert_eq!(back, start);
            assert_eq!(board.get(id).unwrap().record.column, start);
        }
    }

    #[test]
    fn test_move_card_wraps() {
        let mut board = Board::new();
        let id = board.add_card(record("card"));
        assert_eq!(board.move_card(id, -1).unwrap(), Column::Done);
        assert_eq!(board.move_card(id, 1).unwrap(), Column::Pending);
    }

    #[test]
    fn test_move_card_rejects_large_delta() {
        let mut board = Board::new();
        let id = board.add_card(record("card"));
        assert!(matches!(board.move_card(id, 2), Err(Error::Validation(_))));
        assert!(matches!(board.move_card(id, 0), Err(Error::Validation(_))));
        assert!(matches!(board.move_card(99, 1), Err(Error::NotFound(99))));
    }

    #[test]
    fn test_moved_card_goes_to_top() {
        let mut board = Board::new();
        let a = board.add_card(record("a"));
        board.move_card(a, 1).unwrap();
        let b = board.add_card(record("b"));
        board.move_card(b, 1).unwrap();
        assert_eq!(titles(&board, Column::InProgress), vec!["b", "a"]);
    }

    #[test]
    fn test_delete_claims_done_cards() {
        let mut board = Board::new();
        let id = board.add_card(record("finish"));
        assert_eq!(board.removal_kind(id).unwrap(), RemovalKind::Delete);
        board.move_card(id, -1).unwrap();
        assert_eq!(board.removal_kind(id).unwrap(), RemovalKind::Claim);
        match board.delete_card(id).unwrap() {
            Removed::Claimed(rec) => assert_eq!(rec.reward.as_deref(), Some("cake")),
            other => panic!("expected claim, got {other:?}"),
        }
        assert!(board.is_empty());
    }

    #[test]
    fn test_delete_pending_card() {
        let mut board = Board::new();
        let id = board.add_card(record("drop me"));
        assert!(matches!(board.delete_card(id).unwrap(), Removed::Deleted(_)));
        assert!(matches!(board.delete_card(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_serialize_roundtrip_done_column() {
        let mut board = Board::new();
        let mut rec = TaskRecord::new("Homework", "Finish it", Some("Good mark"), Some("22:00")).unwrap();
        rec.column = Column::Done;
        board.add_card(rec.clone());
        let mut plain = TaskRecord::new("No reward", "", None, None).unwrap();
        plain.column = Column::Done;
        board.add_card(plain.clone());

        let persisted = board.serialize();
        assert_eq!(persisted.len(), 3);
        assert_eq!(persisted["2"].len(), 2);

        let restored = Board::deserialize(&persisted);
        let done: Vec<&TaskRecord> = restored.column(Column::Done).iter().map(|c| &c.record).collect();
        assert_eq!(done, vec![&plain, &rec]);
    }

    #[test]
    fn test_deserialize_skips_untitled_and_unknown_columns() {
        let mut columns = PersistedColumns::new();
        columns.insert("0".into(), vec![PersistedTask::titled("Example"), PersistedTask::titled("  ")]);
        columns.insert("7".into(), vec![PersistedTask::titled("Lost")]);
        let board = Board::deserialize(&columns);
        assert_eq!(board.len(), 1);
        let card = board.get(1).unwrap();
        assert_eq!(card.record.title, "Example");
        assert_eq!(card.record.description, "");
        assert_eq!(card.record.reward, None);
    }

    #[test]
    fn test_deserialize_treats_empty_reward_as_absent() {
        let mut task = PersistedTask::titled("Example");
        task.reward = Some(String::new());
        task.timestamp = Some("not a time".into());
        let mut columns = PersistedColumns::new();
        columns.insert("1".into(), vec![task]);
        let board = Board::deserialize(&columns);
        let card = board.column(Column::InProgress)[0];
        assert_eq!(card.record.reward, None);
    }

    #[test]
    fn test_unreadable_timestamp_survives_round_trip() {
        let mut task = PersistedTask::titled("Legacy");
        task.timestamp = Some("[10:00] [01/02]".into());
        let mut columns = PersistedColumns::new();
        columns.insert("0".into(), vec![task]);

        let board = Board::deserialize(&columns);
        assert_eq!(board.column(Column::Pending)[0].record.timestamp(), "[10:00] [01/02]");
        let persisted = board.serialize();
        assert_eq!(persisted["0"][0].timestamp.as_deref(), Some("[10:00] [01/02]"));
    }
}
