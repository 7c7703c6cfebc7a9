use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Schema version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

type SnapshotResult<T> = core::result::Result<T, SnapshotError>;

/// Saved game as it goes to storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub version: u32,
    pub operation: Operator,
    pub level: u32,
    pub question: QuestionRecord,
    pub user: UserRecord,
    pub answers: Vec<TileRecord>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub answer: Option<f64>,
    pub answers_needed: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub answer: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub index: TileIndex,
    pub answer: TileValue,
    pub selected: bool,
    pub used: bool,
    /// Highlighted by the last reveal.
    pub completes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SelectionOrder>,
}

impl TileRecord {
    pub fn new(tile: &Tile, completes: bool) -> Self {
        Self {
            index: tile.index(),
            answer: tile.value(),
            selected: tile.is_selected(),
            used: tile.is_used(),
            completes,
            order: tile.selection_order(),
        }
    }

    fn state(&self) -> TileState {
        match (self.used, self.selected) {
            (true, _) => TileState::Used,
            (false, true) => TileState::Selected,
            (false, false) => TileState::Available,
        }
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    version: Option<u32>,
}

impl GameSnapshot {
    /// Parses and checks a saved game. The version is read first so an old or foreign layout is reported as such
    /// rather than as a missing field.
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        match probe.version {
            None => return Err(SnapshotError::MissingVersion),
            Some(SNAPSHOT_VERSION) => {}
            Some(version) => return Err(SnapshotError::UnsupportedVersion(version)),
        }

        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> SnapshotResult<()> {
        use SnapshotError::Inconsistent;

        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        if self.level == 0 {
            return Err(Inconsistent("level must start at 1"));
        }
        match self.question.answer {
            None => return Err(Inconsistent("question has no answer")),
            Some(answer) if !answer.is_finite() => {
                return Err(Inconsistent("question answer is not a number"));
            }
            Some(_) => {}
        }
        if self.question.answers_needed == 0 {
            return Err(Inconsistent("question needs no operands"));
        }
        if self.answers.is_empty() {
            return Err(Inconsistent("no tiles"));
        }

        let mut seen = HashSet::with_capacity(self.answers.len());
        for record in &self.answers {
            if !seen.insert(record.index) {
                return Err(Inconsistent("duplicate tile index"));
            }
            if record.answer > MAX_TILE_VALUE {
                return Err(Inconsistent("tile value is not a single digit"));
            }
            if record.selected && record.used {
                return Err(Inconsistent("tile is both used and selected"));
            }
        }
        Ok(())
    }

    pub fn deck(&self) -> SnapshotResult<TileDeck> {
        let tiles = self
            .answers
            .iter()
            .map(|record| Tile::restored(record.index, record.answer, record.state(), record.order))
            .collect::<Result<Vec<_>>>()?;
        Ok(TileDeck::from_tiles(tiles)?)
    }

    pub fn question(&self) -> SnapshotResult<Question> {
        let target = self
            .question
            .answer
            .ok_or(SnapshotError::Inconsistent("question has no answer"))?;
        Ok(Question::new(
            self.operation,
            target,
            self.question.answers_needed,
        ))
    }

    /// Tiles flagged as completing the selection, in deck order.
    pub fn highlighted(&self) -> Vec<TileIndex> {
        self.answers
            .iter()
            .filter(|record| record.completes)
            .map(|record| record.index)
            .collect()
    }
}

impl GameSession {
    pub fn snapshot(&self) -> GameSnapshot {
        let question = self.question();
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            operation: self.operator(),
            level: self.level(),
            question: QuestionRecord {
                answer: Some(question.target()),
                answers_needed: question.operand_count(),
            },
            user: UserRecord {
                answer: self.evaluation().computed_value,
            },
            answers: self
                .deck()
                .tiles()
                .iter()
                .map(|tile| TileRecord::new(tile, self.is_highlighted(tile.index())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const SAVED: &str = r#"{
        "version": 1,
        "operation": "addition",
        "level": 2,
        "question": { "answer": 5, "answersNeeded": 2 },
        "user": { "answer": null },
        "answers": [
            { "index": 0, "answer": 2, "selected": true, "used": false, "completes": false, "order": 0 },
            { "index": 1, "answer": 3, "selected": false, "used": false, "completes": true },
            { "index": 2, "answer": 4, "selected": false, "used": true, "completes": false }
        ]
    }"#;

    fn edited(from: &str, to: &str) -> String {
        assert!(SAVED.contains(from), "{from} not in snapshot");
        SAVED.replacen(from, to, 1)
    }

    fn inconsistent(json: &str) -> bool {
        matches!(
            GameSnapshot::from_json(json),
            Err(SnapshotError::Inconsistent(_))
        )
    }

    #[test]
    fn parses_saved_game() {
        let snapshot = GameSnapshot::from_json(SAVED).unwrap();

        assert_eq!(snapshot.operation, Operator::Add);
        assert_eq!(snapshot.level, 2);
        assert_eq!(snapshot.question().unwrap(), Question::new(Operator::Add, 5.0, 2));
        assert_eq!(snapshot.highlighted(), [1]);

        let deck = snapshot.deck().unwrap();
        assert!(deck.tile(0).unwrap().is_selected());
        assert_eq!(deck.tile(0).unwrap().selection_order(), Some(0));
        assert!(deck.tile(2).unwrap().is_used());
        assert_eq!(deck.available().count(), 2);
    }

    #[test]
    fn session_round_trip() {
        let snapshot = GameSnapshot::from_json(SAVED).unwrap();
        let session = GameSession::from_snapshot(&snapshot, SessionConfig::new(1)).unwrap();

        assert_eq!(session.operator(), Operator::Add);
        assert_eq!(session.highlighted(), &[1]);
        assert!(session.evaluation().is_valid());

        let json = session.snapshot().to_json().unwrap();
        assert_eq!(GameSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn missing_order_is_renumbered() {
        let json = edited(r#""completes": false, "order": 0"#, r#""completes": false"#);
        let deck = GameSnapshot::from_json(&json).unwrap().deck().unwrap();

        assert_eq!(deck.tile(0).unwrap().selection_order(), Some(0));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            GameSnapshot::from_json("{ not json"),
            Err(SnapshotError::Malformed(_))
        ));
        assert!(matches!(
            GameSnapshot::from_json("[]"),
            Err(SnapshotError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let json = edited(r#""used": true, "#, "");

        assert!(matches!(
            GameSnapshot::from_json(&json),
            Err(SnapshotError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_unknown_versions() {
        let missing = edited(r#""version": 1,"#, "");
        assert!(matches!(
            GameSnapshot::from_json(&missing),
            Err(SnapshotError::MissingVersion)
        ));

        let future = edited(r#""version": 1"#, r#""version": 2"#);
        assert!(matches!(
            GameSnapshot::from_json(&future),
            Err(SnapshotError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn rejects_inconsistent_tiles() {
        assert!(inconsistent(&edited(r#""index": 1"#, r#""index": 0"#)));
        assert!(inconsistent(&edited(r#""answer": 4"#, r#""answer": 10"#)));
        assert!(inconsistent(&edited(
            r#""selected": false, "used": true"#,
            r#""selected": true, "used": true"#
        )));
        assert!(inconsistent(&edited(r#""answer": 5,"#, r#""answer": null,"#)));
        assert!(inconsistent(&edited(r#""level": 2"#, r#""level": 0"#)));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = GameSnapshot::from_json(&edited(r#""index": 1"#, r#""index": 0"#)).unwrap_err();

        assert_eq!(err.to_string(), "Saved game is inconsistent: duplicate tile index");
    }
}
