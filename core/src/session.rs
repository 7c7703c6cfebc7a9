use alloc::vec::Vec;
use rand::prelude::*;

use crate::*;

/// What a tile click did to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// The tile is used, nothing changed.
    Ignored,
    /// Selection is valid but not an answer yet.
    Pending(SelectionResult),
    /// Selection broke a rule, the clicked tile was put back.
    Rejected(SelectionResult),
    /// Question answered, `used` are the consumed tiles.
    Correct {
        used: Vec<TileIndex>,
        level_up: bool,
    },
}

impl ClickOutcome {
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }

    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Used tiles out of the deck, for the level gauge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    pub used: usize,
    pub total: usize,
}

impl LevelProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f64 / self.total as f64
    }
}

#[derive(Clone, Debug)]
pub struct GameSession {
    config: SessionConfig,
    rng: SmallRng,
    engine: QuestionEngine,
    level: u32,
    deck: TileDeck,
    question: Question,
    evaluation: SelectionResult,
    highlighted: Vec<TileIndex>,
}

fn next_seed(rng: &mut SmallRng) -> u64 {
    rng.random_range(0..=u64::MAX)
}

/// Seed for a restored game, so reloading a save at a later point does not replay the same decks.
fn restore_seed(seed: u64, snapshot: &GameSnapshot) -> u64 {
    let target = snapshot.question.answer.map_or(0, f64::to_bits);
    seed ^ u64::from(snapshot.level).rotate_left(32) ^ target
}

impl GameSession {
    /// Starts at level 1 with a fresh deck and question.
    ///
    /// Fails when the configured deck cannot host a single question, e.g. fewer than two tiles.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut engine = QuestionEngine::with_rules(next_seed(&mut rng), config.rules);
        let deck = config
            .deck_values
            .build_deck(config.deck_size, next_seed(&mut rng))?;
        let question = engine.generate_question(config.operator, &deck)?;
        log::info!("New {} game", config.operator);

        Ok(Self {
            config,
            rng,
            engine,
            level: 1,
            deck,
            question,
            evaluation: SelectionResult::empty(),
            highlighted: Vec::new(),
        })
    }

    /// Rebuilds a session from a checked snapshot, deck and question as saved. The snapshot's operator replaces the
    /// one in `config`.
    pub fn from_snapshot(
        snapshot: &GameSnapshot,
        mut config: SessionConfig,
    ) -> core::result::Result<Self, SnapshotError> {
        snapshot.validate()?;
        config.operator = snapshot.operation;

        let mut rng = SmallRng::seed_from_u64(restore_seed(config.seed, snapshot));
        let engine = QuestionEngine::with_rules(next_seed(&mut rng), config.rules);
        let deck = snapshot.deck()?;
        let question = snapshot.question()?;
        let evaluation = engine.evaluate_selection(&question, &deck);

        Ok(Self {
            config,
            rng,
            engine,
            level: snapshot.level,
            deck,
            question,
            evaluation,
            highlighted: snapshot.highlighted(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn operator(&self) -> Operator {
        self.config.operator
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn deck(&self) -> &TileDeck {
        &self.deck
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn engine(&self) -> &QuestionEngine {
        &self.engine
    }

    /// Result of checking the current selection, refreshed on every click.
    pub fn evaluation(&self) -> &SelectionResult {
        &self.evaluation
    }

    pub fn highlighted(&self) -> &[TileIndex] {
        &self.highlighted
    }

    pub fn is_highlighted(&self, index: TileIndex) -> bool {
        self.highlighted.contains(&index)
    }

    pub fn progress(&self) -> LevelProgress {
        LevelProgress {
            level: self.level,
            used: self.deck.used_count(),
            total: self.deck.len(),
        }
    }

    /// Toggles a tile and checks the selection. Rule breaking picks are undone, a correct answer consumes the
    /// selection and moves on to the next question, or the next level when the deck runs out.
    pub fn click(&mut self, index: TileIndex) -> Result<ClickOutcome> {
        if self.deck.is_used(index)? {
            log::debug!("Tile {} is used, ignoring click", index);
            return Ok(ClickOutcome::Ignored);
        }

        self.highlighted.clear();
        let toggled = self.deck.toggle(index)?;
        let result = self.engine.evaluate_selection(&self.question, &self.deck);

        if result.is_complete {
            let used = self.deck.mark_selection_used();
            let level = self.level;
            if self.deck.is_level_exhausted() {
                self.start_level(self.next_level())?;
            }
            self.next_question()?;
            return Ok(ClickOutcome::Correct {
                used,
                level_up: self.level > level,
            });
        }

        if !result.is_valid() && toggled == ToggleOutcome::Selected {
            log::debug!("Tile {} rejected: {:?}", index, result.violations);
            self.deck.deselect(index)?;
            self.evaluation = self.engine.evaluate_selection(&self.question, &self.deck);
            return Ok(ClickOutcome::Rejected(result));
        }

        self.evaluation = result;
        Ok(ClickOutcome::Pending(result))
    }

    /// Changes the operator and deals a fresh deck. The level is kept.
    pub fn switch_operator(&mut self, operator: Operator) -> Result<()> {
        log::info!("Switching to {}", operator);
        self.config.operator = operator;
        self.reset()
    }

    /// Deals a fresh deck and question without leaving the level.
    pub fn reset(&mut self) -> Result<()> {
        self.deck = self
            .config
            .deck_values
            .build_deck(self.config.deck_size, next_seed(&mut self.rng))?;
        self.next_question()
    }

    /// Finds the answers that complete the current selection, or every answer when nothing is selected, and
    /// highlights the tiles still to pick.
    pub fn reveal_solutions(&mut self) -> Vec<Solution> {
        let selection: Vec<TileIndex> = self
            .deck
            .ordered_selection()
            .iter()
            .map(|tile| tile.index())
            .collect();
        let solutions = self
            .engine
            .find_all_solutions(&self.question, &self.deck, Some(&selection));

        self.highlighted = solutions
            .iter()
            .flat_map(Solution::indices)
            .filter(|index| !selection.contains(index))
            .collect();
        self.highlighted.sort_unstable();
        self.highlighted.dedup();
        solutions
    }

    /// Moves to the next level once the restored deck has run out.
    pub(crate) fn settle_level(&mut self) -> Result<()> {
        if !self.deck.is_level_exhausted() {
            return Ok(());
        }
        self.start_level(self.next_level())?;
        self.next_question()
    }

    /// Level after the current one. Stays put at the top.
    fn next_level(&self) -> u32 {
        self.level.saturating_add(1)
    }

    fn start_level(&mut self, level: u32) -> Result<()> {
        self.level = level;
        self.deck = self
            .config
            .deck_values
            .build_deck(self.config.deck_size, next_seed(&mut self.rng))?;
        log::info!("Level {}", level);
        Ok(())
    }

    fn next_question(&mut self) -> Result<()> {
        self.deck.clear_selection();
        self.evaluation = SelectionResult::empty();
        self.highlighted.clear();

        let operator = self.config.operator;
        self.question = match self.engine.generate_question(operator, &self.deck) {
            Err(GameError::NoValidQuestion) => {
                log::info!("Remaining tiles cannot form a {} question", operator);
                self.start_level(self.next_level())?;
                self.engine.generate_question(operator, &self.deck)?
            }
            other => other?,
        };
        Ok(())
    }
}
