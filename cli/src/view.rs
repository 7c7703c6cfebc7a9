use std::fmt;

use mathionary_core::*;

const GAUGE_WIDTH: usize = 20;

/// Keypad decks are laid out like a phone keypad, anything else as an 8 wide board.
fn columns(len: usize) -> usize {
    if len == usize::from(SMALL_DECK_SIZE) { 3 } else { 8 }
}

fn cell(session: &GameSession, tile: &Tile) -> String {
    let index = tile.index();
    let value = tile.value();
    if tile.is_used() {
        format!("{index:>2}  · ")
    } else if tile.is_selected() {
        format!("{index:>2} ({value})")
    } else if session.is_highlighted(index) {
        format!("{index:>2} *{value}*")
    } else {
        format!("{index:>2}  {value} ")
    }
}

fn gauge(progress: &LevelProgress) -> String {
    let filled = (progress.fraction() * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH.saturating_sub(filled))
    )
}

/// Text board: header with the gauge, the question, then the tiles.
struct Board<'a>(&'a GameSession);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        let progress = session.progress();
        writeln!(
            f,
            "Level {} {} {}/{}   {}",
            progress.level,
            gauge(&progress),
            progress.used,
            progress.total,
            session.operator()
        )?;

        write!(f, "  {}", session.question())?;
        if let Some(value) = session.evaluation().computed_value {
            write!(f, "   (so far {value})")?;
        }
        writeln!(f)?;

        let tiles = session.deck().tiles();
        for row in tiles.chunks(columns(tiles.len())) {
            let cells: Vec<String> = row.iter().map(|tile| cell(session, tile)).collect();
            writeln!(f, "  {}", cells.join("  "))?;
        }
        Ok(())
    }
}

pub fn render(session: &GameSession) -> String {
    Board(session).to_string()
}

const VIOLATION_MESSAGES: [(Violations, &str); 4] = [
    (Violations::DIRECT_ANSWER_NOT_ALLOWED, "A single tile cannot be the answer"),
    (Violations::EXCEEDS_TARGET_BEFORE_COMPLETE, "That overshoots the answer"),
    (Violations::WRONG_FINAL_ANSWER, "Wrong answer"),
    (Violations::UNREACHABLE, "No tile left completes that pick"),
];

pub fn describe(violations: Violations) -> Vec<&'static str> {
    VIOLATION_MESSAGES
        .iter()
        .filter(|(flag, _)| violations.contains(*flag))
        .map(|&(_, message)| message)
        .collect()
}

pub fn outcome(outcome: &ClickOutcome, level: u32) -> String {
    match outcome {
        ClickOutcome::Ignored => "That tile is used up".to_string(),
        ClickOutcome::Pending(result) => match result.computed_value {
            Some(value) => format!("{value} so far"),
            None => "Pick the next tile".to_string(),
        },
        ClickOutcome::Rejected(result) => describe(result.violations).join(", "),
        ClickOutcome::Correct { level_up: true, .. } => format!("Correct! On to level {level}"),
        ClickOutcome::Correct { .. } => "Correct!".to_string(),
    }
}

pub fn solutions(solutions: &[Solution], operator: Operator) -> String {
    if solutions.is_empty() {
        return "Nothing on the board answers this".to_string();
    }
    solutions
        .iter()
        .map(|solution| {
            let (x, y) = solution.values();
            format!("{x} {} {y}", operator.symbol())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        let config = SessionConfig::new(1)
            .with_operator(Operator::Add)
            .with_deck(2, DeckValues::Fixed(vec![2, 3]));
        GameSession::new(config).unwrap()
    }

    #[test]
    fn renders_question_and_tiles() {
        let mut session = session();
        session.click(1).unwrap();

        let text = render(&session);

        assert!(text.starts_with("Level 1 [--------------------] 0/2   addition\n"));
        assert!(text.contains("? + ? = 5"));
        assert!(text.contains(" 0  2 "));
        assert!(text.contains(" 1 (3)"));
    }

    #[test]
    fn keypad_renders_in_rows_of_three() {
        let session = GameSession::new(SessionConfig::new(4)).unwrap();

        let text = render(&session);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], format!("  {}", session.question()));
        assert_eq!(lines[2], "   0  7    1  8    2  9 ");
        assert!(text.ends_with(" 9  0 \n"));
    }

    #[test]
    fn gauge_fills_with_progress() {
        let progress = LevelProgress {
            level: 1,
            used: 5,
            total: 10,
        };

        assert_eq!(gauge(&progress), "[##########----------]");
    }

    #[test]
    fn lists_violations() {
        let violations = Violations::DIRECT_ANSWER_NOT_ALLOWED | Violations::WRONG_FINAL_ANSWER;

        assert_eq!(
            describe(violations),
            vec!["A single tile cannot be the answer", "Wrong answer"]
        );
    }

    #[test]
    fn formats_solutions() {
        let mut session = session();
        let found = session.reveal_solutions();

        assert_eq!(solutions(&found, Operator::Add), "3 + 2");
        assert_eq!(solutions(&[], Operator::Add), "Nothing on the board answers this");
    }
}
