use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::{Board, Event};
use crate::card::{CardId, Suit};
use crate::cell::CardCellIndex;
use crate::seed::Seed;

/// A request from whoever is driving the game.
#[derive(Copy, Clone, PartialEq, Eq)]
#[derive(Debug)]
pub enum Command {
    Move{card: CardId, to: CardCellIndex},
    /// The "double-activate" shortcut: bank the card if any foundation or the flower cell takes it.
    AutoRelocate{card: CardId},
    Collapse(Suit),
    NewGame(Option<Seed>),
}

/// One game in progress: a board, the seed that dealt it, and its clock.
pub struct GameSession {
    board: Board,
    seed: Seed,
    started: Instant,
    finished: Option<Duration>,
}

impl GameSession {
    pub fn new(seed: Option<Seed>) -> GameSession {
        let seed = seed.unwrap_or_else(Seed::random);
        GameSession::with_board(Board::deal(seed), seed)
    }

    pub fn with_board(board: Board, seed: Seed) -> GameSession {
        GameSession{
            board,
            seed,
            started: Instant::now(),
            finished: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// Time since the deal, frozen once the game is won.
    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.started.elapsed())
    }

    /// Runs one command to completion and reports what happened.
    pub fn handle(&mut self, command: Command) -> Vec<Event> {
        let result = match command {
            Command::Move{card, to} => self.board.move_card(card, to).map_err(|reason| (card, reason)),
            Command::AutoRelocate{card} => self.board.auto_relocate(card).map_err(|reason| (card, reason)),
            Command::Collapse(suit) => Ok(self.board.collapse_dragons(suit)),
            Command::NewGame(seed) => {
                *self = GameSession::new(seed);
                Ok(Vec::new())
            },
        };
        let events = match result {
            Ok(events) => events,
            Err((card, reason)) => {
                debug!(?card, %reason, "rejected");
                vec![Event::Rejected{card, reason}]
            },
        };
        if self.finished.is_none() && events.contains(&Event::Won) {
            self.finished = Some(self.started.elapsed());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameState, Layout};
    use crate::card::Card;
    use crate::error::Rejection;

    fn nearly_won() -> Board {
        let run = |suit: Suit| (1..10).map(|rank| Card::NumberCard{suit, rank}).collect::<Vec<_>>();
        let mut layout = Layout{
            foundations: [run(Suit::Black), run(Suit::Green), run(Suit::Red)],
            ..Layout::default()
        };
        layout.work_stacks[4] = vec![Card::FlowerCard];
        Board::from_layout(layout)
    }

    #[test]
    fn new_session_is_dealt() {
        let session = GameSession::new(Some(Seed::new(11)));
        assert_eq!(session.seed(), Seed::new(11));
        assert_eq!(session.board().state(), GameState::Playing);
        assert_eq!(session.board().cards().count(), 40);
    }

    #[test]
    fn rejections_become_events() {
        let mut session = GameSession::new(Some(Seed::new(2)));
        let top = session.board().cell(CardCellIndex::WorkStackIndex(0)).unwrap().top().unwrap();
        let events = session.handle(Command::Move{card: top, to: CardCellIndex::FoundationIndex(7)});
        assert_eq!(events, vec![Event::Rejected{
            card: top,
            reason: Rejection::UnknownCell(CardCellIndex::FoundationIndex(7)),
        }]);
    }

    #[test]
    fn cards_from_the_last_game_are_refused() {
        let mut session = GameSession::new(Some(Seed::new(1)));
        let old = session.board().cell(CardCellIndex::WorkStackIndex(0)).unwrap().top().unwrap();
        session.handle(Command::NewGame(Some(Seed::new(2))));

        let events = session.handle(Command::Move{card: old, to: CardCellIndex::TempCellIndex(0)});
        assert_eq!(events, vec![Event::Rejected{card: old, reason: Rejection::UnknownCard(old)}]);
        assert!(session.board().cell(CardCellIndex::TempCellIndex(0)).unwrap().is_empty());
    }

    #[test]
    fn ineligible_collapse_is_ignored() {
        let mut session = GameSession::with_board(nearly_won(), Seed::new(0));
        assert!(session.handle(Command::Collapse(Suit::Red)).is_empty());
    }

    #[test]
    fn win_freezes_the_clock() {
        let mut session = GameSession::with_board(nearly_won(), Seed::new(0));
        let flower = session.board().find(Card::FlowerCard).unwrap();
        let events = session.handle(Command::AutoRelocate{card: flower});
        assert!(events.contains(&Event::Won));
        let elapsed = session.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(session.elapsed(), elapsed);

        let events = session.handle(Command::Move{card: flower, to: CardCellIndex::TempCellIndex(0)});
        assert_eq!(events, vec![Event::Rejected{card: flower, reason: Rejection::NotPlaying(GameState::Won)}]);
    }

    #[test]
    fn new_game_replaces_the_board() {
        let mut session = GameSession::with_board(nearly_won(), Seed::new(0));
        session.handle(Command::NewGame(Some(Seed::new(77))));
        assert_eq!(session.seed(), Seed::new(77));
        assert_eq!(session.board().cards().count(), 40);
        assert!(session.board().cell(CardCellIndex::FlowerCellIndex).unwrap().is_empty());
    }
}
