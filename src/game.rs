use std::cmp::max;
use std::path::PathBuf;

use indoc::indoc;
use tracing::warn;

use crate::board::Event;
use crate::card::{Card, CardId};
use crate::cell::{CardCell, CardCellIndex, WORK_STACKS};
use crate::display::{self, display_cell, display_highlighted_cell, dim, no_dim};
use crate::session::{Command, GameSession};
use crate::stats::{format_time, Stats};
use crate::util;

#[derive(Debug)]
enum GameMode {
    SelectSource,
    ChooseStackHeight{cursor: u8, height: u8, max_height: u8},
    SelectDestination{cursor: u8, height: u8},
}

/// Get the display height of the specified work stack.
///
/// This is almost, but not quite, the number of cards in the stack. When the stack is empty
/// this is one, for the dash we draw to denote an empty cell.
fn work_stack_height(cell: Option<&CardCell>) -> usize {
    max(cell.map_or(0, CardCell::len), 1)
}

/// Human-playable terminal front end for a `GameSession`.
///
/// Cursor positions 1-3 are the temp cells, 4-6 the foundations and 7-14 the work stacks.
pub struct Game {
    session: GameSession,
    stats: Stats,
    stats_path: PathBuf,
    cursor: u8,
    mode: GameMode,
    message: String,
}

impl Game {
    pub fn new(session: GameSession, stats_path: PathBuf) -> Game {
        Game{
            session,
            stats: Stats::load(&stats_path),
            stats_path,
            cursor: 11,
            mode: GameMode::SelectSource,
            message: String::new(),
        }
    }

    fn print(&self) {
        let board = self.session.board();
        let mut s = String::new();

        let mut top_row = [" "; 10];
        match self.cursor {
            1..=3 => top_row[self.cursor as usize - 1] = "v",
            4..=6 => top_row[self.cursor as usize + 3] = "v",
            _ => (),
        }

        let should_dim;
        match self.mode {
            GameMode::SelectDestination{cursor: cursor @ 1..=3, ..} => {
                top_row[cursor as usize - 1] = selector_color!("v");
                should_dim = false;
            },
            GameMode::ChooseStackHeight{..} => should_dim = true,
            _ => should_dim = false,
        }
        s.push_str(&top_row.concat());
        s.push_str("\n");
        s.push_str(&display::display_top_row(board));
        s.push_str("\n");

        let mut strings: Vec<String> = (0..WORK_STACKS).map(|i| {
            let cell = board.cell(CardCellIndex::WorkStackIndex(i));
            match (cell, &self.mode) {
                (Some(cell), GameMode::ChooseStackHeight{cursor, height, ..}) |
                (Some(cell), GameMode::SelectDestination{cursor, height})
                    if *cursor as usize == i + 7 => display_highlighted_cell(board, cell, *height as usize),
                (Some(cell), _) => display_cell(board, cell),
                (None, _) => String::from("-"),
            }
        }).collect();

        let cursor_collision = match self.mode {
            GameMode::SelectDestination{cursor: cursor @ 7..=14, ..} |
            GameMode::ChooseStackHeight{cursor: cursor @ 7..=14, ..} => {
                strings[cursor as usize - 7].push_str(
                    &format!("\n{}", no_dim(selector_color!("^").to_string(), should_dim))
                );
                cursor == self.cursor
            },
            _ => false,
        };
        if !cursor_collision {
            if let 7..=14 = self.cursor {
                strings[self.cursor as usize - 7].push_str(
                    &format!("\n{}", no_dim("^".to_string(), should_dim))
                );
            }
        }
        s.push_str(&util::join_vertical(strings));
        if self.should_buffer_height() {
            s.push_str("\n");
        }
        if should_dim {
            s = dim(s);
        }

        s.push_str(&format!(
            "\nDeal {}   {}   Wins {}   Best {}\n",
            self.session.seed(),
            format_time(self.session.elapsed()),
            self.stats.wins,
            self.stats.best_time.map_or_else(|| "--:--:--".to_string(), format_time),
        ));
        s.push_str(&display::display_ready_dragons(board));
        s.push_str("\n");
        s.push_str(&self.message);

        display::clear();
        println!("{}", s);
    }

    /// Returns true if we should print an extra newline at the end of the board display.
    ///
    /// As we move the cursor around the board we affect the height of the display, specifically
    /// as the cursor passes through the tallest columns. We compensate for this by printing a
    /// newline when no cursor is on one of the tallest columns.
    fn should_buffer_height(&self) -> bool {
        let board = self.session.board();
        let height = |cursor: u8| work_stack_height(board.cell(CardCellIndex::WorkStackIndex(cursor as usize - 7)));
        let max_cell_height = (7..=14).map(|cursor| height(cursor)).max().unwrap_or(1);

        if self.cursor >= 7 && height(self.cursor) == max_cell_height {
            return false;
        }
        match self.mode {
            GameMode::ChooseStackHeight{cursor, ..} | GameMode::SelectDestination{cursor, ..}
            if cursor >= 7 && height(cursor) == max_cell_height
                => false,
            _ => true,
        }
    }

    pub fn play(&mut self) {
        self.message = Game::controls().to_string();
        let g = getch::Getch::new();
        loop {
            self.print();
            let chr = match g.getch() {
                Ok(value) => value,
                Err(msg) => {
                    println!("Ok guess we're done ({})", msg);
                    return;
                }
            };
            self.message.clear();
            match chr as char {
                '?' => self.message = Game::controls().to_string(),
                'q' | 'Q' => return,
                'n' | 'N' => self.new_game(),
                'g' | 'G' => self.stack_dragons(),
                'f' | 'F' => self.auto_relocate(),
                'w' | 'W' => self.move_cursor_up(),
                'a' | 'A' => self.move_cursor_left(),
                's' | 'S' => self.move_cursor_down(),
                'd' | 'D' => self.move_cursor_right(),
                'c' | 'C' => self.cancel(),
                num @ '1' ..= '8' => self.jump_to(num as u8 - b'0'),
                ' ' => self.select(),
                _ => (),
            }
        }
    }

    fn run(&mut self, command: Command) {
        for event in self.session.handle(command) {
            match event {
                Event::Rejected{reason, ..} => self.message = format!("Nope: {}", reason),
                Event::DragonsCollapsed{suit, ..} => self.message = format!("{} dragons stacked", suit.name()),
                Event::Won => self.record_win(),
                _ => (),
            }
        }
    }

    fn record_win(&mut self) {
        let elapsed = self.session.elapsed();
        let best = self.stats.record_win(elapsed);
        if let Err(err) = self.stats.save(&self.stats_path) {
            warn!(path = %self.stats_path.display(), %err, "could not save stats");
        }
        self.message = if best {
            format!("You wiiiin in {}, a new best! N for another deal.", format_time(elapsed))
        } else {
            format!("You wiiiin in {}. N for another deal.", format_time(elapsed))
        };
    }

    fn new_game(&mut self) {
        self.run(Command::NewGame(None));
        self.mode = GameMode::SelectSource;
    }

    fn select(&mut self) {
        match self.mode {
            GameMode::SelectSource => {
                // Can't select foundations
                if 4 <= self.cursor && self.cursor <= 6 {return;}
                match self.movable_height(self.cursor) {
                    0 => (),
                    1 => self.mode = GameMode::SelectDestination{cursor: self.cursor, height: 1},
                    height => self.mode = GameMode::ChooseStackHeight{
                        cursor: self.cursor,
                        height,
                        max_height: height,
                    },
                }
            },
            GameMode::ChooseStackHeight{cursor, height, ..} => {
                self.mode = GameMode::SelectDestination{cursor, height};
            },
            GameMode::SelectDestination{cursor, height} => {
                self.mode = GameMode::SelectSource;
                let card = match self.selected_card(cursor, height) {
                    Some(card) => card,
                    None => return,
                };
                // picking the source again is the double-activate
                let command = if cursor == self.cursor {
                    Command::AutoRelocate{card}
                } else {
                    match Game::cursor_to_cci(self.cursor) {
                        Some(to) => Command::Move{card, to},
                        None => return,
                    }
                };
                self.run(command);
            },
        }
    }

    fn cancel(&mut self) {
        self.mode = match self.mode {
            GameMode::SelectDestination{..} | GameMode::SelectSource => GameMode::SelectSource,
            GameMode::ChooseStackHeight{cursor, height, ..} => GameMode::SelectDestination{cursor, height},
        }
    }

    /// Immediately move the cursor to the given value in the current row.
    ///
    /// `num` MUST be in the range 1..=8
    fn jump_to(&mut self, num: u8) {
        if self.cursor >= 7 {
            self.cursor = num + 6;
        }
        else if num <= 6 {
            self.cursor = num;
        }
    }

    fn cursor_to_cci(cursor: u8) -> Option<CardCellIndex> {
        match cursor {
            1..=3 => Some(CardCellIndex::TempCellIndex(cursor as usize - 1)),
            4..=6 => Some(CardCellIndex::FoundationIndex(cursor as usize - 4)),
            7..=14 => Some(CardCellIndex::WorkStackIndex(cursor as usize - 7)),
            _ => None,
        }
    }

    fn cell_at(&self, cursor: u8) -> Option<&CardCell> {
        Game::cursor_to_cci(cursor).and_then(|index| self.session.board().cell(index))
    }

    /// How many cards, counted down from the top, can be lifted off the cell under `cursor`.
    fn movable_height(&self, cursor: u8) -> u8 {
        let board = self.session.board();
        match self.cell_at(cursor) {
            Some(cell) => cell.cards().iter().rev()
                .take_while(|&&id| board.can_be_picked_up(id))
                .count() as u8,
            None => 0,
        }
    }

    fn selected_card(&self, cursor: u8, height: u8) -> Option<CardId> {
        let cards = self.cell_at(cursor)?.cards();
        cards.len().checked_sub(height as usize).map(|i| cards[i])
    }

    fn top_card(&self) -> Option<(CardId, Card)> {
        let id = self.cell_at(self.cursor)?.top()?;
        Some((id, self.session.board().card(id)?))
    }

    fn stack_dragons(&mut self) {
        if let Some((_, Card::DragonCard{suit})) = self.top_card() {
            if self.session.board().collapse_available(suit) {
                self.run(Command::Collapse(suit));
            } else {
                self.message = format!("The {} dragons aren't all free yet", suit.name());
            }
        }
    }

    fn auto_relocate(&mut self) {
        if let Some((card, _)) = self.top_card() {
            self.mode = GameMode::SelectSource;
            self.run(Command::AutoRelocate{card});
        }
    }

    fn move_cursor_up(&mut self) {
        match self.mode {
            GameMode::ChooseStackHeight{height, cursor, max_height} =>
                if height < max_height {
                    self.mode = GameMode::ChooseStackHeight{
                        height: height + 1,
                        cursor,
                        max_height,
                    }
                },
            GameMode::SelectSource | GameMode::SelectDestination{..} =>
                self.cursor = match self.cursor {
                    7 => 2,
                    8..=10 => 3,
                    11..=13 => 4,
                    14 => 5,
                    _ => return,
                },
        }
    }

    fn move_cursor_left(&mut self) {
        match self.mode {
            GameMode::SelectSource | GameMode::SelectDestination{..} =>
                self.cursor = match self.cursor {
                    1 | 7 => return,
                    _ => self.cursor - 1
                },
            GameMode::ChooseStackHeight{..} => (),
        }
    }

    fn move_cursor_right(&mut self) {
        match self.mode {
            GameMode::SelectSource | GameMode::SelectDestination{..} =>
                self.cursor = match self.cursor {
                    6 | 14 => return,
                    _ => self.cursor + 1
                },
            GameMode::ChooseStackHeight{..} => (),
        }
    }

    fn move_cursor_down(&mut self) {
        match self.mode {
            GameMode::ChooseStackHeight{height, cursor, max_height} =>
                if height > 1 {
                    self.mode = GameMode::ChooseStackHeight{
                        height: height - 1,
                        cursor,
                        max_height,
                    }
                },
            GameMode::SelectSource | GameMode::SelectDestination{..} =>
                self.cursor = match self.cursor {
                    1 => 7,
                    2 | 3 => self.cursor + 5,
                    4 | 5 => self.cursor + 9,
                    6 => 14,
                    _ => return,
                },
        }
    }

    pub fn controls() -> &'static str {
        indoc!("
            Controls:
            - WASD to move the cursor
            - Space to pick a card, then Space again on where it should go
            - Space twice on the same cell sends the card to a foundation if it fits
            - W/S while choosing how many cards of a run to pick up
            - F to send the card under the cursor to a foundation
            - G to stack the dragons under the cursor
            - C to cancel a selection
            - 1-8 to jump within the current row
            - N for a new deal, Q to quit
            - ? to show these controls
        ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Layout};
    use crate::card::Suit;
    use crate::seed::Seed;
    use tempfile::TempDir;

    /// The stats file lives in the returned directory, which must outlive the game.
    fn game_with(layout: Layout) -> (Game, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let session = GameSession::with_board(Board::from_layout(layout), Seed::new(0));
        (Game::new(session, dir.path().join("stats")), dir)
    }

    fn number(suit: Suit, rank: u8) -> Card {
        Card::NumberCard{suit, rank}
    }

    #[test]
    fn cursor_maps_to_cells() {
        assert_eq!(Game::cursor_to_cci(1), Some(CardCellIndex::TempCellIndex(0)));
        assert_eq!(Game::cursor_to_cci(6), Some(CardCellIndex::FoundationIndex(2)));
        assert_eq!(Game::cursor_to_cci(14), Some(CardCellIndex::WorkStackIndex(7)));
        assert_eq!(Game::cursor_to_cci(0), None);
        assert_eq!(Game::cursor_to_cci(15), None);
    }

    #[test]
    fn select_run_then_destination() {
        let mut layout = Layout::default();
        layout.work_stacks[0] = vec![number(Suit::Black, 6), number(Suit::Red, 5), number(Suit::Green, 4)];
        layout.work_stacks[1] = vec![number(Suit::Green, 7)];
        let (mut game, _dir) = game_with(layout);

        game.jump_to(1);
        assert_eq!(game.cursor, 7);
        game.select();
        match game.mode {
            GameMode::ChooseStackHeight{height: 3, max_height: 3, ..} => (),
            ref other => panic!("unexpected mode {:?}", other),
        }
        game.select();
        game.move_cursor_right();
        game.select();

        let board = game.session.board();
        assert!(board.cell(CardCellIndex::WorkStackIndex(0)).unwrap().is_empty());
        assert_eq!(board.cell(CardCellIndex::WorkStackIndex(1)).unwrap().len(), 4);
    }

    #[test]
    fn double_select_auto_relocates() {
        let mut layout = Layout::default();
        layout.work_stacks[2] = vec![number(Suit::Red, 1)];
        let (mut game, _dir) = game_with(layout);

        game.jump_to(3);
        game.select();
        game.select();
        let board = game.session.board();
        assert_eq!(board.cell(CardCellIndex::FoundationIndex(0)).unwrap().len(), 1);
    }

    #[test]
    fn winning_saves_stats() {
        let run = |suit: Suit| (1..10).map(|rank| number(suit, rank)).collect::<Vec<_>>();
        let mut layout = Layout{
            foundations: [run(Suit::Black), run(Suit::Green), run(Suit::Red)],
            ..Layout::default()
        };
        layout.work_stacks[0] = vec![Card::FlowerCard];
        let (mut game, dir) = game_with(layout);

        game.jump_to(1);
        game.select();
        game.select();
        assert!(game.session.board().is_won());
        assert_eq!(game.stats.wins, 1);
        assert_eq!(Stats::load(dir.path().join("stats")).wins, 1);
    }
}
