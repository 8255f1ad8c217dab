use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, info};

use crate::card::{Card, CardId, Placement, Suit};
use crate::cell::{CardCell, CardCellIndex, CELL_COUNT, FOUNDATIONS, TEMP_CELLS, WORK_STACKS};
use crate::deal::{distribute, shuffled_deck};
use crate::error::Rejection;
use crate::seed::Seed;

/// Lifecycle of one board. Only `Playing` accepts moves; `Won` is terminal.
#[derive(Copy, Clone, PartialEq, Eq)]
#[derive(Debug)]
pub enum GameState {
    Dealing,
    Playing,
    Won,
}

/// Outcome reported back to whoever drives the board.
#[derive(Clone, PartialEq, Eq)]
#[derive(Debug)]
pub enum Event {
    Moved{card: CardId, from: CardCellIndex, to: CardCellIndex},
    Rejected{card: CardId, reason: Rejection},
    /// `cell` is the temp cell that was inerted, if one was open.
    DragonsCollapsed{suit: Suit, cell: Option<usize>},
    CollapseAvailability{suit: Suit, available: bool},
    Won,
}

/// A hand-arranged board, mostly for tests and puzzles. Cards go in bottom first.
#[derive(Clone, Default)]
#[derive(Debug)]
pub struct Layout {
    pub temp_cells: [Option<Card>; TEMP_CELLS],
    pub collapsed: [Option<Suit>; TEMP_CELLS],
    pub flower_cell: Option<Card>,
    pub foundations: [Vec<Card>; FOUNDATIONS],
    pub work_stacks: [Vec<Card>; WORK_STACKS],
}

static GENERATION: AtomicU32 = AtomicU32::new(1);

/// The rule engine: owns every card and container.
#[derive(Clone)]
#[derive(Debug)]
pub struct Board {
    generation: u32,
    cards: Vec<Placement>,
    cells: Vec<CardCell>,
    collapsible: [bool; 3],
    state: GameState,
}

impl Board {
    /// Empty containers, no cards, waiting to be dealt.
    pub fn new() -> Board {
        let cells: Vec<CardCell> = CardCellIndex::all().map(CardCellIndex::empty_cell).collect();
        debug_assert_eq!(cells.len(), CELL_COUNT);
        Board{
            generation: GENERATION.fetch_add(1, Ordering::Relaxed),
            cards: Vec::new(),
            cells,
            collapsible: [false; 3],
            state: GameState::Dealing,
        }
    }

    pub fn deal(seed: Seed) -> Board {
        let mut board = Board::new();
        board.deal_deck(shuffled_deck(seed));
        info!(seed = %seed, "dealt a new board");
        board
    }

    /// Deals `deck` onto the work stacks in order. Only meaningful while `Dealing`.
    pub fn deal_deck(&mut self, deck: Vec<Card>) {
        if self.state != GameState::Dealing {
            debug!(state = ?self.state, "ignoring deal on a board that was already dealt");
            return;
        }
        let ids: Vec<CardId> = deck.into_iter().map(|card| self.add_card(card)).collect();
        for (i, pile) in distribute(&ids, WORK_STACKS).into_iter().enumerate() {
            for id in pile {
                self.put(id, CardCellIndex::WorkStackIndex(i));
            }
        }
        self.state = GameState::Playing;
        self.refresh(&mut Vec::new());
    }

    pub fn from_layout(layout: Layout) -> Board {
        let mut board = Board::new();
        for (i, card) in layout.temp_cells.iter().enumerate() {
            if let Some(card) = *card {
                let id = board.add_card(card);
                board.put(id, CardCellIndex::TempCellIndex(i));
            }
        }
        for (i, suit) in layout.collapsed.iter().enumerate() {
            if let Some(suit) = *suit {
                board.cells[i].collapse(suit);
            }
        }
        if let Some(card) = layout.flower_cell {
            let id = board.add_card(card);
            board.put(id, CardCellIndex::FlowerCellIndex);
        }
        for (i, pile) in layout.foundations.iter().enumerate() {
            for &card in pile {
                let id = board.add_card(card);
                board.put(id, CardCellIndex::FoundationIndex(i));
            }
        }
        for (i, pile) in layout.work_stacks.iter().enumerate() {
            for &card in pile {
                let id = board.add_card(card);
                board.put(id, CardCellIndex::WorkStackIndex(i));
            }
        }
        board.state = GameState::Playing;
        board.refresh(&mut Vec::new());
        board
    }

    fn add_card(&mut self, card: Card) -> CardId {
        self.cards.push(Placement::new(card));
        CardId::new(self.generation, self.cards.len() - 1)
    }

    /// Resolves `id`, refusing ids handed out by some other board.
    fn lookup(&self, id: CardId) -> Option<&Placement> {
        if id.board != self.generation {
            return None;
        }
        self.cards.get(id.index)
    }

    /// Places a loose card without checking the rules.
    fn put(&mut self, id: CardId, index: CardCellIndex) {
        if let Some(slot) = index.slot() {
            self.cells[slot].place(index, id, &mut self.cards);
        }
    }

    /// Detaches `id` (and anything above it) from its container.
    fn detach(&mut self, id: CardId) {
        if let Some(slot) = self.cards[id.index].cell.and_then(CardCellIndex::slot) {
            self.cells[slot].release(id, &mut self.cards);
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == GameState::Won
    }

    pub fn card(&self, id: CardId) -> Option<Card> {
        self.lookup(id).map(Placement::card)
    }

    pub fn placement(&self, id: CardId) -> Option<&Placement> {
        self.lookup(id)
    }

    pub fn cards(&self) -> impl Iterator<Item = (CardId, Card)> + '_ {
        let generation = self.generation;
        self.cards.iter().enumerate().map(move |(i, placement)| (CardId::new(generation, i), placement.card))
    }

    pub fn find(&self, card: Card) -> Option<CardId> {
        self.find_all(card).next()
    }

    pub fn find_all(&self, card: Card) -> impl Iterator<Item = CardId> + '_ {
        self.cards().filter(move |&(_, other)| other == card).map(|(id, _)| id)
    }

    pub fn cell(&self, index: CardCellIndex) -> Option<&CardCell> {
        index.slot().map(|slot| &self.cells[slot])
    }

    /// Container holding `id` and its position in it, bottom card first.
    pub fn location(&self, id: CardId) -> Option<(CardCellIndex, usize)> {
        let index = self.lookup(id)?.cell?;
        let position = self.cell(index)?.cards().iter().position(|&card| card == id)?;
        Some((index, position))
    }

    pub fn child(&self, id: CardId) -> Option<CardId> {
        self.lookup(id).and_then(Placement::child)
    }

    /// True if nothing sits on `id`, or everything on it is a valid run that can go with it.
    pub fn is_free(&self, id: CardId) -> bool {
        let mut current = match self.lookup(id) {
            Some(placement) => placement,
            None => return false,
        };
        while let Some(child) = current.child {
            let above = &self.cards[child.index];
            if !current.card.can_receive(above.card) {
                return false;
            }
            current = above;
        }
        true
    }

    /// Banked cards stay banked.
    pub fn can_be_picked_up(&self, id: CardId) -> bool {
        match self.lookup(id).and_then(Placement::cell) {
            Some(CardCellIndex::FoundationIndex(_)) | Some(CardCellIndex::FlowerCellIndex) | None => false,
            Some(_) => self.is_free(id),
        }
    }

    pub fn can_accept(&self, index: CardCellIndex, id: CardId) -> bool {
        match self.cell(index) {
            Some(cell) if self.lookup(id).is_some() => cell.can_accept(id, &self.cards),
            _ => false,
        }
    }

    pub fn collapse_available(&self, suit: Suit) -> bool {
        self.collapsible[suit.index()]
    }

    /// Moves `id`, along with any run on top of it, to `to`.
    pub fn move_card(&mut self, id: CardId, to: CardCellIndex) -> Result<Vec<Event>, Rejection> {
        let from = self.check_source(id)?;
        if to.slot().is_none() {
            return Err(Rejection::UnknownCell(to));
        }
        if from == to || !self.can_accept(to, id) {
            return Err(Rejection::CannotAccept{card: id, cell: to});
        }
        Ok(self.apply_move(id, from, to))
    }

    /// Sends `id` to the first foundation, then the flower cell, that accepts it.
    /// Does nothing if none does.
    pub fn auto_relocate(&mut self, id: CardId) -> Result<Vec<Event>, Rejection> {
        let from = self.check_source(id)?;
        let target = (0..FOUNDATIONS).map(CardCellIndex::FoundationIndex)
            .chain(Some(CardCellIndex::FlowerCellIndex))
            .find(|&index| self.can_accept(index, id));
        match target {
            Some(to) => Ok(self.apply_move(id, from, to)),
            None => {
                debug!(card = %self.cards[id.index].card, "nowhere to auto-relocate");
                Ok(Vec::new())
            },
        }
    }

    fn check_source(&self, id: CardId) -> Result<CardCellIndex, Rejection> {
        if self.state != GameState::Playing {
            return Err(Rejection::NotPlaying(self.state));
        }
        let placement = self.lookup(id).ok_or(Rejection::UnknownCard(id))?;
        let from = placement.cell.ok_or(Rejection::OutOfPlay(id))?;
        if !self.can_be_picked_up(id) {
            return Err(Rejection::CannotPickUp(id));
        }
        Ok(from)
    }

    fn apply_move(&mut self, id: CardId, from: CardCellIndex, to: CardCellIndex) -> Vec<Event> {
        self.detach(id);
        self.put(id, to);
        debug!(card = %self.cards[id.index].card, ?from, ?to, "moved");
        let mut events = vec![Event::Moved{card: id, from, to}];
        self.refresh(&mut events);
        events
    }

    /// Removes all four exposed dragons of `suit` and inerts the first open temp cell.
    /// Ignored unless the collapse is currently available.
    pub fn collapse_dragons(&mut self, suit: Suit) -> Vec<Event> {
        if self.state != GameState::Playing || !self.collapse_ready(suit) {
            debug!(?suit, state = ?self.state, "ignoring dragon collapse");
            return Vec::new();
        }
        let exposed: Vec<CardId> = self.exposed_dragons(suit).collect();
        for id in exposed {
            self.detach(id);
        }
        let cell = (0..TEMP_CELLS).find(|&i| self.cells[i].is_open());
        if let Some(i) = cell {
            self.cells[i].collapse(suit);
        }
        info!(?suit, ?cell, "collapsed dragons");

        let mut events = vec![Event::DragonsCollapsed{suit, cell}];
        self.refresh(&mut events);
        events
    }

    /// Dragons of `suit` on top of a work stack or sitting in a temp cell.
    fn exposed_dragons(&self, suit: Suit) -> impl Iterator<Item = CardId> + '_ {
        let stacked = (0..WORK_STACKS)
            .filter_map(move |i| self.cell(CardCellIndex::WorkStackIndex(i)).and_then(CardCell::top));
        let held = self.cells[..TEMP_CELLS].iter().filter_map(CardCell::top);
        stacked.chain(held).filter(move |id| self.cards[id.index].card.is_dragon(suit))
    }

    fn collapse_ready(&self, suit: Suit) -> bool {
        let count = self.exposed_dragons(suit).count();
        let free_cell = self.cells[..TEMP_CELLS].iter().any(|cell| {
            cell.is_open() || cell.top().map_or(false, |id| self.cards[id.index].card.is_dragon(suit))
        });
        count == 4 && free_cell
    }

    fn is_complete(&self) -> bool {
        let foundations_full = (0..FOUNDATIONS)
            .filter_map(|i| self.cell(CardCellIndex::FoundationIndex(i)))
            .all(|cell| cell.len() == 9);
        let flower = self.cell(CardCellIndex::FlowerCellIndex).map_or(false, |cell| !cell.is_empty());
        foundations_full && flower
    }

    /// Re-derives collapse availability and the win, appending whatever changed.
    fn refresh(&mut self, events: &mut Vec<Event>) {
        for &suit in Suit::ALL.iter() {
            let available = self.collapse_ready(suit);
            if available != self.collapsible[suit.index()] {
                self.collapsible[suit.index()] = available;
                events.push(Event::CollapseAvailability{suit, available});
            }
        }
        if self.state == GameState::Playing && self.is_complete() {
            self.state = GameState::Won;
            info!("board won");
            events.push(Event::Won);
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}
