use std::slice;

use crate::card::{Card, CardId, Placement, Suit};

pub const TEMP_CELLS: usize = 3;
pub const FOUNDATIONS: usize = 3;
pub const WORK_STACKS: usize = 8;
pub(crate) const CELL_COUNT: usize = TEMP_CELLS + 1 + FOUNDATIONS + WORK_STACKS;

/// Identifies one container on the board.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Debug)]
pub enum CardCellIndex {
    TempCellIndex(usize),
    FlowerCellIndex,
    FoundationIndex(usize),
    WorkStackIndex(usize),
}

impl CardCellIndex {
    /// Every valid index, in board order.
    pub fn all() -> impl Iterator<Item = CardCellIndex> {
        (0..TEMP_CELLS).map(CardCellIndex::TempCellIndex)
            .chain(Some(CardCellIndex::FlowerCellIndex))
            .chain((0..FOUNDATIONS).map(CardCellIndex::FoundationIndex))
            .chain((0..WORK_STACKS).map(CardCellIndex::WorkStackIndex))
    }

    /// Position of this container in the board's cell table, `None` if out of range.
    pub(crate) fn slot(self) -> Option<usize> {
        match self {
            CardCellIndex::TempCellIndex(i) if i < TEMP_CELLS => Some(i),
            CardCellIndex::FlowerCellIndex => Some(TEMP_CELLS),
            CardCellIndex::FoundationIndex(i) if i < FOUNDATIONS => Some(TEMP_CELLS + 1 + i),
            CardCellIndex::WorkStackIndex(i) if i < WORK_STACKS => Some(TEMP_CELLS + 1 + FOUNDATIONS + i),
            _ => None,
        }
    }

    /// Blank container for this index.
    pub(crate) fn empty_cell(self) -> CardCell {
        match self {
            CardCellIndex::TempCellIndex(_) => CardCell::TempCell{card: None, collapsed: None},
            CardCellIndex::FlowerCellIndex => CardCell::FlowerCell{card: None},
            CardCellIndex::FoundationIndex(_) => CardCell::Foundation{cards: Vec::new()},
            CardCellIndex::WorkStackIndex(_) => CardCell::WorkStack{cards: Vec::new()},
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
#[derive(Debug)]
pub enum CardCell {
    WorkStack{cards: Vec<CardId>},
    Foundation{cards: Vec<CardId>},
    /// `collapsed` holds the dragon suit that inerted the cell. A collapsed cell never
    /// accepts another card.
    TempCell{card: Option<CardId>, collapsed: Option<Suit>},
    FlowerCell{card: Option<CardId>},
}

impl CardCell {
    /// Cards in this container, bottom first.
    pub fn cards(&self) -> &[CardId] {
        match self {
            CardCell::WorkStack{cards} | CardCell::Foundation{cards} => cards.as_slice(),
            CardCell::TempCell{card: Some(card), ..} | CardCell::FlowerCell{card: Some(card)} =>
                slice::from_ref(card),
            _ => &[],
        }
    }

    pub fn top(&self) -> Option<CardId> {
        self.cards().last().copied()
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    pub fn collapsed(&self) -> Option<Suit> {
        match self {
            CardCell::TempCell{collapsed, ..} => *collapsed,
            _ => None,
        }
    }

    /// An empty, un-collapsed temp cell.
    pub fn is_open(&self) -> bool {
        match self {
            CardCell::TempCell{card: None, collapsed: None} => true,
            _ => false,
        }
    }

    pub fn can_accept(&self, id: CardId, cards: &[Placement]) -> bool {
        let incoming = match cards.get(id.index) {
            Some(placement) => placement,
            None => return false,
        };
        match self {
            CardCell::WorkStack{cards: stack} => match stack.last() {
                Some(top) => cards[top.index].card.can_receive(incoming.card),
                None => true,
            },
            CardCell::Foundation{cards: stack} => {
                if incoming.child.is_some() {
                    return false;
                }
                let (suit, rank) = match incoming.card {
                    Card::NumberCard{suit, rank} => (suit, rank),
                    _ => return false,
                };
                match stack.last().map(|top| cards[top.index].card) {
                    None => rank == 1,
                    Some(Card::NumberCard{suit: top_suit, rank: top_rank}) =>
                        top_suit == suit && top_rank + 1 == rank,
                    Some(_) => false,
                }
            },
            CardCell::TempCell{card, collapsed} =>
                collapsed.is_none() && card.is_none() && incoming.child.is_none(),
            CardCell::FlowerCell{card} =>
                card.is_none() && incoming.card.is_flower() && incoming.child.is_none(),
        }
    }

    /// Links `id` into this container. On stacks every card chained above `id` follows it.
    ///
    /// The card must already have been released from wherever it was.
    pub(crate) fn place(&mut self, index: CardCellIndex, id: CardId, cards: &mut [Placement]) {
        match self {
            CardCell::WorkStack{cards: stack} | CardCell::Foundation{cards: stack} => {
                let mut next = Some(id);
                while let Some(current) = next {
                    if let Some(below) = stack.last() {
                        cards[below.index].child = Some(current);
                    }
                    cards[current.index].cell = Some(index);
                    stack.push(current);
                    next = cards[current.index].child;
                }
            },
            CardCell::TempCell{card, ..} | CardCell::FlowerCell{card} => {
                cards[id.index].cell = Some(index);
                cards[id.index].child = None;
                *card = Some(id);
            },
        }
    }

    /// Unlinks `id`, and on stacks everything above it. The released run keeps its own
    /// child links so a following `place` moves it as one.
    ///
    /// Returns false if `id` is not in this container.
    pub(crate) fn release(&mut self, id: CardId, cards: &mut [Placement]) -> bool {
        match self {
            CardCell::WorkStack{cards: stack} | CardCell::Foundation{cards: stack} => {
                let position = match stack.iter().position(|&card| card == id) {
                    Some(position) => position,
                    None => return false,
                };
                if position > 0 {
                    cards[stack[position - 1].index].child = None;
                }
                for card in stack.drain(position..) {
                    cards[card.index].cell = None;
                }
                true
            },
            CardCell::TempCell{card, ..} | CardCell::FlowerCell{card} => {
                if *card != Some(id) {
                    return false;
                }
                *card = None;
                cards[id.index].cell = None;
                cards[id.index].child = None;
                true
            },
        }
    }

    /// Inerts an open temp cell for the rest of the game.
    pub(crate) fn collapse(&mut self, suit: Suit) {
        if let CardCell::TempCell{collapsed, ..} = self {
            *collapsed = Some(suit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: usize) -> CardId {
        CardId::new(0, index)
    }

    fn arena(cards: &[Card]) -> Vec<Placement> {
        cards.iter().map(|&card| Placement::new(card)).collect()
    }

    fn number(suit: Suit, rank: u8) -> Card {
        Card::NumberCard{suit, rank}
    }

    #[test]
    fn slots_are_unique_and_bounded() {
        let slots: Vec<_> = CardCellIndex::all().map(|index| index.slot().unwrap()).collect();
        assert_eq!(slots, (0..CELL_COUNT).collect::<Vec<_>>());
        assert_eq!(CardCellIndex::TempCellIndex(3).slot(), None);
        assert_eq!(CardCellIndex::FoundationIndex(3).slot(), None);
        assert_eq!(CardCellIndex::WorkStackIndex(8).slot(), None);
    }

    #[test]
    fn work_stack_accepts_alternating_descending() {
        let mut cards = arena(&[number(Suit::Black, 4), number(Suit::Black, 3), number(Suit::Red, 3)]);
        let index = CardCellIndex::WorkStackIndex(0);
        let mut stack = index.empty_cell();
        assert!(stack.can_accept(id(0), &cards));
        stack.place(index, id(0), &mut cards);

        assert!(!stack.can_accept(id(1), &cards));
        assert!(stack.can_accept(id(2), &cards));
        stack.place(index, id(2), &mut cards);
        assert_eq!(stack.cards(), &[id(0), id(2)]);
        assert_eq!(cards[0].child, Some(id(2)));
        assert_eq!(cards[2].cell, Some(index));
    }

    #[test]
    fn stack_place_carries_the_run() {
        let mut cards = arena(&[number(Suit::Black, 6), number(Suit::Red, 5), number(Suit::Green, 4)]);
        let from = CardCellIndex::WorkStackIndex(0);
        let to = CardCellIndex::WorkStackIndex(1);
        let mut source = from.empty_cell();
        let mut dest = to.empty_cell();
        for i in 0..3 {
            source.place(from, id(i), &mut cards);
        }

        assert!(source.release(id(1), &mut cards));
        assert_eq!(source.cards(), &[id(0)]);
        assert_eq!(cards[0].child, None);
        assert_eq!(cards[1].child, Some(id(2)));
        assert_eq!(cards[2].cell, None);

        dest.place(to, id(1), &mut cards);
        assert_eq!(dest.cards(), &[id(1), id(2)]);
        assert_eq!(cards[1].cell, Some(to));
        assert_eq!(cards[2].cell, Some(to));
    }

    #[test]
    fn release_bottom_card_empties_the_stack() {
        let mut cards = arena(&[number(Suit::Black, 6), number(Suit::Red, 5)]);
        let index = CardCellIndex::WorkStackIndex(2);
        let mut stack = index.empty_cell();
        stack.place(index, id(0), &mut cards);
        stack.place(index, id(1), &mut cards);
        assert!(stack.release(id(0), &mut cards));
        assert!(stack.is_empty());
        assert!(!stack.release(id(0), &mut cards));
    }

    #[test]
    fn foundation_is_sequential_and_single_suit() {
        let mut cards = arena(&[
            number(Suit::Green, 1),
            number(Suit::Green, 2),
            number(Suit::Red, 2),
            number(Suit::Green, 3),
            Card::DragonCard{suit: Suit::Green},
        ]);
        let index = CardCellIndex::FoundationIndex(0);
        let mut foundation = index.empty_cell();

        assert!(!foundation.can_accept(id(1), &cards));
        assert!(!foundation.can_accept(id(4), &cards));
        assert!(foundation.can_accept(id(0), &cards));
        foundation.place(index, id(0), &mut cards);

        assert!(!foundation.can_accept(id(2), &cards));
        assert!(!foundation.can_accept(id(3), &cards));
        assert!(foundation.can_accept(id(1), &cards));
    }

    #[test]
    fn foundation_refuses_cards_with_children() {
        let mut cards = arena(&[number(Suit::Green, 1), number(Suit::Red, 2), number(Suit::Red, 1)]);
        cards[1].child = Some(id(2));
        let index = CardCellIndex::FoundationIndex(1);
        let mut foundation = index.empty_cell();
        foundation.place(index, id(0), &mut cards);
        assert!(!foundation.can_accept(id(1), &cards));
    }

    #[test]
    fn temp_cell_holds_one_childless_card() {
        let mut cards = arena(&[Card::DragonCard{suit: Suit::Red}, number(Suit::Red, 4), number(Suit::Black, 3)]);
        cards[1].child = Some(id(2));
        let index = CardCellIndex::TempCellIndex(0);
        let mut cell = index.empty_cell();

        assert!(!cell.can_accept(id(1), &cards));
        assert!(cell.can_accept(id(0), &cards));
        cell.place(index, id(0), &mut cards);
        assert!(!cell.can_accept(id(2), &cards));
        assert!(!cell.is_open());

        assert!(cell.release(id(0), &mut cards));
        assert!(cell.is_open());
        cell.collapse(Suit::Red);
        assert!(!cell.is_open());
        assert_eq!(cell.collapsed(), Some(Suit::Red));
        assert!(!cell.can_accept(id(0), &cards));
    }

    #[test]
    fn flower_cell_only_takes_the_flower() {
        let cards = arena(&[Card::FlowerCard, Card::DragonCard{suit: Suit::Black}, number(Suit::Black, 1)]);
        let cell = CardCellIndex::FlowerCellIndex.empty_cell();
        assert!(cell.can_accept(id(0), &cards));
        assert!(!cell.can_accept(id(1), &cards));
        assert!(!cell.can_accept(id(2), &cards));
        assert!(!cell.can_accept(id(9), &cards));
    }
}
