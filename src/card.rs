use std::fmt;

use crate::cell::CardCellIndex;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Debug)]
pub enum Suit {
    Black,
    Green,
    Red,
}

impl Suit {
    pub const ALL: [Suit; 3] = [Suit::Black, Suit::Green, Suit::Red];

    pub fn index(self) -> usize {
        match self {
            Suit::Black => 0,
            Suit::Green => 1,
            Suit::Red => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Black => "Black",
            Suit::Green => "Green",
            Suit::Red => "Red",
        }
    }
}

/// The face of a card. Which container it sits in lives in the board's arena, see `Placement`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Debug)]
pub enum Card {
    FlowerCard,
    DragonCard{suit: Suit},
    NumberCard{suit: Suit, rank: u8},
}

impl Card {
    pub fn rank(self) -> Option<u8> {
        match self {
            Card::NumberCard{rank, ..} => Some(rank),
            _ => None,
        }
    }

    pub fn suit(self) -> Option<Suit> {
        match self {
            Card::NumberCard{suit, ..} | Card::DragonCard{suit} => Some(suit),
            Card::FlowerCard => None,
        }
    }

    /// Dragons and the flower never take part in runs or foundations.
    pub fn is_special(self) -> bool {
        self.rank().is_none()
    }

    pub fn is_dragon(self, suit: Suit) -> bool {
        self == Card::DragonCard{suit}
    }

    pub fn is_flower(self) -> bool {
        self == Card::FlowerCard
    }

    /// True if `other` may be stacked directly on top of `self` in a work stack.
    pub fn can_receive(self, other: Card) -> bool {
        match (self, other) {
            (Card::NumberCard{suit, rank}, Card::NumberCard{suit: other_suit, rank: other_rank}) =>
                suit != other_suit && other_rank + 1 == rank,
            _ => false,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Card::FlowerCard => write!(f, "Flower"),
            Card::DragonCard{suit} => write!(f, "{} Dragon", suit.name()),
            Card::NumberCard{suit, rank} => write!(f, "{} of {}", rank, suit.name()),
        }
    }
}

/// Stable handle to a card owned by a `Board`.
///
/// `board` is the generation of the board that issued the id; another board never
/// resolves it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Debug)]
pub struct CardId {
    pub(crate) board: u32,
    pub(crate) index: usize,
}

impl CardId {
    pub(crate) fn new(board: u32, index: usize) -> CardId {
        CardId{board, index}
    }

    pub fn index(self) -> usize {
        self.index
    }
}

/// Arena entry: a card plus its back-references.
///
/// `child` is only ever set while the card sits in a work stack or foundation with another
/// card directly on top of it. `cell` is `None` before dealing and after a dragon collapse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub(crate) card: Card,
    pub(crate) cell: Option<CardCellIndex>,
    pub(crate) child: Option<CardId>,
}

impl Placement {
    pub(crate) fn new(card: Card) -> Placement {
        Placement{card, cell: None, child: None}
    }

    pub fn card(&self) -> Card {
        self.card
    }

    pub fn cell(&self) -> Option<CardCellIndex> {
        self.cell
    }

    pub fn child(&self) -> Option<CardId> {
        self.child
    }
}
