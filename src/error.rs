use std::io;

use thiserror::Error;

use crate::board::GameState;
use crate::card::CardId;
use crate::cell::CardCellIndex;

/// Why a move request left the board untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("the board is not accepting moves ({0:?})")]
    NotPlaying(GameState),
    #[error("card {0:?} does not belong to this board")]
    UnknownCard(CardId),
    #[error("no cell {0:?} on this board")]
    UnknownCell(CardCellIndex),
    #[error("card {0:?} is out of play")]
    OutOfPlay(CardId),
    #[error("card {0:?} cannot be picked up")]
    CannotPickUp(CardId),
    #[error("{cell:?} cannot accept card {card:?}")]
    CannotAccept { card: CardId, cell: CardCellIndex },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("seed code must be 10 characters, got {0}")]
    Length(usize),
    #[error("seed code {0:?} is not valid Z85")]
    Encoding(String),
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("could not access stats file: {0}")]
    Io(#[from] io::Error),
    #[error("stats file is malformed: {0}")]
    Malformed(String),
}
