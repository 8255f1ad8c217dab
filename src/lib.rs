//! Rules engine for Shenzhen Solitaire, plus a terminal front end.
//!
//! A [`board::Board`] owns all 40 cards in an arena and the fifteen containers they move
//! between: three temp cells, the flower cell, three foundations and eight work stacks.
//! Every mutating call runs to completion and hands back the [`board::Event`]s it caused;
//! a [`session::GameSession`] wraps a board with its deal seed and clock.
//!
//! ```
//! use shenzhen_solitaire::board::Board;
//! use shenzhen_solitaire::cell::CardCellIndex;
//! use shenzhen_solitaire::seed::Seed;
//!
//! let mut board = Board::deal(Seed::new(42));
//! let top = board.cell(CardCellIndex::WorkStackIndex(0)).unwrap().top().unwrap();
//! // an empty temp cell takes any single card
//! assert!(board.move_card(top, CardCellIndex::TempCellIndex(0)).is_ok());
//! ```

pub mod board;
pub mod card;
pub mod cell;
pub mod deal;
#[macro_use]
pub mod display;
pub mod error;
pub mod game;
pub mod seed;
pub mod session;
pub mod stats;
pub mod util;
