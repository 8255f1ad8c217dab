use itertools::Itertools;

use crate::board::Board;
use crate::card::{Card, CardId, Suit};
use crate::cell::{CardCell, CardCellIndex, FOUNDATIONS, TEMP_CELLS, WORK_STACKS};
use crate::util;

/// Formats a string literal as a "selected" marker in the game ui.
///
/// In practice, this turns the string yellow.
macro_rules! selector_color {
    ($text: tt) => {
        concat!("\x1b[38;5;11m", $text, "\x1b[0m")
    }
}

pub fn display_card(card: Card) -> String {
    match card {
        Card::FlowerCard => term_flower("F".to_string()),
        Card::DragonCard{suit} => term_color(suit, "D".to_string()),
        Card::NumberCard{suit, rank} => term_color(suit, rank.to_string()),
    }
}

pub fn display_highlighted_card(card: Card) -> String {
    match card {
        Card::FlowerCard => term_flower("F".to_string()),
        Card::DragonCard{suit} => term_highlight(suit, "D".to_string()),
        Card::NumberCard{suit, rank} => term_highlight(suit, rank.to_string()),
    }
}

fn card_at(board: &Board, id: CardId) -> Card {
    board.card(id).unwrap_or(Card::FlowerCard)
}

pub fn display_cell(board: &Board, cell: &CardCell) -> String {
    match cell {
        CardCell::TempCell{collapsed: Some(suit), ..} => term_color(*suit, "X".to_string()),
        CardCell::WorkStack{cards} if !cards.is_empty() =>
            cards.iter().map(|&id| display_card(card_at(board, id))).join("\n"),
        _ => match cell.top() {
            Some(id) => display_card(card_at(board, id)),
            None => String::from("-"),
        },
    }
}

/// Renders a work stack with its top `height` cards picked out.
pub fn display_highlighted_cell(board: &Board, cell: &CardCell, height: usize) -> String {
    let cards = cell.cards();
    if cards.is_empty() {
        return display_cell(board, cell);
    }
    let pivot = cards.len().saturating_sub(height);
    cards[..pivot].iter().map(|&id| display_card(card_at(board, id)))
        .chain(cards[pivot..].iter().map(|&id| display_highlighted_card(card_at(board, id))))
        .join("\n")
}

pub fn clear() {
    print!("{}[2J{}[H", 27 as char, 27 as char);
}

/// The top row: temp cells, flower cell, foundations.
pub fn display_top_row(board: &Board) -> String {
    let cell = |index| board.cell(index).map_or_else(String::new, |cell| display_cell(board, cell));
    let mut s = String::new();
    for i in 0..TEMP_CELLS {
        s.push_str(&cell(CardCellIndex::TempCellIndex(i)));
    }
    s.push_str("  ");
    s.push_str(&cell(CardCellIndex::FlowerCellIndex));
    s.push_str(" ");
    for i in 0..FOUNDATIONS {
        s.push_str(&cell(CardCellIndex::FoundationIndex(i)));
    }
    s
}

/// The suits whose dragons can be collapsed right now, coloured.
pub fn display_ready_dragons(board: &Board) -> String {
    let ready: Vec<String> = Suit::ALL.iter()
        .filter(|&&suit| board.collapse_available(suit))
        .map(|&suit| term_color(suit, suit.name().to_string()))
        .collect();
    if ready.is_empty() {
        String::new()
    } else {
        format!("Dragons ready: {}", ready.join(" "))
    }
}

pub fn display_board(board: &Board) -> String {
    let mut s = display_top_row(board);
    s.push_str("\n");

    let strings: Vec<_> = (0..WORK_STACKS)
        .filter_map(|i| board.cell(CardCellIndex::WorkStackIndex(i)))
        .map(|cell| display_cell(board, cell))
        .collect();
    s.push_str(&util::join_vertical(strings));
    s
}

fn term_color(suit: Suit, text: String) -> String {
    format!(
        "\x1b[{}m{}\x1b[39m",
        match suit {
            Suit::Black => 90,
            Suit::Green => 32,
            Suit::Red => 31,
        },
        text,
    )
}

fn term_flower(text: String) -> String {
    format!("\x1b[35m{}\x1b[39m", text)
}

fn term_highlight(suit: Suit, text: String) -> String {
    format!(
        "\x1b[22m\x1b[{}m{}\x1b[39m\x1b[2m",
        match suit {
            Suit::Black => 90,
            Suit::Green => 32,
            Suit::Red => 31,
        },
        text,
    )
}

pub fn dim(text: String) -> String {
    format!("\x1b[2m{}\x1b[22m", text)
}

pub fn no_dim(text: String, should_dim: bool) -> String {
    if should_dim {format!("\x1b[22m{}\x1b[2m", text)}
    else {text}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Layout;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut escaped = false;
        for c in text.chars() {
            match c {
                '\x1b' => escaped = true,
                'm' | 'H' | 'J' if escaped => escaped = false,
                _ if escaped => (),
                _ => out.push(c),
            }
        }
        out
    }

    #[test]
    fn board_layout() {
        let mut layout = Layout{
            temp_cells: [None, Some(Card::DragonCard{suit: Suit::Red}), None],
            collapsed: [Some(Suit::Green), None, None],
            flower_cell: Some(Card::FlowerCard),
            ..Layout::default()
        };
        layout.foundations[2] = vec![Card::NumberCard{suit: Suit::Black, rank: 1}];
        layout.work_stacks[0] = vec![
            Card::NumberCard{suit: Suit::Red, rank: 9},
            Card::NumberCard{suit: Suit::Black, rank: 8},
        ];
        layout.work_stacks[3] = vec![Card::DragonCard{suit: Suit::Black}];
        let board = Board::from_layout(layout);

        assert_eq!(strip_ansi(&display_board(&board)), "XD-  F --1\n 9--D----\n 8       \n");
    }

    #[test]
    fn highlighted_stack_marks_the_top() {
        let mut layout = Layout::default();
        layout.work_stacks[0] = vec![
            Card::NumberCard{suit: Suit::Red, rank: 9},
            Card::NumberCard{suit: Suit::Black, rank: 8},
        ];
        let board = Board::from_layout(layout);
        let cell = board.cell(CardCellIndex::WorkStackIndex(0)).unwrap();
        let rendered = display_highlighted_cell(&board, cell, 1);
        assert_eq!(strip_ansi(&rendered), "9\n8");
        assert!(rendered.ends_with(&term_highlight(Suit::Black, "8".to_string())));
    }
}
