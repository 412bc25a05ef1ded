// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{core::*, movegen};

/// Receives the new text of a square (a piece glyph, or an empty string) whenever a move touches it.
pub trait SquareObserver {
    fn square_changed(&mut self, at: Coord, text: &str);
}

impl<F> SquareObserver for F
where
    F: FnMut(Coord, &str),
{
    fn square_changed(&mut self, at: Coord, text: &str) {
        self(at, text)
    }
}

/// Decides what a pawn reaching the last row becomes. The call blocks until a choice is made; returning
/// `None` leaves the pawn unpromoted.
pub trait PromotionProvider {
    fn choose(&mut self, color: Color, choices: &[PieceKind]) -> Option<PieceKind>;
}

impl<F> PromotionProvider for F
where
    F: FnMut(Color, &[PieceKind]) -> Option<PieceKind>,
{
    fn choose(&mut self, color: Color, choices: &[PieceKind]) -> Option<PieceKind> {
        self(color, choices)
    }
}

/// Errors raised when a board is asked to do something structurally impossible. These indicate a bug in the
/// caller, not a condition to recover from.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece at origin square {0}")]
    NoPieceAtOrigin(Coord),
    #[error("no pawn to capture en passant at {0}")]
    InvalidCapture(Coord),
    #[error("unknown piece type: {0}")]
    UnknownPieceType(char),
    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),
}

/// One cell of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Square {
    coord: Coord,
    occupant: Option<PieceId>,
    /// Every piece, of either color, that could currently move onto this square. Rebuilt after every move.
    threatened_by: PieceSet,
}

impl Square {
    fn new(coord: Coord) -> Square {
        Square {
            coord,
            occupant: None,
            threatened_by: PieceSet::empty(),
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }

    pub fn threatened_by(&self) -> PieceSet {
        self.threatened_by
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// A color's roster of pieces, captured ones included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    color: Color,
    pieces: Vec<Piece>,
}

impl Player {
    fn new(color: Color) -> Player {
        Player {
            color,
            pieces: Vec::with_capacity(16),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}

/// A chess board, holding every piece of both players, the move history and the threat map derived from
/// them.
pub struct Board {
    squares: [Square; 64],
    players: [Player; 2],
    /// Handles to each color's king, indexed by color.
    kings: [PieceId; 2],
    history: Vec<HistoryEntry>,
    checked_kings: PieceSet,
    side_to_move: Color,
    state: GameState,
    observer: Option<Box<dyn SquareObserver>>,
    promoter: Option<Box<dyn PromotionProvider>>,
}

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    fn blank() -> Board {
        let mut squares = [Square::new(A1); 64];
        for coord in coords() {
            squares[coord.as_index()] = Square::new(coord);
        }

        Board {
            squares,
            players: [Player::new(Color::White), Player::new(Color::Black)],
            kings: [PieceId::new(Color::White, 0), PieceId::new(Color::Black, 0)],
            history: Vec::new(),
            checked_kings: PieceSet::empty(),
            side_to_move: Color::White,
            state: GameState::Continue,
            observer: None,
            promoter: None,
        }
    }

    /// Creates a board set up for the start of a game.
    pub fn new() -> Board {
        let mut board = Board::blank();
        for color in colors() {
            for (col, &kind) in BACK_ROW.iter().enumerate() {
                board.spawn(Coord::new(color.back_row(), col as u8), color, kind);
            }

            for col in 0..8 {
                board.spawn(Coord::new(color.pawn_row(), col), color, PieceKind::Pawn);
            }
        }

        board.refresh_threats();
        board
    }

    fn spawn(&mut self, coord: Coord, color: Color, kind: PieceKind) -> PieceId {
        let roster = &mut self.players[color as usize].pieces;
        debug_assert!(roster.len() < 16, "roster overflow");
        let id = PieceId::new(color, roster.len() as u8);
        roster.push(Piece::new(id, kind, coord));
        self.squares[coord.as_index()].occupant = Some(id);
        if kind == PieceKind::King {
            self.kings[color as usize] = id;
        }

        id
    }

    pub fn set_observer(&mut self, observer: impl SquareObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn set_promotion_provider(&mut self, provider: impl PromotionProvider + 'static) {
        self.promoter = Some(Box::new(provider));
    }
}

//
// Queries.
//

impl Board {
    pub fn square(&self, at: Coord) -> &Square {
        &self.squares[at.as_index()]
    }

    /// All 64 squares, indexed by `Coord::as_index`.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.players[id.color() as usize].pieces[id.index()]
    }

    fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.players[id.color() as usize].pieces[id.index()]
    }

    pub fn piece_at(&self, at: Coord) -> Option<&Piece> {
        self.square(at).occupant.map(|id| self.piece(id))
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color as usize]
    }

    pub fn active_pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.player(color).pieces.iter().filter(|p| !p.is_captured())
    }

    pub fn captured_pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.player(color).pieces.iter().filter(|p| p.is_captured())
    }

    pub fn king(&self, color: Color) -> &Piece {
        self.piece(self.kings[color as usize])
    }

    pub fn checked_kings(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.checked_kings.iter().map(move |id| self.piece(id))
    }

    pub fn is_check(&self, color: Color) -> bool {
        self.checked_kings.contains(self.kings[color as usize])
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// The result of the most recent move played through `logic::play`.
    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub(crate) fn set_game_state(&mut self, state: GameState) {
        self.state = state;
    }

    /// Returns whether any piece not of the given color threatens the square.
    pub fn is_threatened_by_enemy(&self, at: Coord, color: Color) -> bool {
        !self
            .square(at)
            .threatened_by
            .of_color(color.toggle())
            .is_empty()
    }

    /// The kinds of every enemy piece threatening the square, sorted.
    pub fn enemy_threat_kinds(&self, at: Coord, color: Color) -> Vec<PieceKind> {
        let mut kinds: Vec<_> = self
            .square(at)
            .threatened_by
            .of_color(color.toggle())
            .iter()
            .map(|id| self.piece(id).kind())
            .collect();
        kinds.sort();
        kinds
    }

    /// The pseudo-legal destinations of a piece: its move shape filtered by board occupancy, without regard
    /// to whether the move exposes its own king. Castling appears as the king moving onto its rook.
    pub fn possible_moves(&self, id: PieceId) -> Vec<Coord> {
        self.piece(id)
            .basic_moves()
            .into_iter()
            .filter(|&target| movegen::is_legal_move(self, id, target))
            .collect()
    }
}

//
// Threat map maintenance.
//

impl Board {
    /// Rebuilds every square's threat set and the set of checked kings from scratch.
    pub fn refresh_threats(&mut self) {
        for square in self.squares.iter_mut() {
            square.threatened_by = PieceSet::empty();
        }
        self.checked_kings = PieceSet::empty();

        let mut threats = Vec::new();
        for player in &self.players {
            for piece in player.pieces.iter().filter(|p| !p.is_captured()) {
                for target in movegen::threat_targets(self, piece) {
                    threats.push((target, piece.id()));
                }
            }
        }

        for &(target, id) in &threats {
            self.squares[target.as_index()].threatened_by.insert(id);
        }

        for color in colors() {
            let (king, at) = {
                let king = self.king(color);
                (king.id(), king.coord())
            };

            if self.is_threatened_by_enemy(at, color) {
                self.checked_kings.insert(king);
            }
        }

        trace!(
            threats = threats.len(),
            checked = self.checked_kings.len(),
            "refreshed threat map"
        );
    }
}

//
// Move execution.
//
// These routines perform no legality checks beyond the structural ones needed to carry the move out; callers
// are expected to only ask for moves that `logic::legal_moves` produced.
//

impl Board {
    /// Moves the piece on `from` to `to`, capturing whatever stands on `to`, and records the move in the
    /// history under the given kind.
    pub fn execute_move(&mut self, from: Coord, to: Coord, kind: MoveKind) -> Result<(), MoveError> {
        let id = self
            .square(from)
            .occupant
            .ok_or(MoveError::NoPieceAtOrigin(from))?;

        if let Some(victim) = self.square(to).occupant {
            if victim != id {
                self.piece_mut(victim).set_captured();
                debug!(%to, victim = ?victim, "captured piece");
            }
        }

        self.piece_mut(id).set_coord(to);
        self.squares[from.as_index()].occupant = None;
        self.squares[to.as_index()].occupant = Some(id);
        self.notify(from);
        self.notify(to);
        self.history.push(HistoryEntry { from, to, kind });
        debug!(%from, %to, ?kind, "executed move");
        self.refresh_threats();
        Ok(())
    }

    /// Castles the king on `king_from` with the rook standing on `rook_square`. The king moves two squares
    /// towards the rook and the rook lands on the square the king crossed.
    pub fn execute_castling(&mut self, king_from: Coord, rook_square: Coord) -> Result<(), MoveError> {
        let color = self
            .piece_at(king_from)
            .ok_or(MoveError::NoPieceAtOrigin(king_from))?
            .color();
        if self.square(rook_square).is_empty() {
            return Err(MoveError::NoPieceAtOrigin(rook_square));
        }

        let side = CastleSide::towards(king_from, rook_square);
        debug!(%color, ?side, "castling");
        self.execute_move(king_from, side.king_landing(color), MoveKind::Castling)?;
        self.execute_move(rook_square, side.rook_landing(color), MoveKind::Castling)
    }

    /// Captures en passant: removes the enemy pawn standing behind `to` and moves the capturing pawn there.
    pub fn execute_en_passant(&mut self, from: Coord, to: Coord) -> Result<(), MoveError> {
        let color = self
            .piece_at(from)
            .ok_or(MoveError::NoPieceAtOrigin(from))?
            .color();
        let victim_at = to
            .offset(-color.forward(), 0)
            .ok_or(MoveError::InvalidCapture(to))?;
        let victim = self
            .piece_at(victim_at)
            .filter(|p| p.color() != color && p.kind() == PieceKind::Pawn)
            .map(|p| p.id())
            .ok_or(MoveError::InvalidCapture(victim_at))?;

        self.piece_mut(victim).set_captured();
        self.squares[victim_at.as_index()].occupant = None;
        self.notify(victim_at);
        debug!(%from, %to, captured = %victim_at, "en passant");
        self.execute_move(from, to, MoveKind::EnPassant)
    }

    /// Replaces the kind of the piece on `at` and records the promotion in the history.
    pub fn promote(&mut self, at: Coord, kind: PieceKind) -> Result<(), MoveError> {
        if !kind.is_promotable() {
            return Err(MoveError::InvalidPromotion(kind));
        }

        let id = self
            .square(at)
            .occupant
            .ok_or(MoveError::NoPieceAtOrigin(at))?;
        self.piece_mut(id).set_kind(kind);
        self.notify(at);
        self.history.push(HistoryEntry {
            from: at,
            to: at,
            kind: MoveKind::Promotion,
        });
        debug!(%at, ?kind, "promoted");
        self.refresh_threats();
        Ok(())
    }

    /// Like `promote`, naming the new kind by a piece letter or glyph.
    pub fn promote_symbol(&mut self, at: Coord, symbol: char) -> Result<(), MoveError> {
        let kind = PieceKind::from_symbol(symbol).ok_or(MoveError::UnknownPieceType(symbol))?;
        self.promote(at, kind)
    }

    /// Asks the promotion provider what the piece on `at` becomes and applies the answer. Returns the chosen
    /// kind, or `None` if there is no provider or it made no choice.
    pub fn request_promotion(&mut self, at: Coord) -> Result<Option<PieceKind>, MoveError> {
        let color = self
            .piece_at(at)
            .ok_or(MoveError::NoPieceAtOrigin(at))?
            .color();
        let provider = match self.promoter.as_mut() {
            Some(provider) => provider,
            None => {
                trace!(%at, "no promotion provider attached");
                return Ok(None);
            }
        };

        match provider.choose(color, &PROMOTABLE_KINDS) {
            Some(kind) => {
                self.promote(at, kind)?;
                Ok(Some(kind))
            }
            None => {
                warn!(%at, "no promotion chosen, pawn stays unpromoted");
                Ok(None)
            }
        }
    }

    fn notify(&mut self, at: Coord) {
        if self.observer.is_none() {
            return;
        }

        let text = self
            .piece_at(at)
            .map(|p| p.glyph().to_string())
            .unwrap_or_default();
        if let Some(observer) = self.observer.as_mut() {
            observer.square_changed(at, &text);
        }
    }
}

//
// Text diagrams.
//
// A diagram is eight lines of eight cells, Black's back row first. A cell is `.` when empty or a FEN piece
// letter: uppercase for White, lowercase for Black. Whitespace inside a line is ignored.
//

/// Possible errors that can arise when parsing a text diagram into a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum DiagramParseError {
    #[error("expected 8 rows, found {0}")]
    WrongRowCount(usize),
    #[error("row {0} does not have 8 cells")]
    WrongRowLength(u8),
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("no {0} king")]
    MissingKing(Color),
    #[error("more than one {0} king")]
    ExtraKing(Color),
    #[error("more than 16 {0} pieces")]
    TooManyPieces(Color),
}

impl Board {
    /// Constructs a board from a text diagram. Every piece starts with no recorded moves and White is to move.
    pub fn from_diagram(diagram: impl AsRef<str>) -> Result<Board, DiagramParseError> {
        let rows: Vec<&str> = diagram
            .as_ref()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.len() != 8 {
            return Err(DiagramParseError::WrongRowCount(rows.len()));
        }

        let mut board = Board::blank();
        let mut kings = [0usize; 2];
        for (i, line) in rows.iter().enumerate() {
            let row = 7 - i as u8;
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != 8 {
                return Err(DiagramParseError::WrongRowLength(row));
            }

            for (col, c) in cells.into_iter().enumerate() {
                if c == '.' {
                    continue;
                }

                let kind = PieceKind::from_symbol(c)
                    .filter(|_| c.is_ascii_alphabetic())
                    .ok_or(DiagramParseError::UnknownPiece(c))?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };

                if board.players[color as usize].pieces.len() >= 16 {
                    return Err(DiagramParseError::TooManyPieces(color));
                }

                if kind == PieceKind::King {
                    kings[color as usize] += 1;
                    if kings[color as usize] > 1 {
                        return Err(DiagramParseError::ExtraKing(color));
                    }
                }

                board.spawn(Coord::new(row, col as u8), color, kind);
            }
        }

        for color in colors() {
            if kings[color as usize] == 0 {
                return Err(DiagramParseError::MissingKing(color));
            }
        }

        board.refresh_threats();
        Ok(board)
    }

    pub fn as_diagram(&self) -> String {
        let mut buf = String::new();
        for row in (0..8).rev() {
            for col in 0..8 {
                match self.piece_at(Coord::new(row, col)) {
                    Some(piece) => buf.push_str(&piece.to_string()),
                    None => buf.push('.'),
                }
            }

            if row != 0 {
                buf.push('\n');
            }
        }

        buf
    }
}

impl Clone for Board {
    /// Copies the complete game state. The square observer and the promotion provider are not part of the
    /// game state and are left unset on the copy, so simulated moves never reach them.
    fn clone(&self) -> Board {
        Board {
            squares: self.squares,
            players: self.players.clone(),
            kings: self.kings,
            history: self.history.clone(),
            checked_kings: self.checked_kings,
            side_to_move: self.side_to_move,
            state: self.state,
            observer: None,
            promoter: None,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("diagram", &self.as_diagram())
            .field("history", &self.history)
            .field("checked_kings", &self.checked_kings)
            .field("side_to_move", &self.side_to_move)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in (0..8).rev() {
            for col in 0..8 {
                if let Some(piece) = self.piece_at(Coord::new(row, col)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", row + 1)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for col in 0..8 {
            write!(f, " {} ", (b'a' + col) as char)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
