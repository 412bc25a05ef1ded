// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fs, path::PathBuf};

use serde::Serialize;
use structopt::StructOpt;
use tessera::{
    core::{Color, Coord, MoveIntent, PieceKind},
    logic, Board,
};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

/// Lists the legal moves of a position.
#[derive(Debug, StructOpt)]
struct Options {
    /// A text diagram of the position: eight rows of eight cells, Black's back row first.
    #[structopt(long = "diagram", parse(from_os_str))]
    diagram: Option<PathBuf>,

    /// The color to move; defaults to White.
    #[structopt(long = "black")]
    black: bool,

    /// Print the moves as JSON, one object per line.
    #[structopt(long = "json")]
    json: bool,

    /// Squares whose moves to list, e.g. "e2". Lists every piece of the side to move if omitted.
    #[structopt(name = "SQUARES")]
    squares: Vec<Coord>,
}

#[derive(Serialize)]
struct MoveRecord {
    piece: PieceKind,
    color: Color,
    from: String,
    to: String,
    intent: MoveIntent,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("TESSERA_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = Options::from_args();
    let mut board = match &options.diagram {
        Some(path) => Board::from_diagram(fs::read_to_string(path)?)?,
        None => Board::new(),
    };

    if options.black {
        board.set_side_to_move(Color::Black);
    }

    let moves = if options.squares.is_empty() {
        logic::all_legal_moves(&board, board.side_to_move())?
    } else {
        let mut moves = Vec::new();
        for &square in &options.squares {
            moves.extend(logic::legal_moves(&board, square)?);
        }

        moves
    };

    if !options.json {
        println!("{}", board);
        if board.is_check(board.side_to_move()) {
            println!("{} is in check", board.side_to_move());
        }
    }

    for mov in moves {
        if options.json {
            // every move originates from an occupied square.
            let piece = match board.piece_at(mov.from) {
                Some(piece) => piece,
                None => continue,
            };

            let record = MoveRecord {
                piece: piece.kind(),
                color: piece.color(),
                from: mov.from.to_string(),
                to: mov.to.to_string(),
                intent: mov.intent,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{}", mov);
        }
    }

    Ok(())
}
