//! Perft runner.
//!
//! Usage:
//! `cargo run --release --bin perft -- --depth 5`
//! `cargo run --release --bin perft -- --fen "<fen>" --depth 3 --divide`

use std::time::Instant;

use clap::Parser;

use weever_chess::game_state::position::Position;
use weever_chess::move_generation::perft::{perft, perft_divide};

#[derive(Parser)]
#[command(name = "perft")]
#[command(about = "Count move-generation leaf nodes for a chess position")]
struct Args {
    /// FEN of the position to expand (default: start position)
    #[arg(short, long, default_value = "")]
    fen: String,

    /// Depth in plies
    #[arg(short, long, default_value_t = 5)]
    depth: u8,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let mut position = Position::from_fen(&args.fen)?;
    let start = Instant::now();

    if args.divide {
        let mut total = 0u64;
        for (mv, nodes) in perft_divide(&mut position, args.depth)? {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!();
        println!("Nodes searched: {total}");
    } else {
        let counts = perft(&mut position, args.depth)?;
        println!(
            "depth={} nodes={} captures={} ep={} castles={} promotions={} checks={}",
            args.depth,
            counts.nodes,
            counts.captures,
            counts.en_passant,
            counts.castles,
            counts.promotions,
            counts.checks
        );
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    println!("elapsed_ms={elapsed_ms}");
    Ok(())
}
