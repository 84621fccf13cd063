use std::io::{self, Write};
use tilematch::engine::Grid;
use tilematch::resolver::MatchEngine;

const COLS: usize = 6;
const ROWS: usize = 6;
const COLORS: usize = 3;

fn main() {
    let mut engine = MatchEngine::new(Grid::new_random(COLS, ROWS, COLORS));
    println!("Welcome to Tilematch!");
    println!("Swap any two cells; runs of 3+ are cleared and refilled.");

    loop {
        println!("---------------------");
        println!("{}", engine.grid());

        print!("Enter a swap (src_col src_row dst_col dst_row), or 'q' to quit: ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }

        let trimmed = input.trim();
        if trimmed == "q" {
            println!("Thanks for playing!");
            break;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != 4 {
            println!("Invalid input format. Use 'src_col src_row dst_col dst_row' or 'q'.");
            continue;
        }

        let coords: Vec<usize> = match parts.iter().map(|p| p.parse::<usize>()).collect() {
            Ok(v) => v,
            Err(_) => {
                println!("Invalid input: coordinates must be numbers (e.g. '1 4 1 5').");
                continue;
            }
        };

        let res = engine.resolve_swap((coords[0], coords[1]), (coords[2], coords[3]));
        if !res.swapped {
            // Out-of-bounds drop: the tile snaps back, nothing changed.
            println!(
                "Drop outside the grid: coordinates must be within 0..{} x 0..{}.",
                COLS, ROWS
            );
        } else if res.cascades == 0 {
            println!("No match — the tiles stay exchanged anyway.");
        } else {
            println!(
                "Cleared {} tiles over {} cascade(s).",
                res.tiles_cleared, res.cascades
            );
        }
    }
}
