//! rosterwatch main entrypoint.

use rosterwatch::run;
use rosterwatch::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
