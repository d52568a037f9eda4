//! Print the compiled door-and-key story as JSON.

use std::process;

fn main() {
    match door_key::artifact() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
