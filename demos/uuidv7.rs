//! Prints a single UUIDv7 string

use std::process::ExitCode;

fn main() -> ExitCode {
    match uuidv7::uuidv7() {
        Ok(uuid) => {
            println!("{uuid}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("uuidv7: {err}");
            ExitCode::FAILURE
        }
    }
}
