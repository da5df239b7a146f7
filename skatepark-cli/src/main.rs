//! Entry point for the `skatepark` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = skatepark_cli::run() {
        eprintln!("skatepark: {err}");
        std::process::exit(1);
    }
}
