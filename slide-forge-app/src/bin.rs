//! # Slide Forge (binary)
//!
//! Main executable entry point.

fn main() {
    std::process::exit(match slide_forge_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    });
}
