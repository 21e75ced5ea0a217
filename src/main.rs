fn main() {
    if let Err(e) = artham::cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
