fn main() {
    if let Err(e) = chainscope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
