fn main() {
    if let Err(err) = conlog::run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
