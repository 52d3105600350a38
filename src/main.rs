fn main() {
    if let Err(err) = orthoroute::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
