fn main() {
    if let Err(err) = fleetledger::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
