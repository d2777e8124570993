fn main() {
    env_logger::init();
    if let Err(e) = poolsense_rs::adapters::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
