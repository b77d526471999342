fn main() {
    if let Err(err) = photo_overlay::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
