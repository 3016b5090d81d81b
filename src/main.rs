fn main() {
    if let Err(err) = svorg::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
