fn main() {
    if let Err(err) = smartpay_lib::run() {
        eprintln!("smartpay: {}", err);
        std::process::exit(1);
    }
}
