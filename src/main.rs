fn main() {
    std::process::exit(cbq::app::startup::startup());
}
