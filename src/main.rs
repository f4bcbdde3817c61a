fn main() {
    let code = dynimport::app::startup::startup();
    std::process::exit(code);
}
