fn main() {
    if let Err(error) = document_desk_lib::run() {
        eprintln!("document-desk: {:#}", error);
        std::process::exit(1);
    }
}
