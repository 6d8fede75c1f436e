use formwork::{cli::run_cli, init_with_filter};

fn main() {
    let log_filter = formwork::cli::configured_log_filter();
    init_with_filter(log_filter.as_deref());

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
