fn main() {
    #[cfg(feature = "cli")]
    oxips::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("oxips: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
