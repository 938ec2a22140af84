use s3_listing_mgr::config::{ConfigResolver, ProcessEnv};
use s3_listing_mgr::utils::log_utils::Logger;
use s3_listing_mgr::{args, run_app};

fn main() {
    let args = args::args_checks();
    let logger = Logger::new(args.verbose);

    // Validation failures are fatal before any network access.
    let overrides = args.overrides();
    let config = match ConfigResolver::new(&ProcessEnv, &overrides).resolve() {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("Cannot load config:");
            for e in errors {
                eprintln!(" {e}");
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = run_app(&config, &args, logger) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
