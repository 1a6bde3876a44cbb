use clap::Parser;
use n50osm_cli::{app, run};

fn main() {
    env_logger::init();
    let args = app::N50OsmArgs::parse();
    if let Err(e) = run::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
