use cellscape_tools::cli::{Args, Commands};
use cellscape_tools::commands;
use clap::Parser;

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.verbosity.filter()),
    )
    .init();

    let result = match args.command {
        Commands::LoadDashboard { yaml_file, es } => commands::load_dashboard::run(yaml_file, es),
        Commands::LoadTree {
            index,
            tree_file,
            ordering_file,
            root,
            edges,
            es,
        } => commands::load_tree::run(index, tree_file, ordering_file, root, edges, es),
        Commands::LoadBins {
            index,
            bin_file,
            es,
        } => commands::load_bins::run(index, bin_file, es),
        Commands::LoadSegs {
            index,
            segs_file,
            es,
        } => commands::load_segs::run(index, segs_file, es),
        Commands::LoadMetrics {
            index,
            metrics_file,
            es,
        } => commands::load_metrics::run(index, metrics_file, es),
        Commands::NormalizeSegs {
            bin_index,
            segs_index,
            es,
        } => commands::normalize_segs::run(bin_index, segs_index, es),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
