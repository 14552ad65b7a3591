use crate::cli::EsOpts;
use crate::config::{DashboardConfig, TREE_CELLSCAPE};
use crate::loaders;
use log::info;
use std::error::Error;
use std::path::PathBuf;

/// Runs every loader for one dashboard from its YAML description:
/// analysis entry, tree layout, segment files, and metric files.
pub fn run(yaml_file: PathBuf, es_opts: EsOpts) -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::load(&yaml_file)?;
    let es = es_opts.client()?;

    info!("==================");
    info!("LOADING ANALYSIS ENTRY");
    info!("==================");
    let entry = config.analysis_entry(TREE_CELLSCAPE);
    loaders::analysis::import_entry(&es, &entry, TREE_CELLSCAPE)?;
    info!("Analysis entry loaded");

    info!("==================");
    info!("LOADING TREE DATA");
    info!("==================");
    let tree_index = config.index_name(TREE_CELLSCAPE, "tree");
    loaders::tree::load_file(
        &es,
        &tree_index,
        config.files.tree.as_deref(),
        config.files.tree_order.as_deref(),
        config.files.tree_root.as_deref(),
        config.files.tree_edges.as_deref(),
    )?;

    info!("==================");
    info!("LOADING SEGS DATA");
    info!("==================");
    let segs_index = config.index_name(TREE_CELLSCAPE, "segs");
    if es.exists_index(&segs_index)? {
        info!("seg data for analysis already exists - will delete old index");
        es.delete_index(&segs_index)?;
    }
    for seg_file in &config.files.segs {
        loaders::segs::load_file(&es, &segs_index, seg_file)?;
    }

    info!("==================");
    info!("LOADING METRIC DATA");
    info!("==================");
    if config.files.metrics.is_empty() {
        info!("no metric files");
    } else {
        let metrics_index = config.index_name(TREE_CELLSCAPE, "qc");
        if es.exists_index(&metrics_index)? {
            info!("metric data for analysis already exists - will delete old index");
            es.delete_index(&metrics_index)?;
        }
        for metric_file in &config.files.metrics {
            loaders::metrics::load_file(&es, &metrics_index, metric_file)?;
        }
    }

    Ok(())
}
