use crate::cli::EsOpts;
use crate::loaders;
use crate::segs::normalize::{self, ModeMap};
use crate::segs::{mode, Segment};
use anyhow::Result;
use indicatif::ProgressBar;
use log::info;
use rayon::prelude::*;
use std::error::Error;

/// Computes the population mode profile from a bin index, diffs every
/// cell against it, and loads the combined segment table (the synthetic
/// "all" track first) into the target index.
pub fn run(bin_index: String, segs_index: String, es_opts: EsOpts) -> Result<(), Box<dyn Error>> {
    let es = es_opts.client()?;

    let response = es.search(&bin_index, &mode::modes_query())?;
    let mode_bins = mode::parse_mode_bins(&response)?;
    let mode_map = mode::mode_map(&mode_bins);
    let mut all_segs = normalize::collapse_bins(&mode_bins)?;
    info!(
        "mode profile covers {} bins across {} segments",
        mode_bins.len(),
        all_segs.len()
    );

    let ids_response = es.search(&bin_index, &normalize::cell_ids_query())?;
    let cell_ids = normalize::parse_cell_ids(&ids_response)?;
    info!("normalizing segments for {} cells", cell_ids.len());

    // Cells are independent; only the read-only mode map is shared.
    let progress = ProgressBar::new(cell_ids.len() as u64);
    let cell_segs: Vec<Result<Vec<Segment>>> = cell_ids
        .par_iter()
        .map(|cell_id| {
            let segs = normalize_cell(&es, &bin_index, cell_id, &mode_map);
            progress.inc(1);
            segs
        })
        .collect();
    progress.finish_and_clear();

    for segs in cell_segs {
        all_segs.extend(segs?);
    }

    loaders::segs::load_table(&es, &segs_index, &all_segs)?;
    Ok(())
}

fn normalize_cell(
    es: &crate::es::EsClient,
    bin_index: &str,
    cell_id: &str,
    mode_map: &ModeMap,
) -> Result<Vec<Segment>> {
    let response = es.search(bin_index, &normalize::cell_bins_query(cell_id))?;
    let bins = normalize::parse_cell_bins(&response)?;
    Ok(normalize::normalize_cell_bins(bins, mode_map)?)
}
