use crate::cli::EsOpts;
use crate::loaders;
use std::error::Error;
use std::path::PathBuf;

pub fn run(
    index: String,
    tree_file: Option<PathBuf>,
    ordering_file: Option<PathBuf>,
    root: Option<String>,
    edges: Option<PathBuf>,
    es_opts: EsOpts,
) -> Result<(), Box<dyn Error>> {
    let es = es_opts.client()?;
    loaders::tree::load_file(
        &es,
        &index,
        tree_file.as_deref(),
        ordering_file.as_deref(),
        root.as_deref(),
        edges.as_deref(),
    )?;
    Ok(())
}
