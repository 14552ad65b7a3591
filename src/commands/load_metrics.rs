use crate::cli::EsOpts;
use crate::loaders;
use std::error::Error;
use std::path::PathBuf;

pub fn run(index: String, metrics_file: PathBuf, es_opts: EsOpts) -> Result<(), Box<dyn Error>> {
    let es = es_opts.client()?;
    loaders::metrics::load_file(&es, &index, &metrics_file)?;
    Ok(())
}
