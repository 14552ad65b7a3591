use crate::cli::EsOpts;
use crate::loaders;
use std::error::Error;
use std::path::PathBuf;

pub fn run(index: String, bin_file: PathBuf, es_opts: EsOpts) -> Result<(), Box<dyn Error>> {
    let es = es_opts.client()?;
    loaders::bins::load_file(&es, &index, &bin_file)?;
    Ok(())
}
