use crate::cli::EsOpts;
use crate::loaders;
use std::error::Error;
use std::path::PathBuf;

pub fn run(index: String, segs_file: PathBuf, es_opts: EsOpts) -> Result<(), Box<dyn Error>> {
    let es = es_opts.client()?;
    loaders::segs::load_file(&es, &index, &segs_file)?;
    Ok(())
}
