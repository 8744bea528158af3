use anyhow::{Context, Result};
use log::info;

use tep_import::{import_tep_sets_with, write_matrix, FailOnUnavailable, TepConfig};

/// Assemble the canonical TEP sets from `TEP_DATA_DIR` and report their
/// shapes. With `TEP_EXPORT_DIR` set the five matrices are also written
/// there as Parquet files.
fn main() -> Result<()> {
    env_logger::init();

    let config = TepConfig::from_env().context("reading TEP_* environment")?;
    info!("using {config:?}");

    let dir = config
        .directory()
        .context("opening the TEP data folder")?
        .with_checker(FailOnUnavailable);
    let sets = import_tep_sets_with(&dir, config.lagged_samples, config.check_data_exists)
        .context("assembling the canonical TEP sets")?;

    for (name, matrix) in sets.named() {
        let (vars, samples) = matrix.dim();
        println!("{name:>4}: {vars} variables x {samples} samples");
    }

    if let Some(export_dir) = &config.export_dir {
        std::fs::create_dir_all(export_dir)
            .with_context(|| format!("creating {}", export_dir.display()))?;
        for (name, matrix) in sets.named() {
            let path = export_dir.join(format!("{name}.parquet"));
            write_matrix(&path, matrix).with_context(|| format!("writing {}", path.display()))?;
        }
        info!("exported matrices to {}", export_dir.display());
    }

    Ok(())
}
