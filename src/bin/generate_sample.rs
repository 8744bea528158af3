//! Write a synthetic TEP folder (`d00.dat` … `d21_te.dat`) into
//! `TEP_DATA_DIR` so the loader can be exercised without the real archive.
//!
//! Shapes follow the published data: 52 variables, 500 normal operation
//! training samples, 480 samples per fault training set and 960 samples per
//! test set. Faults start after sample 20 in training sets and after sample
//! 160 in test sets. The values are noise around fixed operating points,
//! not a process simulation.

use anyhow::{Context, Result};
use log::info;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use tep_import::{write_matrix, DataSetId, TepConfig};

const N_VARS: usize = 52;
const NORMAL_TRAINING_SAMPLES: usize = 500;
const FAULT_TRAINING_SAMPLES: usize = 480;
const TEST_SAMPLES: usize = 960;
const TRAINING_FAULT_ONSET: usize = 20;
const TEST_FAULT_ONSET: usize = 160;

/// Operating point and noise level of every variable.
fn operating_points(rng: &mut StdRng) -> Result<Vec<Normal<f64>>> {
    (0..N_VARS)
        .map(|_| {
            let mean = 10f64.powf(rng.gen_range(0.0..3.0));
            Normal::new(mean, mean * 0.01).context("building operating point")
        })
        .collect()
}

/// Variables × samples matrix. Fault `k` shifts variable `k - 1` (mod 52)
/// by five standard deviations from `onset` on; fault 0 is normal operation.
fn simulate(
    points: &[Normal<f64>],
    samples: usize,
    fault: u8,
    onset: usize,
    rng: &mut StdRng,
) -> Array2<f64> {
    let faulty_var = (fault as usize + N_VARS - 1) % N_VARS;
    let mut data = Array2::zeros((N_VARS, samples));
    for ((var, sample), value) in data.indexed_iter_mut() {
        let point = &points[var];
        let shift = if fault != 0 && var == faulty_var && sample >= onset {
            5.0 * point.std_dev()
        } else {
            0.0
        };
        *value = point.sample(rng) + shift;
    }
    data
}

fn main() -> Result<()> {
    env_logger::init();

    let config = TepConfig::from_env().context("reading TEP_* environment")?;
    let out = &config.data_dir;
    std::fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let mut rng = StdRng::seed_from_u64(42);
    let points = operating_points(&mut rng)?;

    for id in DataSetId::all() {
        let fault = id.index();
        let (training_samples, training) = if fault == 0 {
            let m = simulate(&points, NORMAL_TRAINING_SAMPLES, 0, 0, &mut rng);
            // The archive stores d00.dat with one variable per line.
            (NORMAL_TRAINING_SAMPLES, m.t().to_owned())
        } else {
            let m = simulate(&points, FAULT_TRAINING_SAMPLES, fault, TRAINING_FAULT_ONSET, &mut rng);
            (FAULT_TRAINING_SAMPLES, m)
        };
        let test = simulate(&points, TEST_SAMPLES, fault, TEST_FAULT_ONSET, &mut rng);

        let training_path = out.join(id.training_file_name());
        write_matrix(&training_path, &training)
            .with_context(|| format!("writing {}", training_path.display()))?;
        let test_path = out.join(id.test_file_name());
        write_matrix(&test_path, &test)
            .with_context(|| format!("writing {}", test_path.display()))?;

        info!("{id}: {training_samples} training / {TEST_SAMPLES} test samples");
    }

    println!("Wrote 44 synthetic data sets to {}", out.display());
    Ok(())
}
