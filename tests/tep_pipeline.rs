use std::path::Path;

use ndarray::Array2;
use tempfile::TempDir;

use tep_import::{
    import_tep_sets, import_tep_sets_with, write_matrix, Availability, DataSetId,
    FailOnUnavailable, ImportOptions, TepDirectory, TepError,
};

const N_VARS: usize = 52;

/// Values encode (set, variable, sample) so every cell can be traced back.
fn tagged(set: u8, samples: usize) -> Array2<f64> {
    Array2::from_shape_fn((N_VARS, samples), |(v, s)| {
        set as f64 * 1_000_000.0 + v as f64 * 1_000.0 + s as f64
    })
}

/// Write the five canonical files. `d00.dat` is stored one variable per
/// line, the test files one sample per line, as in the real archive.
fn canonical_dir(samples: &[(u8, usize, usize)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for &(set, train, test) in samples {
        let id = DataSetId::new(set as i64).unwrap();
        if train > 0 {
            let m = tagged(set, train);
            write_matrix(&dir.path().join(id.training_file_name()), &m.t().to_owned()).unwrap();
        }
        write_matrix(&dir.path().join(id.test_file_name()), &tagged(set + 100, test)).unwrap();
    }
    dir
}

fn standard() -> TempDir {
    canonical_dir(&[(0, 120, 96), (4, 0, 90), (5, 0, 80), (10, 0, 70)])
}

fn open_dir(path: &Path) -> TepDirectory {
    TepDirectory::open(path).unwrap()
}

#[test]
fn canonical_sets_without_lag() {
    let dir = standard();
    let sets = import_tep_sets_with(&open_dir(dir.path()), 0, false).unwrap();

    assert_eq!(sets.x.dim(), (33, 120));
    assert_eq!(sets.t0.dim(), (33, 96));
    assert_eq!(sets.t4.dim(), (33, 90));
    assert_eq!(sets.t5.dim(), (33, 80));
    assert_eq!(sets.t10.dim(), (33, 70));

    // row 22 is XMV(1), untrimmed variable 41
    assert_eq!(sets.x[[22, 7]], 41_007.0);
    assert_eq!(sets.t4[[0, 0]], 104_000_000.0);
}

#[test]
fn canonical_sets_with_default_lag() {
    let dir = standard();
    let (x, t0, t4, t5, t10) = import_tep_sets_with(&open_dir(dir.path()), 2, false)
        .unwrap()
        .into_tuple();

    assert_eq!(x.dim(), (99, 118));
    assert_eq!(t0.dim(), (99, 94));
    assert_eq!(t4.dim(), (99, 88));
    assert_eq!(t5.dim(), (99, 78));
    assert_eq!(t10.dim(), (99, 68));

    // column j, block k holds sample j + 2 - k
    for k in 0..3 {
        assert_eq!(x[[k * 33, 5]], (7 - k) as f64);
        assert_eq!(t10[[k * 33 + 32, 0]], 110_000_000.0 + 51_000.0 + (2 - k) as f64);
    }
}

#[test]
fn lag_larger_than_a_test_set_empties_it() {
    let dir = canonical_dir(&[(0, 120, 96), (4, 0, 90), (5, 0, 80), (10, 0, 70)]);
    let sets = import_tep_sets_with(&open_dir(dir.path()), 75, false).unwrap();
    assert_eq!(sets.x.dim(), (33 * 76, 45));
    assert_eq!(sets.t10.dim(), (33 * 76, 0));
}

#[test]
fn missing_fault_file_fails_whole_assembly() {
    let dir = canonical_dir(&[(0, 120, 96), (4, 0, 90), (10, 0, 70)]);
    let err = import_tep_sets_with(&open_dir(dir.path()), 2, false).unwrap_err();
    assert!(matches!(err, TepError::FileNotFound { path } if path.ends_with("d05_te.dat")));
}

#[test]
fn too_few_variables_is_a_shape_error() {
    let dir = tempfile::tempdir().unwrap();
    let narrow = Array2::from_shape_fn((34, 500), |(v, s)| (v * 500 + s) as f64);
    for id in [0, 4, 5, 10] {
        let id = DataSetId::new(id).unwrap();
        write_matrix(&dir.path().join(id.training_file_name()), &narrow).unwrap();
        write_matrix(&dir.path().join(id.test_file_name()), &narrow).unwrap();
    }
    let err = import_tep_sets_with(&open_dir(dir.path()), 0, false).unwrap_err();
    assert!(matches!(err, TepError::Shape(_)));
}

#[test]
fn availability_check_guards_assembly() {
    let dir = standard();
    let tep = TepDirectory::open(dir.path())
        .unwrap()
        .with_checker(FailOnUnavailable);
    match import_tep_sets(&tep, 2).unwrap_err() {
        TepError::DataUnavailable(msg) => assert!(msg.contains("d01.dat")),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn checker_can_populate_the_folder() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().to_path_buf();
    let tep = TepDirectory::open(dir.path())
        .unwrap()
        .with_checker(move |availability: &Availability| -> tep_import::Result<()> {
            assert!(!availability.is_complete());
            for id in DataSetId::all() {
                let m = tagged(id.index(), 60);
                write_matrix(&target.join(id.training_file_name()), &m)?;
                write_matrix(&target.join(id.test_file_name()), &m)?;
            }
            Ok(())
        });

    let sets = tep.import_sets([21, 3], ImportOptions::default()).unwrap();
    assert_eq!(sets[0].label, "IDV(21)");
    assert_eq!(sets[1].training.as_ref().unwrap().dim(), (52, 60));
}

#[test]
fn loaded_matrices_have_more_samples_than_variables() {
    let dir = standard();
    let tep = open_dir(dir.path());
    for entry in tep
        .import_sets(vec![0], ImportOptions::default().unchecked())
        .unwrap()
    {
        for m in [entry.training.unwrap(), entry.test.unwrap()] {
            assert!(m.nrows() <= m.ncols());
            assert_eq!(m.nrows(), N_VARS);
        }
    }
}
