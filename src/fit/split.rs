//! Deterministic train/test partitioning.
//!
//! - `n_test = ceil(test_fraction * n)`, the rest is training data
//! - unstratified: one seeded shuffle of all row indices, first `n_test` are test
//! - stratified: each class is shuffled on its own and contributes a test quota
//!   proportional to its size (largest remainder, ties to the smaller label)
//!
//! The same seed and input order always give the same partition.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::SplitConfig;
use crate::error::AppError;

/// Row indices of each partition, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

pub fn split_indices(labels: &[u8], config: &SplitConfig) -> Result<Partition, AppError> {
    let f = config.test_fraction;
    if !(f.is_finite() && f > 0.0 && f < 1.0) {
        return Err(AppError::input(format!(
            "Invalid test fraction {f}: must lie strictly between 0 and 1."
        )));
    }

    let n = labels.len();
    let n_test = (f * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(AppError::degenerate(format!(
            "Cannot split {n} rows with test fraction {f}: a partition would be empty."
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let (mut train, mut test) = if config.stratify {
        stratified(labels, n_test, &mut rng)
    } else {
        let mut idx: Vec<usize> = (0..n).collect();
        idx.shuffle(&mut rng);
        let train = idx.split_off(n_test);
        (train, idx)
    };

    train.sort_unstable();
    test.sort_unstable();
    Ok(Partition { train, test })
}

fn stratified(labels: &[u8], n_test: usize, rng: &mut StdRng) -> (Vec<usize>, Vec<usize>) {
    let n = labels.len();

    let mut classes: Vec<u8> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();

    let members: Vec<Vec<usize>> = classes
        .iter()
        .map(|&c| (0..n).filter(|&i| labels[i] == c).collect())
        .collect();

    let quotas = allocate(&members.iter().map(Vec::len).collect::<Vec<_>>(), n, n_test);

    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (mut idx, quota) in members.into_iter().zip(quotas) {
        idx.shuffle(rng);
        let rest = idx.split_off(quota);
        test.extend(idx);
        train.extend(rest);
    }
    (train, test)
}

/// Largest-remainder allocation of `total` across groups of size `sizes` (summing to `n`).
fn allocate(sizes: &[usize], n: usize, total: usize) -> Vec<usize> {
    let mut quotas: Vec<usize> = sizes.iter().map(|&s| total * s / n).collect();
    let assigned: usize = quotas.iter().sum();

    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = total * sizes[a] % n;
        let rb = total * sizes[b] % n;
        rb.cmp(&ra).then(a.cmp(&b))
    });

    for &g in order.iter().take(total - assigned) {
        quotas[g] += 1;
    }
    quotas
}
