use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};

/// Creates a random gapped alignment we can use for testing and benchmarking.
/// Each row is derived from a shared random backbone, so columns carry a realistic mix of conserved and variable residues.
/// # Arguments
/// * `alphabet` - the residues to draw from, e.g. b"ACGT"
/// * `num_rows` - the number of rows to generate
/// * `width` - the number of columns in every row
/// * `mutation_rate` - chance that a row differs from the backbone at a given column
/// * `gap_rate` - chance that a row has a gap at a given column
/// * `seed` - seed for the random generator, the same seed always gives the same alignment
pub fn generate_alignment(alphabet: &[u8], num_rows: usize, width: usize, mutation_rate: f64, gap_rate: f64, seed: u64) -> Vec<Vec<u8>> {
    assert!(!alphabet.is_empty());
    assert!((0.0..=1.0).contains(&mutation_rate));
    assert!((0.0..=1.0).contains(&gap_rate));

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let residue_distribution = Uniform::new(0, alphabet.len());
    let event_distribution = Uniform::new(0.0, 1.0);

    let backbone: Vec<u8> = (0..width)
        .map(|_i| alphabet[rng.sample(residue_distribution)])
        .collect();

    (0..num_rows)
        .map(|_i| {
            backbone.iter()
                .map(|&c| {
                    if rng.sample(event_distribution) < gap_rate {
                        b'-'
                    } else if rng.sample(event_distribution) < mutation_rate {
                        alphabet[rng.sample(residue_distribution)]
                    } else {
                        c
                    }
                })
                .collect()
        })
        .collect()
}
