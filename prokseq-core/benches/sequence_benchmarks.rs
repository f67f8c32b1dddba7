use bio::bio_types::strand::Strand;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use prokseq_core::rbs::scan_upstream;
use prokseq_core::sequence::encoded::EncodedSequence;
use prokseq_core::sequence::{KmerBackground, PackedSequence, calc_most_gc_frame};
use prokseq_core::types::RbsWeights;

use criterion_config::configure_criterion;

const SEQUENCE_LENGTHS: [usize; 3] = [10_000, 100_000, 1_000_000];

// Mixed-composition genome stand-in: a few codon-rich blocks with an
// occasional ambiguous base so every encoding path is taken
fn synthetic_genome(length: usize) -> Vec<u8> {
    const BLOCK: &[u8] =
        b"ATGAAACGCATTAGCACCACCATTACCACCACCATCACCATTACCACAGGTAACGGTGCGGGCTGANAGGAGGTTTTTTTATG";
    BLOCK.iter().cycle().take(length).copied().collect()
}

fn benchmark_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    for length in SEQUENCE_LENGTHS {
        let genome = synthetic_genome(length);
        group.throughput(Throughput::Bytes(length as u64));

        group.bench_with_input(BenchmarkId::new("packed", length), &genome, |b, genome| {
            b.iter(|| PackedSequence::from_ascii(black_box(genome)));
        });

        group.bench_with_input(
            BenchmarkId::new("both_strands", length),
            &genome,
            |b, genome| {
                b.iter(|| EncodedSequence::with_masking(black_box(genome)));
            },
        );
    }

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for length in SEQUENCE_LENGTHS {
        let Ok(encoded) = EncodedSequence::without_masking(&synthetic_genome(length)) else {
            eprintln!("Warning: could not encode {length} bp, skipping");
            continue;
        };
        group.throughput(Throughput::Bytes(length as u64));

        group.bench_with_input(BenchmarkId::new("gc_frame", length), &encoded, |b, encoded| {
            b.iter(|| calc_most_gc_frame(black_box(encoded.forward()), 120));
        });

        group.bench_with_input(
            BenchmarkId::new("dicodon_background", length),
            &encoded,
            |b, encoded| {
                b.iter(|| KmerBackground::build(black_box(encoded), 6));
            },
        );
    }

    group.finish();
}

fn benchmark_rbs_scan(c: &mut Criterion) {
    let encoded = match EncodedSequence::without_masking(&synthetic_genome(100_000)) {
        Ok(encoded) => encoded,
        Err(e) => {
            eprintln!("Warning: {e}, skipping RBS benchmark");
            return;
        }
    };
    let weights: RbsWeights = std::array::from_fn(|i| i as f64 / 4.0);
    let starts: Vec<usize> = (0..encoded.len())
        .filter(|&i| encoded.forward().is_atg(i))
        .collect();

    let mut group = c.benchmark_group("rbs");
    group.throughput(Throughput::Elements(starts.len() as u64));
    group.bench_function("scan_forward_starts", |b| {
        b.iter(|| {
            starts
                .iter()
                .filter_map(|&start| {
                    scan_upstream(black_box(&encoded), start, Strand::Forward, &weights)
                })
                .count()
        });
    });
    group.finish();
}

criterion_group!(
    name = benches;
    config = configure_criterion();
    targets = benchmark_encoding,
    benchmark_statistics,
    benchmark_rbs_scan
);
criterion_main!(benches);
