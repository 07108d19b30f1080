use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use hgvs_mapper::{
    data::{
        json::{Config as JsonConfig, Provider},
        seqfetcher::{self, Backend},
    },
    mapper::variant::{Config, Mapper},
    sequences::translate_cds,
    variant::{
        Accession, CdsInterval, CdsLocEdit, CdsPos, GenomeInterval, GenomeLocEdit, HgvsVariant,
        Mu, NaEdit,
    },
};

lazy_static::lazy_static! {
    /// Synthetic coding sequence of roughly the size of TTN.
    static ref SEQ_CDS: String = {
        let mut seq = String::from("ATG");
        for _ in 0..35_000 {
            seq.push_str("GCTAAACGTTCC");
        }
        seq.push_str("TAA");
        seq
    };
}

fn build_mapper() -> Mapper {
    let provider = Provider::new(&JsonConfig {
        json_paths: vec!["tests/data/cdot/transcripts.grch37.json".to_string()],
        seqfetcher: seqfetcher::Config {
            backend: Backend::Fasta {
                path: "tests/data/seqs/transcripts.fasta".to_string(),
            },
        },
    })
    .expect("could not load test data");
    Mapper::new(&Config::default(), Arc::new(provider))
}

fn ref_alt(reference: &str, alternative: &str) -> Mu<NaEdit> {
    Mu::Certain(NaEdit::RefAlt {
        reference: reference.to_string(),
        alternative: alternative.to_string(),
    })
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("translate_cds synthetic", |b| {
        b.iter(|| translate_cds(&SEQ_CDS, true, "*").unwrap())
    });

    let mapper = build_mapper();
    let var_g = HgvsVariant::GenomeVariant {
        accession: Accession::new("NC_000007.13"),
        gene_symbol: None,
        loc_edit: GenomeLocEdit {
            loc: Mu::Certain(GenomeInterval {
                start: Some(36561662),
                end: Some(36561662),
            }),
            edit: ref_alt("C", "T"),
        },
    };
    c.bench_function("g_to_c NM_001637.3", |b| {
        b.iter(|| mapper.g_to_c(&var_g, "NM_001637.3").unwrap())
    });

    let var_c = HgvsVariant::CdsVariant {
        accession: Accession::new("NM_TEST.1"),
        gene_symbol: None,
        loc_edit: CdsLocEdit {
            loc: Mu::Certain(CdsInterval {
                start: CdsPos::new(6),
                end: CdsPos::new(6),
            }),
            edit: ref_alt("A", "C"),
        },
    };
    c.bench_function("c_to_p NM_TEST.1", |b| {
        b.iter(|| mapper.c_to_p(&var_c, None).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
