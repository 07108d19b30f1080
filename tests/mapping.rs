//! Mapping through the public API with the cdot JSON provider and a FASTA file.

use std::sync::Arc;

use hgvs_mapper::{
    data::{
        json::{Config as JsonConfig, Provider},
        seqfetcher::{self, Backend},
    },
    mapper::{
        variant::{Config, Mapper},
        Error,
    },
    variant::{
        Accession, CdsInterval, CdsLocEdit, CdsPos, GenomeInterval, GenomeLocEdit, HgvsVariant,
        Mu, NaEdit,
    },
};
use pretty_assertions::assert_eq;
use test_log::test;

fn build_mapper(config: &Config) -> Result<Mapper, Error> {
    let provider = Provider::new(&JsonConfig {
        json_paths: vec!["tests/data/cdot/transcripts.grch37.json".to_string()],
        seqfetcher: seqfetcher::Config {
            backend: Backend::Fasta {
                path: "tests/data/seqs/transcripts.fasta".to_string(),
            },
        },
    })?;
    Ok(Mapper::new(config, Arc::new(provider)))
}

fn ref_alt(reference: &str, alternative: &str) -> Mu<NaEdit> {
    Mu::Certain(NaEdit::RefAlt {
        reference: reference.to_string(),
        alternative: alternative.to_string(),
    })
}

#[test]
fn genome_to_protein() -> Result<(), Error> {
    let mapper = build_mapper(&Config {
        add_gene_symbol: true,
        ..Default::default()
    })?;
    let var_g = HgvsVariant::GenomeVariant {
        accession: Accession::new("NC_000001.10"),
        gene_symbol: None,
        loc_edit: GenomeLocEdit {
            loc: Mu::Certain(GenomeInterval {
                start: Some(10009),
                end: Some(10009),
            }),
            edit: ref_alt("A", "C"),
        },
    };

    let var_c = mapper.g_to_c(&var_g, "NM_TEST.1")?;
    assert_eq!(format!("{}", var_c), "NM_TEST.1(TEST):c.6A>C");
    let var_r = mapper.c_to_r(&var_c)?;
    assert_eq!(format!("{}", var_r), "NM_TEST.1(TEST):r.9A>C");
    assert_eq!(mapper.r_to_c(&var_r)?, var_c);
    assert_eq!(
        format!("{}", mapper.c_to_g(&var_c)?),
        "NC_000001.10(TEST):g.10009A>C"
    );

    let var_p = mapper.c_to_p(&var_c, Some("NP_TEST.1"))?;
    assert_eq!(format!("{}", var_p), "NP_TEST.1(TEST):p.Lys2Asn");

    Ok(())
}

#[test]
fn minus_strand_reverse_complements() -> Result<(), Error> {
    let mapper = build_mapper(&Default::default())?;
    let var_c = HgvsVariant::CdsVariant {
        accession: Accession::new("NM_001637.3"),
        gene_symbol: None,
        loc_edit: CdsLocEdit {
            loc: Mu::Certain(CdsInterval {
                start: CdsPos::new(1582),
                end: CdsPos::new(1582),
            }),
            edit: ref_alt("G", "A"),
        },
    };

    let var_g = mapper.c_to_g(&var_c)?;
    assert_eq!(format!("{}", var_g), "NC_000007.13:g.36561662C>T");
    assert_eq!(mapper.g_to_c(&var_g, "NM_001637.3")?, var_c);
    assert_eq!(mapper.cache().len(), 1);

    Ok(())
}
