use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::{Path, PathBuf};
use tessera_config::TesseraConfig;
use tessera_integrate::{integrate, EnrichmentOutcome, IntegrationRequest, IntegrationSummary};

/// Build a request from the positional surface:
/// `(<name> <file>){count} <identifying-property> <unified-class> <class>...`
pub fn parse_request(output: &Path, count: usize, args: &[String]) -> Result<IntegrationRequest> {
    if count == 0 {
        bail!("integrate needs at least one dataset");
    }
    let pairs = count * 2;
    if args.len() < pairs + 3 {
        bail!(
            "expected {} name/file pairs followed by an identifying property, a unified class \
             and at least one class to unify, got {} arguments",
            count,
            args.len()
        );
    }

    let datasets = args[..pairs]
        .chunks(2)
        .map(|pair| (pair[0].clone(), PathBuf::from(&pair[1])))
        .collect();

    Ok(IntegrationRequest {
        output: output.to_path_buf(),
        datasets,
        identifying_property: args[pairs].clone(),
        unified_class: args[pairs + 1].clone(),
        classes_to_unify: args[pairs + 2..].to_vec(),
    })
}

pub fn execute(config: &TesseraConfig, output: &Path, count: usize, args: &[String]) -> Result<()> {
    let request = parse_request(output, count, args)?;
    let summary = integrate(&request, &config.integrate)?;
    print_summary(&summary, output);
    Ok(())
}

fn print_summary(summary: &IntegrationSummary, output: &Path) {
    let stats = &summary.stats;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Graph", "Triples"]);
    for (name, triples) in &stats.datasets {
        table.add_row(vec![name.clone(), triples.to_string()]);
    }
    table.add_row(vec!["combined".to_string(), stats.combined_triples.to_string()]);
    println!("{table}");

    println!(
        "{} owl:sameAs links ({} pairs compared, {} skipped without identifying property)",
        stats.same_as, summary.matches.pairs_compared, summary.matches.skipped_missing_identifier
    );
    println!(
        "{} unified properties under {}; {} classes, {} properties declared",
        summary.unification.unified_properties(),
        summary.unification.unified_class,
        stats.classes,
        stats.properties
    );
    match &summary.enrichment {
        EnrichmentOutcome::Merged { path, added } => {
            println!("Merged {} triples from {}", added, path.display())
        }
        EnrichmentOutcome::NotFound { path } => {
            println!("No enrichment ontology at {}", path.display())
        }
    }
    println!("Wrote {}", output.display());
}
