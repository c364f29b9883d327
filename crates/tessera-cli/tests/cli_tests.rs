//! End-to-end runs of the `tessera` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r#"
name = "ImdbFilm"
identifier = "name"

[[fields]]
name = "name"
kind = "string"

[[fields]]
name = "date"
kind = "integer"
ignore = "No Rate"

[[fields]]
name = "director"
kind = "string"
"#;

const CSV: &str = "\
name,date,director
Heat,1995,Michael Mann
Alien,No Rate,Ridley Scott
";

const TMDB: &str = r#"@prefix tmdb: <http://www.tmdb.org/> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

tmdb:TmdbFilm a rdfs:Class .
tmdb:name a rdf:Property .
tmdb:name rdfs:domain tmdb:TmdbFilm .
tmdb:name rdfs:range rdfs:Literal .
tmdb:42 a tmdb:TmdbFilm .
tmdb:42 tmdb:name "HEAT" .
"#;

/// Binary with a config file in `dir` so the user's own settings never leak in
fn tessera(dir: &Path) -> Command {
    let config = dir.join("config.toml");
    if !config.exists() {
        fs::write(
            &config,
            "[export]\nprefix = \"imdb\"\nbase_iri = \"http://www.imdb.org/\"\n",
        )
        .unwrap();
    }
    let mut cmd = Command::cargo_bin("tessera").unwrap();
    cmd.env_remove("TESSERA_CONFIG")
        .env_remove("TESSERA_LOG")
        .env_remove("TESSERA_PREFIX")
        .env_remove("TESSERA_BASE_IRI")
        .env_remove("TESSERA_UNIFIED_NAMESPACE")
        .arg("--config")
        .arg(&config);
    cmd
}

fn export_imdb(temp: &TempDir) -> std::path::PathBuf {
    let dir = temp.path();
    fs::write(dir.join("imdb.toml"), SCHEMA).unwrap();
    fs::write(dir.join("imdb.csv"), CSV).unwrap();
    let output = dir.join("imdb.ttl");

    tessera(dir)
        .arg("csv")
        .arg(dir.join("imdb.csv"))
        .arg(dir.join("imdb.toml"))
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 ImdbFilm records"));
    output
}

#[test]
fn test_help_lists_verbs() {
    Command::cargo_bin("tessera")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("csv"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("integrate"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("request"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn test_version() {
    Command::cargo_bin("tessera")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_csv_exports_turtle() {
    let temp = TempDir::new().unwrap();
    let output = export_imdb(&temp);

    let turtle = fs::read_to_string(output).unwrap();
    assert!(turtle.starts_with("@prefix imdb: <http://www.imdb.org/> ."));
    assert!(turtle.contains("imdb:Heat a imdb:ImdbFilm .\n"));
    assert!(turtle.contains("imdb:Heat imdb:date 1995 .\n"));
    assert!(turtle.contains("imdb:Heat imdb:director \"Michael Mann\" .\n"));
    // the sentinel leaves the field unset
    assert!(!turtle.contains("imdb:Alien imdb:date"));
}

#[test]
fn test_csv_counter_and_prefix_flags() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("imdb.toml"), SCHEMA).unwrap();
    fs::write(dir.join("imdb.csv"), CSV).unwrap();
    let output = dir.join("films.ttl");

    tessera(dir)
        .arg("csv")
        .arg(dir.join("imdb.csv"))
        .arg(dir.join("imdb.toml"))
        .arg(&output)
        .args(["--prefix", "film", "--base-iri", "http://films.example/", "--counter"])
        .assert()
        .success();

    let turtle = fs::read_to_string(output).unwrap();
    assert!(turtle.contains("@prefix film: <http://films.example/> ."));
    assert!(turtle.contains("film:1 a film:ImdbFilm .\n"));
    assert!(turtle.contains("film:2 film:name \"Alien\" .\n"));
}

#[test]
fn test_csv_bad_value_fails_with_location() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("imdb.toml"), SCHEMA).unwrap();
    fs::write(dir.join("imdb.csv"), "name,date,director\nHeat,soon,Michael Mann\n").unwrap();

    tessera(dir)
        .arg("csv")
        .arg(dir.join("imdb.csv"))
        .arg(dir.join("imdb.toml"))
        .arg(dir.join("imdb.ttl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("soon"));
    assert!(!dir.join("imdb.ttl").exists());
}

#[test]
fn test_convert_with_prefix_map() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(
        dir.join("data.nt"),
        "<http://www.imdb.org/Heat> <http://www.imdb.org/name> \"Heat\" .\n",
    )
    .unwrap();
    fs::write(dir.join("prefixes.csv"), "# short,full\nimdb,http://www.imdb.org/\n").unwrap();
    let output = dir.join("data.ttl");

    tessera(dir)
        .arg("convert")
        .arg(dir.join("data.nt"))
        .arg(dir.join("prefixes.csv"))
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 triples"));

    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "@prefix imdb: <http://www.imdb.org/> .\n\nimdb:Heat imdb:name \"Heat\" .\n"
    );
}

#[test]
fn test_integrate_and_query_end_to_end() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let imdb = export_imdb(&temp);
    fs::write(dir.join("tmdb.ttl"), TMDB).unwrap();
    let combined = dir.join("combined.ttl");

    tessera(dir)
        .arg("integrate")
        .arg(&combined)
        .arg("2")
        .arg("imdb")
        .arg(&imdb)
        .arg("tmdb")
        .arg(dir.join("tmdb.ttl"))
        .args(["name", "Film", "ImdbFilm", "TmdbFilm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("combined"))
        .stdout(predicate::str::contains("1 owl:sameAs links"))
        .stdout(predicate::str::contains("No enrichment ontology"));

    let turtle = fs::read_to_string(&combined).unwrap();
    assert!(turtle.contains("imdb:Heat owl:sameAs tmdb:42 .\n"));

    fs::write(
        dir.join("films.rq"),
        "SELECT ?film ?name WHERE { ?film a <http://example.org/unified/Film> . \
         ?film <http://example.org/unified/name> ?name } ORDER BY ?name",
    )
    .unwrap();

    tessera(dir)
        .arg("query")
        .arg(dir.join("films.rq"))
        .arg(&combined)
        .assert()
        .success()
        .stdout(predicate::str::contains("http://www.tmdb.org/42"))
        .stdout(predicate::str::contains("Alien"))
        .stdout(predicate::str::contains("3 results"));
}

#[test]
fn test_integrate_rejects_mismatched_count() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    tessera(dir)
        .arg("integrate")
        .arg(dir.join("combined.ttl"))
        .arg("3")
        .args(["imdb", "imdb.ttl", "name", "Film", "ImdbFilm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 3 name/file pairs"));
    assert!(!dir.join("combined.ttl").exists());
}

#[test]
fn test_query_prints_na_for_unbound() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let imdb = export_imdb(&temp);
    fs::write(
        dir.join("dates.rq"),
        "SELECT ?name ?date WHERE { ?film <http://www.imdb.org/name> ?name . \
         OPTIONAL { ?film <http://www.imdb.org/date> ?date } } ORDER BY ?name",
    )
    .unwrap();

    tessera(dir)
        .arg("query")
        .arg(dir.join("dates.rq"))
        .arg(&imdb)
        .assert()
        .success()
        .stdout(predicate::str::contains("N/A"))
        .stdout(predicate::str::contains("1995"));
}

#[test]
fn test_malformed_query_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let imdb = export_imdb(&temp);
    fs::write(dir.join("bad.rq"), "SELEKT ?x").unwrap();

    tessera(dir)
        .arg("query")
        .arg(dir.join("bad.rq"))
        .arg(&imdb)
        .assert()
        .failure();
}

#[test]
fn test_default_config_keeps_datasets_apart() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("config.toml"), "").unwrap();

    for (type_name, title) in [("Foo", "Star Wars"), ("Bar", "star wars!")] {
        let stem = type_name.to_lowercase();
        fs::write(
            dir.join(format!("{stem}.toml")),
            format!("name = \"{type_name}\"\n\n[[fields]]\nname = \"name\"\nkind = \"string\"\n"),
        )
        .unwrap();
        fs::write(dir.join(format!("{stem}.csv")), format!("name\n{title}\n")).unwrap();
        tessera(dir)
            .arg("csv")
            .arg(dir.join(format!("{stem}.csv")))
            .arg(dir.join(format!("{stem}.toml")))
            .arg(dir.join(format!("{stem}.ttl")))
            .assert()
            .success();
    }

    let foo = fs::read_to_string(dir.join("foo.ttl")).unwrap();
    assert!(foo.contains("@prefix foo: <http://example.org/foo/> .\n"));

    let combined = dir.join("combined.ttl");
    tessera(dir)
        .arg("integrate")
        .arg(&combined)
        .arg("2")
        .arg("foo")
        .arg(dir.join("foo.ttl"))
        .arg("bar")
        .arg(dir.join("bar.ttl"))
        .args(["name", "Thing", "Foo", "Bar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 owl:sameAs links"));

    let turtle = fs::read_to_string(&combined).unwrap();
    assert!(turtle.contains("foo:1 owl:sameAs bar:1 .\n"));
    assert!(turtle.contains("foo:name rdfs:subPropertyOf unified:name .\n"));
    assert!(turtle.contains("bar:name rdfs:subPropertyOf unified:name .\n"));
    assert_eq!(turtle.matches(" rdfs:subPropertyOf ").count(), 2);
    assert_eq!(turtle.matches(" owl:sameAs ").count(), 1);
}

#[test]
fn test_relative_output_named_like_enrichment_is_not_merged() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let imdb = export_imdb(&temp);
    fs::write(dir.join("tmdb.ttl"), TMDB).unwrap();
    fs::write(dir.join("ontology.ttl"), "this is not turtle").unwrap();

    tessera(dir)
        .current_dir(dir)
        .arg("integrate")
        .arg("ontology.ttl")
        .arg("2")
        .arg("imdb")
        .arg(&imdb)
        .arg("tmdb")
        .arg(dir.join("tmdb.ttl"))
        .args(["name", "Film", "ImdbFilm", "TmdbFilm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No enrichment ontology"));
}

#[test]
fn test_integrate_unified_namespace_flag() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let imdb = export_imdb(&temp);
    fs::write(dir.join("tmdb.ttl"), TMDB).unwrap();
    let combined = dir.join("combined.ttl");

    tessera(dir)
        .arg("integrate")
        .arg("--unified-namespace")
        .arg("http://films.org/")
        .arg(&combined)
        .arg("2")
        .arg("imdb")
        .arg(&imdb)
        .arg("tmdb")
        .arg(dir.join("tmdb.ttl"))
        .args(["name", "Film", "ImdbFilm", "TmdbFilm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://films.org/Film"));

    let turtle = fs::read_to_string(&combined).unwrap();
    assert!(turtle.contains("@prefix unified: <http://films.org/> .\n"));
    assert!(turtle.contains("imdb:ImdbFilm rdfs:subClassOf unified:Film .\n"));
}

#[test]
fn test_clean_repairs_dump() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(
        dir.join("dump.nt"),
        "<http://data.linkedmdb.org/resource/film/38> <http://www.w3.org/2000/01/rdf-schema#label> \"Heat\" .\n\
         <http://data.linkedmdb.org/resource/film/40 cut> <http://www.w3.org/2000/01/rdf-schema#label> \"Heat (cut)\" .\n",
    )
    .unwrap();
    let output = dir.join("dump.ttl");

    tessera(dir)
        .arg("clean")
        .arg(dir.join("dump.nt"))
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("http://data.linkedmdb.org/resource/film/"))
        .stdout(predicate::str::contains("1 repaired, 0 skipped"))
        .stdout(predicate::str::contains("wrote 2 triples"));

    let turtle = fs::read_to_string(&output).unwrap();
    assert!(turtle.contains("film:38 rdfs:label \"Heat\" .\n"));
    assert!(turtle.contains("<http://data.linkedmdb.org/resource/film/40%20cut>"));
}

#[test]
fn test_request_saves_construct_result() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/sparql")
        .match_header("content-type", "application/sparql-query")
        .with_status(200)
        .with_header("content-type", "text/turtle")
        .with_body("<http://dbpedia.org/resource/Heat> <http://www.w3.org/2000/01/rdf-schema#label> \"Heat\" .\n")
        .create();

    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("films.rq"), "CONSTRUCT WHERE { ?s ?p ?o } LIMIT 1").unwrap();
    let output = dir.join("films.ttl");

    tessera(dir)
        .arg("request")
        .arg(format!("{}/sparql", server.url()))
        .arg(dir.join("films.rq"))
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 1 triples"));
    assert!(fs::read_to_string(&output).unwrap().contains("\"Heat\""));
}

#[test]
fn test_request_failure_writes_nothing() {
    let mut server = mockito::Server::new();
    server.mock("POST", "/sparql").with_status(503).create();

    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    fs::write(dir.join("films.rq"), "CONSTRUCT WHERE { ?s ?p ?o }").unwrap();

    tessera(dir)
        .arg("request")
        .arg(format!("{}/sparql", server.url()))
        .arg(dir.join("films.rq"))
        .arg(dir.join("films.ttl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("503"));
    assert!(!dir.join("films.ttl").exists());
}
