use serde::{Deserialize, Serialize};

/// Complete tessera configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TesseraConfig {
    /// Settings for the `csv` export
    pub export: ExportConfig,

    /// Settings for the `integrate` run
    pub integrate: IntegrateConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Base under which each exported type gets its own namespace by default
pub const DEFAULT_BASE_IRI: &str = "http://example.org/";

/// Namespace used for IRIs minted by the exporter
///
/// Both settings fall back to values derived from the exported type name, so
/// datasets exported with default settings never share a namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Short prefix name written in `@prefix` declarations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Namespace IRI bound to `prefix`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_iri: Option<String>,
}

impl ExportConfig {
    /// The configured prefix, else the lowercased type name
    pub fn prefix_for(&self, type_name: &str) -> String {
        match &self.prefix {
            Some(prefix) => prefix.clone(),
            None => type_name.to_lowercase(),
        }
    }

    /// The configured namespace, else `http://example.org/<type>/`
    pub fn namespace_for(&self, type_name: &str) -> String {
        match &self.base_iri {
            Some(base) => base.clone(),
            None => format!("{}{}/", DEFAULT_BASE_IRI, type_name.to_lowercase()),
        }
    }
}

/// Where the unified vocabulary lives and where enrichment is looked up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrateConfig {
    /// Namespace for the unified class and properties
    pub unified_namespace: String,

    /// Prefix name bound to `unified_namespace` in the combined graph
    pub unified_prefix: String,

    /// File name of the sibling ontology merged next to the output target
    pub enrichment_file: String,

    /// Relationship properties declared in the unified namespace
    pub relations: Vec<RelationConfig>,
}

/// A cross-dataset relationship property
///
/// ```toml
/// [[integrate.relations]]
/// name = "hasSimilarRating"
/// comment = "Indicates films with similar ratings"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RelationConfig {
    /// Local name in the unified namespace
    pub name: String,

    /// Text of the `rdfs:comment` annotation
    #[serde(default)]
    pub comment: Option<String>,
}

impl Default for IntegrateConfig {
    fn default() -> Self {
        Self {
            unified_namespace: default_unified_namespace(),
            unified_prefix: "unified".to_string(),
            enrichment_file: "ontology.ttl".to_string(),
            relations: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level directive: off, error, warn, info, debug, trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

fn default_unified_namespace() -> String {
    "http://example.org/unified/".to_string()
}
