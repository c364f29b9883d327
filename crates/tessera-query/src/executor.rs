//! SPARQL evaluation over an entailed in-memory store

use crate::entailment::materialize;
use oxigraph::model::Term as OxTerm;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use tessera_core::{Graph, TesseraError, TesseraResult, Term};
use tessera_graph::ox;
use tracing::{debug, info};

/// Shown for variables a solution leaves unbound
pub const UNBOUND: &str = "N/A";

/// Result of one query
#[derive(Debug, Clone)]
pub enum QueryOutput {
    /// SELECT: variable names and one row of rendered cells per solution
    Solutions {
        variables: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    },
    /// ASK
    Boolean(bool),
    /// CONSTRUCT and DESCRIBE
    Graph(Graph),
}

impl QueryOutput {
    /// Number of solutions, statements, or 1 for ASK
    pub fn len(&self) -> usize {
        match self {
            Self::Solutions { rows, .. } => rows.len(),
            Self::Boolean(_) => 1,
            Self::Graph(graph) => graph.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render a cell: literals as their lexical form, IRIs bare, blank nodes as `_:id`
pub fn render_cell(cell: Option<&str>) -> &str {
    cell.unwrap_or(UNBOUND)
}

/// Answers queries against one graph under RDFS entailment
pub struct QueryEngine {
    store: Store,
}

impl QueryEngine {
    /// Materialize entailment over `graph` and load the result into a store
    pub fn new(graph: &Graph) -> TesseraResult<Self> {
        let entailed = materialize(graph);
        let store = Store::new().map_err(TesseraError::query)?;
        for triple in entailed.iter() {
            let quad = ox::to_quad(triple).map_err(TesseraError::query)?;
            store.insert(&quad).map_err(TesseraError::query)?;
        }
        debug!(triples = entailed.len(), "loaded query store");
        Ok(Self { store })
    }

    pub fn execute(&self, query: &str) -> TesseraResult<QueryOutput> {
        let results = self.store.query(query).map_err(TesseraError::query)?;
        let output = match results {
            QueryResults::Solutions(solutions) => {
                let variables: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                let vars = solutions.variables().to_vec();
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(TesseraError::query)?;
                    rows.push(vars.iter().map(|v| solution.get(v).map(render)).collect());
                }
                QueryOutput::Solutions { variables, rows }
            }
            QueryResults::Boolean(value) => QueryOutput::Boolean(value),
            QueryResults::Graph(triples) => {
                let mut graph = Graph::new();
                for triple in triples {
                    let triple = triple.map_err(TesseraError::query)?;
                    if let Some(triple) = ox::from_parts(triple.subject, triple.predicate, triple.object) {
                        graph.add(triple);
                    }
                }
                QueryOutput::Graph(graph)
            }
        };
        info!(results = output.len(), "query evaluated");
        Ok(output)
    }
}

/// Evaluate `query` against `graph` under RDFS entailment
pub fn execute(query: &str, graph: &Graph) -> TesseraResult<QueryOutput> {
    QueryEngine::new(graph)?.execute(query)
}

fn render(term: &OxTerm) -> String {
    match ox::from_term(term.clone()) {
        Some(Term::Literal(literal)) => literal.lexical().to_string(),
        Some(Term::Iri(iri)) => iri.into_string(),
        Some(Term::Blank(id)) => format!("_:{}", id),
        None => term.to_string(),
    }
}
