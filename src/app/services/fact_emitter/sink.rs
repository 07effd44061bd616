//! Fact sinks
//!
//! The extraction engine only ever uses four primitives on its destination:
//! class assertion, data-property assertion, object-property assertion and a
//! final commit. All identifiers passed to a sink are absolute IRIs.

use crate::constants::namespaces;
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Typed literal value of a data property
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Double(f64),
    Float(f32),
    String(String),
    DateTimeStamp(DateTime<FixedOffset>),
}

impl Literal {
    /// Lexical form in XML Schema syntax
    pub fn lexical(&self) -> String {
        match self {
            Self::Double(v) => float_lexical(*v),
            Self::Float(v) if v.is_finite() => v.to_string(),
            Self::Float(v) => float_lexical(*v as f64),
            Self::String(s) => s.clone(),
            Self::DateTimeStamp(at) => at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Datatype IRI
    pub fn datatype(&self) -> String {
        let local = match self {
            Self::Double(_) => "double",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::DateTimeStamp(_) => "dateTimeStamp",
        };
        format!("{}{}", namespaces::XSD, local)
    }
}

fn float_lexical(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let text = if v > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else {
        format!("{}", v)
    }
}

/// Destination for asserted facts
pub trait FactSink {
    /// `individual rdf:type class`
    fn assert_class(&mut self, individual: &str, class: &str) -> Result<()>;

    /// `individual property "literal"^^datatype`
    fn assert_data_property(&mut self, individual: &str, property: &str, literal: &Literal)
    -> Result<()>;

    /// `subject property object`
    fn assert_object_property(&mut self, subject: &str, property: &str, object: &str) -> Result<()>;

    /// Make everything asserted so far durable
    fn commit(&mut self) -> Result<()>;
}

// =============================================================================
// N-Triples
// =============================================================================

/// Line-oriented N-Triples writer
pub struct NTriplesSink<W: Write> {
    writer: BufWriter<W>,
    triples_written: usize,
    rdf_type: String,
}

impl NTriplesSink<File> {
    /// Create (or truncate) the output file; each run rebuilds it from scratch
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io(format!("Failed to create output directory {}", parent.display()), e)
            })?;
        }

        let file = File::create(path).map_err(|e| {
            Error::sink(format!("Failed to create {}", path.display()), Some(e))
        })?;
        debug!("Writing N-Triples to {}", path.display());
        Ok(Self::new(file))
    }
}

impl<W: Write> NTriplesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            triples_written: 0,
            rdf_type: format!("{}type", namespaces::RDF),
        }
    }

    pub fn triples_written(&self) -> usize {
        self.triples_written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::sink("Failed to flush N-Triples output", Some(e.into_error())))
    }

    fn write_line(&mut self, line: String) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .map_err(|e| Error::sink("Failed to write triple", Some(e)))?;
        self.triples_written += 1;
        Ok(())
    }
}

impl<W: Write> FactSink for NTriplesSink<W> {
    fn assert_class(&mut self, individual: &str, class: &str) -> Result<()> {
        let line = format!("{} {} {} .\n", iri(individual), iri(&self.rdf_type), iri(class));
        self.write_line(line)
    }

    fn assert_data_property(
        &mut self,
        individual: &str,
        property: &str,
        literal: &Literal,
    ) -> Result<()> {
        let object = match literal {
            Literal::String(s) => format!("\"{}\"", escape_literal(s)),
            other => format!(
                "\"{}\"^^{}",
                escape_literal(&other.lexical()),
                iri(&other.datatype())
            ),
        };
        let line = format!("{} {} {} .\n", iri(individual), iri(property), object);
        self.write_line(line)
    }

    fn assert_object_property(&mut self, subject: &str, property: &str, object: &str) -> Result<()> {
        let line = format!("{} {} {} .\n", iri(subject), iri(property), iri(object));
        self.write_line(line)
    }

    fn commit(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::sink("Failed to flush N-Triples output", Some(e)))?;
        debug!("Committed {} triples", self.triples_written);
        Ok(())
    }
}

/// `<iri>` with characters outside the IRIREF production escaped as `\uXXXX`
fn iri(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('<');
    for c in value.chars() {
        match c {
            '\u{00}'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out.push('>');
    out
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// In-memory
// =============================================================================

/// Object position of a stored triple
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Iri(String),
    Literal(Literal),
}

impl Object {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Iri(_) => None,
            Self::Literal(literal) => Some(literal),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

/// Sink keeping every assertion in memory, used for dry runs and inspection
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    triples: Vec<Triple>,
    commits: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    /// Objects of all triples with the given subject and predicate
    pub fn objects(&self, subject: &str, predicate: &str) -> Vec<&Object> {
        self.triples
            .iter()
            .filter(|t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
            .collect()
    }

    /// Subjects asserted as instances of a class
    pub fn instances_of(&self, class: &str) -> Vec<&str> {
        let rdf_type = format!("{}type", namespaces::RDF);
        self.triples
            .iter()
            .filter(|t| t.predicate == rdf_type && t.object.as_iri() == Some(class))
            .map(|t| t.subject.as_str())
            .collect()
    }
}

impl FactSink for MemorySink {
    fn assert_class(&mut self, individual: &str, class: &str) -> Result<()> {
        self.triples.push(Triple {
            subject: individual.to_string(),
            predicate: format!("{}type", namespaces::RDF),
            object: Object::Iri(class.to_string()),
        });
        Ok(())
    }

    fn assert_data_property(
        &mut self,
        individual: &str,
        property: &str,
        literal: &Literal,
    ) -> Result<()> {
        self.triples.push(Triple {
            subject: individual.to_string(),
            predicate: property.to_string(),
            object: Object::Literal(literal.clone()),
        });
        Ok(())
    }

    fn assert_object_property(&mut self, subject: &str, property: &str, object: &str) -> Result<()> {
        self.triples.push(Triple {
            subject: subject.to_string(),
            predicate: property.to_string(),
            object: Object::Iri(object.to_string()),
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }
}
