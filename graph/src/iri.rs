//! IRI validation, local-name derivation and the prefix table.
//!
//! [`is_valid_iri`] is the guard used before any indexing or dereference. It
//! never fails loudly: anything that is not a syntactically valid absolute
//! IRI is simply rejected.

use indexmap::IndexMap;
use sophia_iri::Iri;

/// Reserved namespace for synthetic field nodes minted by the field registry.
///
/// No ingested triple may use a subject in this namespace.
pub const CUSTOM_FIELD_NAMESPACE: &str = "urn:custom-field:";

/// Returns `true` if `s` is a syntactically valid absolute IRI (RFC 3987,
/// with a scheme).
#[must_use]
pub fn is_valid_iri(s: &str) -> bool {
    !s.is_empty() && s.contains(':') && Iri::new(s).is_ok()
}

/// Returns `true` if `iri` lives in the reserved custom-field namespace.
#[must_use]
pub fn is_custom_field_iri(iri: &str) -> bool {
    iri.starts_with(CUSTOM_FIELD_NAMESPACE)
}

/// Derives the short display name of an IRI: the segment after the last
/// `#`, `/` or `:`. Trailing separators are skipped, so a namespace IRI
/// such as `http://www.w3.org/2002/07/owl#` yields `owl`.
#[must_use]
pub fn local_name(iri: &str) -> String {
    iri.rsplit(['#', '/', ':'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(iri)
        .to_owned()
}

/// Converts an arbitrary name into PascalCase, dropping non-alphanumerics.
#[must_use]
pub fn to_pascal_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut capitalize_next = true;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if capitalize_next {
                result.extend(ch.to_uppercase());
                capitalize_next = false;
            } else {
                result.push(ch);
            }
        } else {
            capitalize_next = true;
        }
    }

    result
}

/// Standard namespace and term IRIs consulted by the core.
pub mod iris {
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:Property`.
    pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
    /// `rdfs:Class`.
    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:domain`.
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:comment`.
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    /// `rdfs:Datatype`.
    pub const RDFS_DATATYPE: &str = "http://www.w3.org/2000/01/rdf-schema#Datatype";
    /// `rdfs:Literal`.
    pub const RDFS_LITERAL: &str = "http://www.w3.org/2000/01/rdf-schema#Literal";
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:Thing`.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:FunctionalProperty`.
    pub const OWL_FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";

    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:int`.
    pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    /// `xsd:long`.
    pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    /// `xsd:nonNegativeInteger`.
    pub const XSD_NON_NEGATIVE_INTEGER: &str =
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    /// `xsd:positiveInteger`.
    pub const XSD_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:float`.
    pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    /// `xsd:double`.
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}

/// Mapping from short prefix to namespace IRI.
///
/// Always contains the built-in `rdf`, `rdfs`, `owl` and `xsd` entries unless
/// a caller overrides them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes {
    map: IndexMap<String, String>,
}

impl Prefixes {
    /// The built-in prefix table.
    #[must_use]
    pub fn builtin() -> Self {
        let map = [
            ("rdf", iris::RDF),
            ("rdfs", iris::RDFS),
            ("owl", iris::OWL),
            ("xsd", iris::XSD),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        Self { map }
    }

    /// Built-in entries with `overrides` merged on top. On a key collision the
    /// caller's namespace wins.
    #[must_use]
    pub fn merged(overrides: &IndexMap<String, String>) -> Self {
        let mut prefixes = Self::builtin();
        for (prefix, namespace) in overrides {
            prefixes.map.insert(prefix.clone(), namespace.clone());
        }
        prefixes
    }

    /// Looks up the namespace bound to `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.map.get(prefix).map(String::as_str)
    }

    /// Iterates over `(prefix, namespace)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Finds the prefix whose namespace is the longest match for `iri`.
    #[must_use]
    pub fn prefix_of(&self, iri: &str) -> Option<(&str, &str)> {
        self.iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns))
            .max_by_key(|(_, ns)| ns.len())
    }

    /// Compacts `iri` into `prefix:local`, or returns it unchanged.
    #[must_use]
    pub fn compact(&self, iri: &str) -> String {
        match self.prefix_of(iri) {
            Some((prefix, ns)) => format!("{prefix}:{}", &iri[ns.len()..]),
            None => iri.to_owned(),
        }
    }

    /// Expands `prefix:local` into a full IRI. Returns `None` for an unknown
    /// prefix or a string without a colon.
    #[must_use]
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        self.get(prefix).map(|ns| format!("{ns}{local}"))
    }
}

impl Default for Prefixes {
    fn default() -> Self {
        Self::builtin()
    }
}
