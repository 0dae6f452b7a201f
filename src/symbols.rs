//! Symbol model for the Cancellation Analysis rule
//!
//! This module provides the resolved-signature data model the analysis
//! engine consumes: type identities, parameter descriptors, method
//! signatures, and the type universe used for marker type resolution.
//! Symbol models are supplied by a host (compiler, language server, or a
//! serialized symbol dump) and are never parsed from source text here.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identity of a type within one analysis run.
///
/// Two identities are equal when their canonical fully-qualified names and
/// generic arities match. Nullability annotations (a trailing `?` on the
/// written name) and the spelling of generic arguments are normalization
/// metadata stripped at construction and never participate in equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TypeIdentity {
    /// Canonical fully-qualified name, e.g. `System.Threading.CancellationToken`
    canonical_name: String,
    /// Number of generic type parameters (0 for non-generic types)
    generic_arity: usize,
}

impl TypeIdentity {
    /// Parse a written type name into its canonical identity.
    ///
    /// Accepts source-style generics (`List<String>`), metadata-style arity
    /// markers (`` List`1 ``), and nullability suffixes (`Token?`).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim().trim_end_matches('?');

        if let Some(open) = trimmed.find('<') {
            let canonical = trimmed[..open].trim_end().to_string();
            let arity = count_generic_arguments(&trimmed[open..]);
            return Self {
                canonical_name: canonical,
                generic_arity: arity,
            };
        }

        if let Some((name, arity)) = trimmed.rsplit_once('`') {
            if let Ok(arity) = arity.parse::<usize>() {
                return Self {
                    canonical_name: name.to_string(),
                    generic_arity: arity,
                };
            }
        }

        Self {
            canonical_name: trimmed.to_string(),
            generic_arity: 0,
        }
    }

    /// The canonical fully-qualified name
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// The generic arity (0 for non-generic types)
    pub fn generic_arity(&self) -> usize {
        self.generic_arity
    }
}

/// Count top-level generic arguments inside a `<...>` segment
fn count_generic_arguments(segment: &str) -> usize {
    let mut depth = 0usize;
    let mut args = 0usize;
    for ch in segment.chars() {
        match ch {
            '<' => {
                depth += 1;
                if depth == 1 {
                    args = 1;
                }
            }
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 1 => args += 1,
            _ => {}
        }
    }
    args
}

impl From<String> for TypeIdentity {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TypeIdentity> for String {
    fn from(identity: TypeIdentity) -> Self {
        identity.to_string()
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic_arity > 0 {
            write!(f, "{}`{}", self.canonical_name, self.generic_arity)
        } else {
            write!(f, "{}", self.canonical_name)
        }
    }
}

/// Source location usable for diagnostic anchoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Source file path as reported by the host
    pub file: String,
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One ordered element of a method's parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name as written in the declaration (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity of the parameter's declared type
    #[serde(rename = "type")]
    pub param_type: TypeIdentity,
    /// True for a variadic (`params`-style) parameter; by grammar only
    /// valid on the final parameter of a well-formed signature
    #[serde(default, rename = "variadic", skip_serializing_if = "is_false")]
    pub is_variadic: bool,
}

fn is_false(value: &bool) -> bool {
    !value
}

impl ParameterDescriptor {
    /// Create a parameter descriptor for the given type
    pub fn new(param_type: TypeIdentity) -> Self {
        Self {
            name: None,
            param_type,
            is_variadic: false,
        }
    }

    /// Create a descriptor from a written type name
    pub fn of_type(raw_type: &str) -> Self {
        Self::new(TypeIdentity::parse(raw_type))
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the parameter as variadic
    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }
}

/// One analyzable method declaration: an ordered parameter list plus a
/// display name and declaration location. Immutable once constructed and
/// owned by the symbol provider for the duration of an evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Human-readable fully-qualified display name
    #[serde(rename = "name")]
    pub display_name: String,
    /// Declaration location
    pub location: SourceLocation,
    /// Ordered parameter list
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl MethodSignature {
    /// Create a method signature with an empty parameter list
    pub fn new(display_name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            display_name: display_name.into(),
            location,
            parameters: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append multiple parameters
    pub fn with_parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = ParameterDescriptor>,
    {
        self.parameters.extend(parameters);
        self
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.display_name)?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if parameter.is_variadic {
                write!(f, "params ")?;
            }
            write!(f, "{}", parameter.param_type)?;
        }
        write!(f, ")")
    }
}

/// The set of types known to one analysis run.
///
/// Marker type resolution happens once per run against this universe; the
/// resolved identity is an immutable value that may be shared read-only
/// across concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    types: HashSet<TypeIdentity>,
}

impl TypeUniverse {
    /// Create an empty type universe
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type by its written name
    pub fn register(&mut self, raw: &str) {
        self.types.insert(TypeIdentity::parse(raw));
    }

    /// Register a resolved identity directly
    pub fn register_identity(&mut self, identity: TypeIdentity) {
        self.types.insert(identity);
    }

    /// Resolve a type by fully-qualified name.
    ///
    /// Returns `None` when the type is absent from this universe; callers
    /// treat that as a disabled-rule precondition, not an error.
    pub fn resolve(&self, fully_qualified_name: &str) -> Option<TypeIdentity> {
        let identity = TypeIdentity::parse(fully_qualified_name);
        self.types.contains(&identity).then_some(identity)
    }

    /// Number of known types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Source of analyzable method declarations for one compilation scope
pub trait SymbolProvider {
    /// Name of the compilation scope, if the host supplies one
    fn unit_name(&self) -> Option<&str>;

    /// Declared methods in this scope, in declaration order
    fn methods(&self) -> &[MethodSignature];
}

/// Serialized symbol model for one compilation scope.
///
/// This is the crate's stand-in for a host compiler's symbol table: the
/// declared type names plus every analyzable method signature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolModel {
    /// Compilation unit name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Types declared by or referenced from this scope
    #[serde(default)]
    pub types: Vec<String>,
    /// Analyzable method declarations
    #[serde(default)]
    pub methods: Vec<MethodSignature>,
}

impl SymbolModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unit name
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Declare a known type
    pub fn with_type(mut self, raw: impl Into<String>) -> Self {
        self.types.push(raw.into());
        self
    }

    /// Add a method declaration
    pub fn with_method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    /// Build the type universe for this model.
    ///
    /// The universe is the declared type list unioned with every parameter
    /// type the model references; a type a signature mentions is part of
    /// the compilation whether or not it was listed explicitly.
    pub fn universe(&self) -> TypeUniverse {
        let mut universe = TypeUniverse::new();
        for raw in &self.types {
            universe.register(raw);
        }
        for method in &self.methods {
            for parameter in &method.parameters {
                universe.register_identity(parameter.param_type.clone());
            }
        }
        universe
    }
}

impl SymbolProvider for SymbolModel {
    fn unit_name(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_identity_nullability_is_ignored() {
        let plain = TypeIdentity::parse("System.Threading.CancellationToken");
        let nullable = TypeIdentity::parse("System.Threading.CancellationToken?");
        assert_eq!(plain, nullable);
    }

    #[test]
    fn test_type_identity_generic_arity() {
        let list = TypeIdentity::parse("System.Collections.Generic.List<System.String>");
        assert_eq!(list.canonical_name(), "System.Collections.Generic.List");
        assert_eq!(list.generic_arity(), 1);

        let map = TypeIdentity::parse(
            "System.Collections.Generic.Dictionary<System.String, System.Collections.Generic.List<System.Int32>>",
        );
        assert_eq!(map.generic_arity(), 2);
    }

    #[test]
    fn test_type_identity_metadata_arity_form() {
        let source_style = TypeIdentity::parse("System.Collections.Generic.List<T>");
        let metadata_style = TypeIdentity::parse("System.Collections.Generic.List`1");
        assert_eq!(source_style, metadata_style);
    }

    #[test]
    fn test_type_identity_arity_mismatch_is_unequal() {
        let one = TypeIdentity::parse("Wrapper`1");
        let two = TypeIdentity::parse("Wrapper`2");
        assert_ne!(one, two);
    }

    #[test]
    fn test_generic_wrapper_is_not_the_inner_type() {
        let token = TypeIdentity::parse("System.Threading.CancellationToken");
        let wrapped = TypeIdentity::parse("Wrapper<System.Threading.CancellationToken>");
        assert_ne!(token, wrapped);
    }

    #[test]
    fn test_location_display() {
        let location = SourceLocation::new("src/service.cs", 42, 5);
        assert_eq!(location.to_string(), "src/service.cs:42:5");
    }

    #[test]
    fn test_universe_resolution() {
        let mut universe = TypeUniverse::new();
        universe.register("System.Threading.CancellationToken");

        assert!(universe
            .resolve("System.Threading.CancellationToken")
            .is_some());
        assert!(universe.resolve("System.String").is_none());
    }

    #[test]
    fn test_model_universe_includes_parameter_types() {
        let model = SymbolModel::new().with_method(
            MethodSignature::new("App.Service.Run", SourceLocation::new("svc.cs", 1, 1))
                .with_parameter(ParameterDescriptor::of_type("System.Int32")),
        );

        let universe = model.universe();
        assert!(universe.resolve("System.Int32").is_some());
    }

    #[test]
    fn test_model_from_json() {
        let json = r#"{
            "unit": "App",
            "types": ["System.Threading.CancellationToken"],
            "methods": [
                {
                    "name": "App.Service.Run",
                    "location": { "file": "svc.cs", "line": 3, "column": 17 },
                    "parameters": [
                        { "name": "ct", "type": "System.Threading.CancellationToken" },
                        { "name": "retries", "type": "System.Int32" }
                    ]
                }
            ]
        }"#;

        let model: SymbolModel = serde_json::from_str(json).expect("model parses");
        assert_eq!(model.unit_name(), Some("App"));
        assert_eq!(model.methods().len(), 1);
        assert_eq!(model.methods()[0].parameters.len(), 2);
        assert_eq!(
            model.methods()[0].parameters[0].param_type,
            TypeIdentity::parse("System.Threading.CancellationToken")
        );
        assert!(!model.methods()[0].parameters[0].is_variadic);
    }

    #[test]
    fn test_signature_display() {
        let signature =
            MethodSignature::new("App.Service.Run", SourceLocation::new("svc.cs", 1, 1))
                .with_parameter(ParameterDescriptor::of_type("System.Int32"))
                .with_parameter(ParameterDescriptor::of_type("System.Object[]").variadic());

        assert_eq!(
            signature.to_string(),
            "App.Service.Run(System.Int32, params System.Object[])"
        );
    }
}
