use std::fmt;

use itertools::Itertools as _;

use crate::{
    ast::Definition,
    executor::Fragments,
    parser::SourcePosition,
    schema::model::SchemaType,
};

/// Query validation error
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RuleError {
    locations: Vec<SourcePosition>,
    message: String,
}

impl RuleError {
    #[doc(hidden)]
    pub fn new(message: &str, locations: &[SourcePosition]) -> Self {
        Self {
            message: message.into(),
            locations: locations.to_vec(),
        }
    }

    /// Access the message for a validation error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Access the positions of the validation error
    ///
    /// All validation errors contain at least one source position, but some
    /// validators supply extra context through multiple positions.
    pub fn locations(&self) -> &[SourcePosition] {
        &self.locations
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} At {}", self.message, self.locations.iter().format(", "))
    }
}

impl std::error::Error for RuleError {}

/// State shared by the validation rules.
pub struct ValidatorContext<'a, C> {
    /// Schema the document is validated against.
    pub schema: &'a SchemaType<C>,
    fragments: Fragments<'a>,
    errors: Vec<RuleError>,
}

impl<'a, C> ValidatorContext<'a, C> {
    #[doc(hidden)]
    pub fn new(schema: &'a SchemaType<C>, document: &'a [Definition<'a>]) -> Self {
        Self {
            schema,
            fragments: document
                .iter()
                .filter_map(|def| match def {
                    Definition::Fragment(frag) => Some((frag.item.name.item, &frag.item)),
                    Definition::Operation(_) => None,
                })
                .collect(),
            errors: Vec::new(),
        }
    }

    /// Fragment definitions of the document, by name.
    pub fn fragments(&self) -> &Fragments<'a> {
        &self.fragments
    }

    #[doc(hidden)]
    pub fn report_error(&mut self, message: &str, locations: &[SourcePosition]) {
        self.errors.push(RuleError::new(message, locations));
    }

    #[doc(hidden)]
    pub fn into_errors(mut self) -> Vec<RuleError> {
        self.errors.sort();
        self.errors
    }
}
