//! Query validation related methods and data structures

mod context;
mod rule_set;
pub mod rules;
mod traits;
mod visitor;

#[cfg(test)]
pub(crate) mod test_harness;

use crate::{ast::Definition, schema::model::SchemaType};

pub use self::{
    context::{RuleError, ValidatorContext},
    rule_set::RuleSet,
    rules::visit_all_rules,
    traits::Visitor,
    visitor::visit,
};

/// Validates `document` against `schema`.
///
/// Only the rules the executor relies on are checked: operation naming,
/// known fragments, unique `@defer`/`@stream` labels and single root field
/// subscriptions.
pub fn validate<'a, C>(schema: &'a SchemaType<C>, document: &'a [Definition<'a>]) -> Vec<RuleError> {
    let mut ctx = ValidatorContext::new(schema, document);
    visit_all_rules(&mut ctx, document);
    ctx.into_errors()
}
