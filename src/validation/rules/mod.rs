//! Definitions of the validation rules

pub mod known_fragment_names;
pub mod lone_anonymous_operation;
pub mod single_field_subscriptions;
pub mod unique_defer_stream_labels;
pub mod unique_operation_names;

use crate::{
    ast::Definition,
    validation::{RuleSet, ValidatorContext, visit},
};

#[doc(hidden)]
pub fn visit_all_rules<'a, C>(ctx: &mut ValidatorContext<'a, C>, doc: &'a [Definition<'a>]) {
    let mut rules = RuleSet::default()
        .with(self::known_fragment_names::factory())
        .with(self::lone_anonymous_operation::factory())
        .with(self::single_field_subscriptions::factory())
        .with(self::unique_defer_stream_labels::factory())
        .with(self::unique_operation_names::factory());

    visit(&mut rules, ctx, doc);
}
