use std::collections::hash_map::Entry;

use fnv::FnvHashMap;

use crate::{
    ast::{Directive, InputValue},
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

#[doc(hidden)]
pub struct UniqueDeferStreamLabels<'a> {
    known_labels: FnvHashMap<&'a str, SourcePosition>,
}

#[doc(hidden)]
pub fn factory<'a>() -> UniqueDeferStreamLabels<'a> {
    UniqueDeferStreamLabels {
        known_labels: FnvHashMap::default(),
    }
}

impl<'a, C> Visitor<'a, C> for UniqueDeferStreamLabels<'a> {
    fn enter_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        directive: &'a Spanning<Directive<'a>>,
    ) {
        let name = directive.item.name.item;
        if name != "defer" && name != "stream" {
            return;
        }
        let Some(label) = directive
            .item
            .arguments
            .as_ref()
            .and_then(|args| args.item.get("label"))
        else {
            return;
        };

        match &label.item {
            InputValue::String(label) => match self.known_labels.entry(label) {
                Entry::Occupied(e) => {
                    ctx.report_error(duplicate_message(), &[*e.get(), directive.span.start]);
                }
                Entry::Vacant(e) => {
                    e.insert(directive.span.start);
                }
            },
            _ => ctx.report_error(&not_static_message(name), &[directive.span.start]),
        }
    }
}

fn duplicate_message() -> &'static str {
    "Defer/Stream directive label argument must be unique."
}

fn not_static_message(directive_name: &str) -> String {
    format!("Argument \"@{directive_name}(label:)\" must be a static string.")
}
