use std::collections::hash_map::Entry;

use fnv::FnvHashMap;

use crate::{
    ast::Operation,
    parser::{SourcePosition, Spanning},
    validation::{ValidatorContext, Visitor},
};

#[doc(hidden)]
pub struct UniqueOperationNames<'a> {
    names: FnvHashMap<&'a str, SourcePosition>,
}

#[doc(hidden)]
pub fn factory<'a>() -> UniqueOperationNames<'a> {
    UniqueOperationNames {
        names: FnvHashMap::default(),
    }
}

impl<'a, C> Visitor<'a, C> for UniqueOperationNames<'a> {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        if let Some(op_name) = &op.item.name {
            match self.names.entry(op_name.item) {
                Entry::Occupied(e) => {
                    ctx.report_error(&error_message(op_name.item), &[*e.get(), op.span.start]);
                }
                Entry::Vacant(e) => {
                    e.insert(op.span.start);
                }
            }
        }
    }
}

fn error_message(op_name: &str) -> String {
    format!("There can be only one operation named \"{op_name}\".")
}
