use crate::{
    ast::{Operation, OperationType},
    executor::collect::collect_fields,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
    value::Object,
};

#[doc(hidden)]
pub struct SingleFieldSubscriptions;

#[doc(hidden)]
pub fn factory() -> SingleFieldSubscriptions {
    SingleFieldSubscriptions
}

impl<'a, C> Visitor<'a, C> for SingleFieldSubscriptions {
    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        if op.item.operation_type != OperationType::Subscription {
            return;
        }
        let Some(subscription_type) = ctx.schema.subscription_type() else {
            return;
        };

        // Variables aren't known yet, so directives referencing them are
        // treated as absent.
        let collected = collect_fields(
            ctx.schema,
            ctx.fragments(),
            &Object::default(),
            subscription_type,
            &op.item.selection_set,
        );
        let op_name = op.item.name.as_ref().map(|n| n.item);

        if collected.grouped_field_set.len() > 1 {
            let extra = collected
                .grouped_field_set
                .values()
                .skip(1)
                .flatten()
                .map(|details| details.node.span.start)
                .collect::<Vec<_>>();
            ctx.report_error(&multiple_fields_message(op_name), &extra);
        }

        for fields in collected.grouped_field_set.values() {
            let Some(first) = fields.first() else {
                continue;
            };
            if first.node.item.name.item.starts_with("__") {
                let locations = fields.iter().map(|d| d.node.span.start).collect::<Vec<_>>();
                ctx.report_error(&introspection_message(op_name), &locations);
            }
        }
    }
}

fn multiple_fields_message(op_name: Option<&str>) -> String {
    match op_name {
        Some(name) => format!("Subscription \"{name}\" must select only one top level field."),
        None => "Anonymous Subscription must select only one top level field.".into(),
    }
}

fn introspection_message(op_name: Option<&str>) -> String {
    match op_name {
        Some(name) => {
            format!("Subscription \"{name}\" must not select an introspection top level field.")
        }
        None => "Anonymous Subscription must not select an introspection top level field.".into(),
    }
}
