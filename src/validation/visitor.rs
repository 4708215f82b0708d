use crate::{
    ast::{Definition, Directive, Selection},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

#[doc(hidden)]
pub fn visit<'a, C, V: Visitor<'a, C>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a, C>,
    d: &'a [Definition<'a>],
) {
    v.enter_document(ctx, d);
    for def in d {
        match def {
            Definition::Operation(op) => {
                v.enter_operation_definition(ctx, op);
                visit_directives(v, ctx, &op.item.directives);
                visit_selection_set(v, ctx, &op.item.selection_set);
                v.exit_operation_definition(ctx, op);
            }
            Definition::Fragment(f) => {
                v.enter_fragment_definition(ctx, f);
                visit_directives(v, ctx, &f.item.directives);
                visit_selection_set(v, ctx, &f.item.selection_set);
                v.exit_fragment_definition(ctx, f);
            }
        }
    }
    v.exit_document(ctx, d);
}

fn visit_directives<'a, C, V: Visitor<'a, C>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a, C>,
    directives: &'a Option<Vec<Spanning<Directive<'a>>>>,
) {
    for directive in directives.iter().flatten() {
        v.enter_directive(ctx, directive);
        v.exit_directive(ctx, directive);
    }
}

fn visit_selection_set<'a, C, V: Visitor<'a, C>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a, C>,
    selection_set: &'a [Selection<'a>],
) {
    for selection in selection_set {
        match selection {
            Selection::Field(field) => {
                v.enter_field(ctx, field);
                visit_directives(v, ctx, &field.item.directives);
                if let Some(selection_set) = &field.item.selection_set {
                    visit_selection_set(v, ctx, selection_set);
                }
                v.exit_field(ctx, field);
            }
            Selection::FragmentSpread(spread) => {
                v.enter_fragment_spread(ctx, spread);
                visit_directives(v, ctx, &spread.item.directives);
                v.exit_fragment_spread(ctx, spread);
            }
            Selection::InlineFragment(fragment) => {
                v.enter_inline_fragment(ctx, fragment);
                visit_directives(v, ctx, &fragment.item.directives);
                visit_selection_set(v, ctx, &fragment.item.selection_set);
                v.exit_inline_fragment(ctx, fragment);
            }
        }
    }
}
