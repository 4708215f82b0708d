use crate::{
    ast::FragmentSpread,
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

#[doc(hidden)]
pub struct KnownFragmentNames;

#[doc(hidden)]
pub fn factory() -> KnownFragmentNames {
    KnownFragmentNames
}

impl<'a, C> Visitor<'a, C> for KnownFragmentNames {
    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        let name = &spread.item.name;
        if !ctx.fragments().contains_key(name.item) {
            ctx.report_error(&error_message(name.item), &[name.span.start]);
        }
    }
}

fn error_message(frag_name: &str) -> String {
    format!("Unknown fragment \"{frag_name}\".")
}
