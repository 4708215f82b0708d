use crate::{
    ast::{Definition, Directive, Field, Fragment, FragmentSpread, InlineFragment, Operation},
    parser::Spanning,
    validation::ValidatorContext,
};

#[doc(hidden)]
pub trait Visitor<'a, C> {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a, C>, _: &'a [Definition<'a>]) {}
    fn exit_document(&mut self, _: &mut ValidatorContext<'a, C>, _: &'a [Definition<'a>]) {}

    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<Operation<'a>>,
    ) {
    }
    fn exit_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<Operation<'a>>,
    ) {
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<Fragment<'a>>,
    ) {
    }
    fn exit_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<Fragment<'a>>,
    ) {
    }

    fn enter_directive(&mut self, _: &mut ValidatorContext<'a, C>, _: &'a Spanning<Directive<'a>>) {}
    fn exit_directive(&mut self, _: &mut ValidatorContext<'a, C>, _: &'a Spanning<Directive<'a>>) {}

    fn enter_field(&mut self, _: &mut ValidatorContext<'a, C>, _: &'a Spanning<Field<'a>>) {}
    fn exit_field(&mut self, _: &mut ValidatorContext<'a, C>, _: &'a Spanning<Field<'a>>) {}

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<FragmentSpread<'a>>,
    ) {
    }
    fn exit_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<FragmentSpread<'a>>,
    ) {
    }

    fn enter_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<InlineFragment<'a>>,
    ) {
    }
    fn exit_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a, C>,
        _: &'a Spanning<InlineFragment<'a>>,
    ) {
    }
}
