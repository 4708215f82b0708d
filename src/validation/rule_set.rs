use crate::{
    ast::{Definition, Directive, Field, Fragment, FragmentSpread, InlineFragment, Operation},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

/// Several rules driven by a single document walk.
///
/// Every event is forwarded to the rules in the order they were added.
pub struct RuleSet<'a, C> {
    rules: Vec<Box<dyn Visitor<'a, C> + 'a>>,
}

impl<'a, C> Default for RuleSet<'a, C> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<'a, C> RuleSet<'a, C> {
    /// Adds `rule` to this set.
    #[must_use]
    pub fn with(mut self, rule: impl Visitor<'a, C> + 'a) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    fn each(&mut self, mut f: impl FnMut(&mut (dyn Visitor<'a, C> + 'a))) {
        for rule in &mut self.rules {
            f(rule.as_mut());
        }
    }
}

impl<'a, C> Visitor<'a, C> for RuleSet<'a, C> {
    fn enter_document(&mut self, ctx: &mut ValidatorContext<'a, C>, doc: &'a [Definition<'a>]) {
        self.each(|r| r.enter_document(ctx, doc));
    }
    fn exit_document(&mut self, ctx: &mut ValidatorContext<'a, C>, doc: &'a [Definition<'a>]) {
        self.each(|r| r.exit_document(ctx, doc));
    }

    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        self.each(|r| r.enter_operation_definition(ctx, op));
    }
    fn exit_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        self.each(|r| r.exit_operation_definition(ctx, op));
    }

    fn enter_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        frag: &'a Spanning<Fragment<'a>>,
    ) {
        self.each(|r| r.enter_fragment_definition(ctx, frag));
    }
    fn exit_fragment_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        frag: &'a Spanning<Fragment<'a>>,
    ) {
        self.each(|r| r.exit_fragment_definition(ctx, frag));
    }

    fn enter_directive(&mut self, ctx: &mut ValidatorContext<'a, C>, d: &'a Spanning<Directive<'a>>) {
        self.each(|r| r.enter_directive(ctx, d));
    }
    fn exit_directive(&mut self, ctx: &mut ValidatorContext<'a, C>, d: &'a Spanning<Directive<'a>>) {
        self.each(|r| r.exit_directive(ctx, d));
    }

    fn enter_field(&mut self, ctx: &mut ValidatorContext<'a, C>, field: &'a Spanning<Field<'a>>) {
        self.each(|r| r.enter_field(ctx, field));
    }
    fn exit_field(&mut self, ctx: &mut ValidatorContext<'a, C>, field: &'a Spanning<Field<'a>>) {
        self.each(|r| r.exit_field(ctx, field));
    }

    fn enter_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.each(|r| r.enter_fragment_spread(ctx, spread));
    }
    fn exit_fragment_spread(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        spread: &'a Spanning<FragmentSpread<'a>>,
    ) {
        self.each(|r| r.exit_fragment_spread(ctx, spread));
    }

    fn enter_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        frag: &'a Spanning<InlineFragment<'a>>,
    ) {
        self.each(|r| r.enter_inline_fragment(ctx, frag));
    }
    fn exit_inline_fragment(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        frag: &'a Spanning<InlineFragment<'a>>,
    ) {
        self.each(|r| r.exit_inline_fragment(ctx, frag));
    }
}
