use crate::{
    ast::{Definition, Operation},
    parser::Spanning,
    validation::{ValidatorContext, Visitor},
};

#[doc(hidden)]
pub struct LoneAnonymousOperation {
    operation_count: Option<usize>,
}

#[doc(hidden)]
pub fn factory() -> LoneAnonymousOperation {
    LoneAnonymousOperation {
        operation_count: None,
    }
}

impl<'a, C> Visitor<'a, C> for LoneAnonymousOperation {
    fn enter_document(&mut self, _: &mut ValidatorContext<'a, C>, doc: &'a [Definition<'a>]) {
        self.operation_count = Some(
            doc.iter()
                .filter(|d| matches!(d, Definition::Operation(_)))
                .count(),
        );
    }

    fn enter_operation_definition(
        &mut self,
        ctx: &mut ValidatorContext<'a, C>,
        op: &'a Spanning<Operation<'a>>,
    ) {
        if self.operation_count.is_some_and(|count| count > 1) && op.item.name.is_none() {
            ctx.report_error(error_message(), &[op.span.start]);
        }
    }
}

fn error_message() -> &'static str {
    "This anonymous operation must be the only defined operation."
}

#[cfg(test)]
mod tests {
    use super::{error_message, factory};

    use crate::{
        parser::SourcePosition,
        validation::{RuleError, test_harness::validate_with, visit},
    };

    fn check(q: &str) -> Vec<RuleError> {
        validate_with(q, |ctx, doc| visit(&mut factory(), ctx, doc))
    }

    #[test]
    fn no_operations() {
        assert_eq!(check("fragment fragA on Dog { name }"), []);
    }

    #[test]
    fn one_anon_operation() {
        assert_eq!(check("{ dog { name } }"), []);
    }

    #[test]
    fn multiple_named_operations() {
        assert_eq!(
            check("query Foo { dog { name } } query Bar { dog { barks } }"),
            [],
        );
    }

    #[test]
    fn anon_operation_with_fragment() {
        assert_eq!(
            check("{ ...Foo } fragment Foo on Query { dog { name } }"),
            [],
        );
    }

    #[test]
    fn multiple_anon_operations() {
        assert_eq!(
            check("{ dog { name } } { dog { barks } }"),
            [
                RuleError::new(error_message(), &[SourcePosition::new(0, 0, 0)]),
                RuleError::new(error_message(), &[SourcePosition::new(17, 0, 17)]),
            ],
        );
    }

    #[test]
    fn anon_operation_with_a_subscription() {
        assert_eq!(
            check("{ dog { name } } subscription Foo { newMessage }"),
            [RuleError::new(error_message(), &[SourcePosition::new(0, 0, 0)])],
        );
    }
}
