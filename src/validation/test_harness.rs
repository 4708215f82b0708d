use arcstr::ArcStr;

use crate::{
    ast::{Definition, Type},
    parser::parse_document_source,
    schema::{
        meta::{Field, InterfaceMeta, ObjectMeta, UnionMeta},
        model::{SchemaConfig, SchemaType},
    },
    validation::{RuleError, ValidatorContext},
};

fn test_schema() -> SchemaType<()> {
    let config = SchemaConfig::new("Query")
        .subscription("Subscription")
        .add_type(
            ObjectMeta::new(
                "Query",
                vec![
                    Field::new("dog", Type::named("Dog")),
                    Field::new("pets", Type::list(Type::named("Pet"))),
                    Field::new("message", Type::named("String")),
                ],
            )
            .into_meta(),
        )
        .add_type(
            InterfaceMeta::new("Named", vec![Field::new("name", Type::named("String"))]).into_meta(),
        )
        .add_type(
            ObjectMeta::new(
                "Dog",
                vec![
                    Field::new("name", Type::named("String")),
                    Field::new("barks", Type::named("Boolean")),
                ],
            )
            .interfaces(vec![ArcStr::from("Named")])
            .into_meta(),
        )
        .add_type(
            ObjectMeta::new(
                "Cat",
                vec![
                    Field::new("name", Type::named("String")),
                    Field::new("meows", Type::named("Boolean")),
                ],
            )
            .interfaces(vec![ArcStr::from("Named")])
            .into_meta(),
        )
        .add_type(UnionMeta::new("Pet", vec![ArcStr::from("Dog"), ArcStr::from("Cat")]).into_meta())
        .add_type(
            ObjectMeta::new(
                "Subscription",
                vec![
                    Field::new("newMessage", Type::named("String")),
                    Field::new("otherMessage", Type::named("String")),
                ],
            )
            .into_meta(),
        );
    SchemaType::new(config).expect("test schema is valid")
}

/// Parses `q` and runs `run` over it against a small pet schema, returning
/// the reported errors.
pub(crate) fn validate_with<F>(q: &str, run: F) -> Vec<RuleError>
where
    F: for<'a> FnOnce(&mut ValidatorContext<'a, ()>, &'a [Definition<'a>]),
{
    let schema = test_schema();
    let doc = parse_document_source(q).expect("test query parses");
    let mut ctx = ValidatorContext::new(&schema, &doc);
    run(&mut ctx, &doc);
    ctx.into_errors()
}
