use arcstr::ArcStr;
use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};

use super::{data, run_query};
use crate::{
    ast::Type,
    schema::{
        meta::{Field, InterfaceMeta, ObjectMeta, UnionMeta},
        model::{SchemaConfig, SchemaType},
    },
    types::{FieldValue, MaybeAsync},
    value::{Object, Value},
};

/// Object type whose values are the data objects carrying the `marker` key.
fn pet(name: &'static str, marker: &'static str) -> ObjectMeta<()> {
    ObjectMeta::new(
        name,
        vec![
            Field::new("name", Type::named("String")),
            Field::new(marker, Type::named("Boolean")),
        ],
    )
    .interfaces(vec![ArcStr::from("Pet"), ArcStr::from("Named")])
    .is_type_of(move |ctx| {
        MaybeAsync::Ready(Ok(ctx
            .value
            .as_value()
            .and_then(Value::as_object_value)
            .is_some_and(|o| o.get_field_value(marker).is_some())))
    })
}

fn schema() -> SchemaType<()> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("pets", Type::list(Type::named("Pet"))),
            Field::new("union", Type::list(Type::named("DogOrCat"))),
            Field::new("named", Type::named("Named")),
            Field::new("unresolvable", Type::named("Pet")),
            Field::new("tagged", Type::named("Pet")).resolve_value(|_| {
                let imposter: Object = [("name", Value::scalar("Imposter"))].into_iter().collect();
                Ok(FieldValue::from(imposter).with_type("Cat"))
            }),
        ],
    );
    let named = InterfaceMeta::new("Named", vec![Field::new("name", Type::named("String"))])
        .resolve_type(|ctx| {
            let kind = ctx
                .value
                .as_value()
                .and_then(Value::as_object_value)
                .and_then(|o| o.get_field_value("kind"))
                .and_then(Value::as_string_value);
            MaybeAsync::Ready(Ok(kind.map(ArcStr::from)))
        });
    let person = ObjectMeta::new("Person", vec![Field::new("name", Type::named("String"))]);

    let config = SchemaConfig::new("Query").types([
        query.into_meta(),
        InterfaceMeta::new("Pet", vec![Field::new("name", Type::named("String"))]).into_meta(),
        named.into_meta(),
        pet("Dog", "woofs").into_meta(),
        pet("Cat", "meows").into_meta(),
        person.into_meta(),
        UnionMeta::new("DogOrCat", vec![ArcStr::from("Dog"), ArcStr::from("Cat")]).into_meta(),
    ]);
    SchemaType::new(config).expect("valid schema")
}

async fn run(query: &str, root: Json) -> Json {
    let schema = schema();
    run_query(&schema, query, |a| a.root_value(data(root))).await
}

fn odie_and_garfield() -> Json {
    json!([
        {"name": "Odie", "woofs": true},
        {"name": "Garfield", "meows": false},
    ])
}

#[tokio::test]
async fn interface_resolved_by_membership_checks() {
    let query = "{ pets { __typename name ... on Dog { woofs } ... on Cat { meows } } }";
    assert_eq!(
        run(query, json!({"pets": odie_and_garfield()})).await,
        json!({"data": {"pets": [
            {"__typename": "Dog", "name": "Odie", "woofs": true},
            {"__typename": "Cat", "name": "Garfield", "meows": false},
        ]}}),
    );
}

#[tokio::test]
async fn union_resolved_by_membership_checks() {
    let query = "{ union { __typename ... on Dog { name woofs } ... on Cat { meows } } }";
    assert_eq!(
        run(query, json!({"union": odie_and_garfield()})).await,
        json!({"data": {"union": [
            {"__typename": "Dog", "name": "Odie", "woofs": true},
            {"__typename": "Cat", "meows": false},
        ]}}),
    );
}

#[tokio::test]
async fn typename_in_data_names_the_type() {
    assert_eq!(
        run(
            "{ pets { __typename } }",
            json!({"pets": [{"__typename": "Cat", "name": "Tom", "meows": true}]}),
        )
        .await,
        json!({"data": {"pets": [{"__typename": "Cat"}]}}),
    );
}

#[tokio::test]
async fn value_rejected_by_its_type() {
    assert_eq!(
        run("{ tagged { name } }", json!({})).await,
        json!({
            "data": {"tagged": null},
            "errors": [{
                "message": "Expected value of type \"Cat\" but got: { name: \"Imposter\" }.",
                "locations": [{"line": 1, "column": 3}],
                "path": ["tagged"],
            }],
        }),
    );
}

#[tokio::test]
async fn type_resolver_of_interface() {
    let dog = run(
        "{ named { __typename name } }",
        json!({"named": {"kind": "Dog", "name": "Rex", "woofs": true}}),
    )
    .await;
    assert_eq!(dog, json!({"data": {"named": {"__typename": "Dog", "name": "Rex"}}}));

    for (kind, message) in [
        (
            "Ghost",
            "Abstract type \"Named\" was resolved to a type \"Ghost\" that does not exist inside \
             the schema.",
        ),
        ("String", "Abstract type \"Named\" was resolved to a non-object type \"String\"."),
        ("Person", "Runtime Object type \"Person\" is not a possible type for \"Named\"."),
    ] {
        let result = run("{ named { name } }", json!({"named": {"kind": kind, "name": "?"}})).await;
        assert_eq!(result["data"], json!({"named": null}));
        assert_eq!(result["errors"][0]["message"], json!(message));
    }
}

#[tokio::test]
async fn unresolvable_abstract_value() {
    let result = run("{ unresolvable { name } }", json!({"unresolvable": {"name": "?"}})).await;
    assert_eq!(
        result["errors"][0]["message"],
        json!(
            "Abstract type \"Pet\" must resolve to an Object type at runtime for field \
             \"Query.unresolvable\". Either the \"Pet\" type should provide a \"resolveType\" \
             function or each possible type should provide an \"isTypeOf\" function."
        ),
    );
}

#[tokio::test]
async fn request_type_resolver() {
    let schema = schema();
    let result = run_query(&schema, "{ union { __typename } }", |a| {
        a.root_value(data(json!({"union": [{"woofs": true, "meows": true}]})))
            .type_resolver(|_| MaybeAsync::Ready(Ok(Some(ArcStr::from("Cat")))))
    })
    .await;
    assert_eq!(result, json!({"data": {"union": [{"__typename": "Cat"}]}}));
}
