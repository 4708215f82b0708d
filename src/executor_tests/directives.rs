use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};

use super::{data, run_query, vars};
use crate::{
    ast::Type,
    schema::{
        meta::{Field, ObjectMeta},
        model::{SchemaConfig, SchemaType},
    },
};

fn schema() -> SchemaType<()> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("a", Type::named("String")),
            Field::new("b", Type::named("String")),
        ],
    );
    SchemaType::new(SchemaConfig::new("Query").add_type(query.into_meta())).expect("valid schema")
}

async fn run(query: &str) -> Json {
    let schema = schema();
    run_query(&schema, query, |a| a.root_value(data(json!({"a": "a", "b": "b"})))).await
}

#[tokio::test]
async fn scalar_include_true() {
    assert_eq!(
        run("{ a, b @include(if: true) }").await,
        json!({"data": {"a": "a", "b": "b"}}),
    );
}

#[tokio::test]
async fn scalar_include_false() {
    assert_eq!(run("{ a, b @include(if: false) }").await, json!({"data": {"a": "a"}}));
}

#[tokio::test]
async fn scalar_skip_false() {
    assert_eq!(
        run("{ a, b @skip(if: false) }").await,
        json!({"data": {"a": "a", "b": "b"}}),
    );
}

#[tokio::test]
async fn scalar_skip_true() {
    assert_eq!(run("{ a, b @skip(if: true) }").await, json!({"data": {"a": "a"}}));
}

#[tokio::test]
async fn skip_wins_over_include() {
    assert_eq!(
        run("{ a, b @include(if: true) @skip(if: true) }").await,
        json!({"data": {"a": "a"}}),
    );
    assert_eq!(
        run("{ a, b @include(if: false) @skip(if: false) }").await,
        json!({"data": {"a": "a"}}),
    );
    assert_eq!(
        run("{ a, b @include(if: true) @skip(if: false) }").await,
        json!({"data": {"a": "a", "b": "b"}}),
    );
}

#[tokio::test]
async fn fragment_spreads() {
    assert_eq!(
        run("{ a, ...Frag @include(if: false) } fragment Frag on Query { b }").await,
        json!({"data": {"a": "a"}}),
    );
    assert_eq!(
        run("{ a, ...Frag @skip(if: false) } fragment Frag on Query { b }").await,
        json!({"data": {"a": "a", "b": "b"}}),
    );
}

#[tokio::test]
async fn inline_fragments() {
    assert_eq!(
        run("{ a, ... on Query @skip(if: true) { b } }").await,
        json!({"data": {"a": "a"}}),
    );
    assert_eq!(
        run("{ a, ... @include(if: true) { b } }").await,
        json!({"data": {"a": "a", "b": "b"}}),
    );
}

#[tokio::test]
async fn conditions_from_variables() {
    let schema = schema();
    let query = "query Q($skip: Boolean!) { a, b @skip(if: $skip) }";
    for (skip, expected) in [
        (true, json!({"data": {"a": "a"}})),
        (false, json!({"data": {"a": "a", "b": "b"}})),
    ] {
        let result = run_query(&schema, query, |a| {
            a.root_value(data(json!({"a": "a", "b": "b"})))
                .variables(vars(json!({"skip": skip})))
        })
        .await;
        assert_eq!(result, expected);
    }
}

#[tokio::test]
async fn one_included_occurrence_is_enough() {
    assert_eq!(
        run("{ a @skip(if: true) b a }").await,
        json!({"data": {"a": "a", "b": "b"}}),
    );
}

#[tokio::test]
async fn directive_without_valid_condition_is_ignored() {
    assert_eq!(
        run("{ a @skip, b @include(if: \"no\") }").await,
        json!({"data": {"a": "a", "b": "b"}}),
    );
}
