use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};

use super::{run_query, vars};
use crate::{
    ast::Type,
    schema::{
        meta::{Argument, Field, ObjectMeta},
        model::{SchemaConfig, SchemaType},
    },
    value::Value,
};

fn schema() -> SchemaType<()> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("pic", Type::named("String"))
                .argument(Argument::new("size", Type::named("Int")).default_value(50))
                .resolve_value(|ctx| {
                    let size = ctx.arg("size").and_then(Value::as_int_value);
                    Ok(format!("pic {}", size.map_or_else(|| "none".into(), |s| s.to_string())).into())
                }),
            Field::new("title", Type::named("String")).resolve_value(|_| Ok("title".into())),
        ],
    );
    SchemaType::new(SchemaConfig::new("Query").add_type(query.into_meta())).expect("valid schema")
}

const PIC: &str = "fragment Pic($size: Int = 10) on Query { pic(size: $size) }";

async fn run(operation: &str, variables: Json) -> Json {
    let schema = schema();
    let query = format!("{operation} {PIC}");
    run_query(&schema, &query, |a| a.variables(vars(variables))).await
}

#[tokio::test]
async fn argument_binds_fragment_variable() {
    assert_eq!(
        run("{ ...Pic(size: 20) }", json!({})).await,
        json!({"data": {"pic": "pic 20"}}),
    );
}

#[tokio::test]
async fn missing_argument_takes_default() {
    assert_eq!(run("{ ...Pic }", json!({})).await, json!({"data": {"pic": "pic 10"}}));
}

#[tokio::test]
async fn invalid_argument_takes_default() {
    assert_eq!(
        run(r#"{ ...Pic(size: "big") }"#, json!({})).await,
        json!({"data": {"pic": "pic 10"}}),
    );
}

#[tokio::test]
async fn argument_from_operation_variable() {
    assert_eq!(
        run("query Q($s: Int) { ...Pic(size: $s) }", json!({"s": 7})).await,
        json!({"data": {"pic": "pic 7"}}),
    );
}

#[tokio::test]
async fn fragment_variable_shadows_operation_variable() {
    let schema = schema();
    let query = "query Q($size: Int) { ...Shadow ...Plain } \
                 fragment Shadow($size: Int) on Query { shadowed: pic(size: $size) } \
                 fragment Plain on Query { plain: pic(size: $size) }";
    assert_eq!(
        run_query(&schema, query, |a| a.variables(vars(json!({"size": 99})))).await,
        json!({"data": {"shadowed": "pic 50", "plain": "pic 99"}}),
    );
}

#[tokio::test]
async fn arguments_flow_through_nested_fragments() {
    let schema = schema();
    let query = format!(
        "{{ ...Outer(n: 3) }} fragment Outer($n: Int) on Query {{ ...Pic(size: $n) }} {PIC}",
    );
    assert_eq!(
        run_query(&schema, &query, |a| a).await,
        json!({"data": {"pic": "pic 3"}}),
    );
}

#[tokio::test]
async fn fragment_variable_in_directive() {
    let schema = schema();
    let fragment = "fragment Header($full: Boolean = false) on Query { title pic @include(if: $full) }";
    for (operation, expected) in [
        ("{ ...Header }", json!({"data": {"title": "title"}})),
        ("{ ...Header(full: true) }", json!({"data": {"title": "title", "pic": "pic 50"}})),
    ] {
        let query = format!("{operation} {fragment}");
        assert_eq!(run_query(&schema, &query, |a| a).await, expected);
    }
}
