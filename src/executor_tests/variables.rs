use pretty_assertions::assert_eq;
use serde_json::json;

use super::{run_query, vars};
use crate::{
    ExecutionOptions,
    ast::Type,
    executor::{FieldResult, ResolverContext},
    schema::{
        meta::{Argument, EnumMeta, EnumValue, Field, InputObjectMeta, ObjectMeta},
        model::{SchemaConfig, SchemaType},
    },
    types::FieldValue,
    value::Value,
};

/// Prints the argument `name` as received by the resolver.
fn printed(name: &'static str) -> impl Fn(ResolverContext<'_, ()>) -> FieldResult<FieldValue> {
    move |ctx: ResolverContext<'_, ()>| {
        let printed = ctx.arg(name).map_or_else(|| "absent".to_owned(), Value::to_string);
        Ok(printed.into())
    }
}

fn schema() -> SchemaType<()> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("echo", Type::named("String"))
                .argument(Argument::new("input", Type::named("Point")))
                .resolve_value(printed("input")),
            Field::new("int", Type::named("Int"))
                .argument(Argument::new("v", Type::named("Int").non_null()))
                .resolve_value(|ctx| Ok(ctx.arg("v").cloned().map_or(FieldValue::Null, FieldValue::Value))),
            Field::new("optional", Type::named("Int"))
                .argument(Argument::new("v", Type::named("Int")).default_value(5))
                .resolve_value(|ctx| Ok(ctx.arg("v").cloned().map_or(FieldValue::Null, FieldValue::Value))),
            Field::new("list", Type::named("String"))
                .argument(Argument::new("l", Type::list(Type::named("Int"))))
                .resolve_value(printed("l")),
            Field::new("color", Type::named("String"))
                .argument(Argument::new("c", Type::named("Color")))
                .resolve_value(printed("c")),
        ],
    );
    let point = InputObjectMeta::new(
        "Point",
        vec![
            Argument::new("x", Type::named("Int").non_null()),
            Argument::new("y", Type::named("Int")).default_value(0),
        ],
    );
    let color = EnumMeta::new(
        "Color",
        vec![EnumValue::new("RED").value(1), EnumValue::new("BLUE").value(2)],
    );

    let config = SchemaConfig::new("Query").types([
        query.into_meta(),
        point.into_meta(),
        color.into_meta(),
    ]);
    SchemaType::new(config).expect("valid schema")
}

#[tokio::test]
async fn input_object_variable_gets_defaults() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "query Q($p: Point) { echo(input: $p) }", |a| {
            a.variables(vars(json!({"p": {"x": 1}})))
        })
        .await,
        json!({"data": {"echo": "{ x: 1, y: 0 }"}}),
    );
}

#[tokio::test]
async fn inline_input_object() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ echo(input: {x: 2, y: 3}) }", |a| a).await,
        json!({"data": {"echo": "{ x: 2, y: 3 }"}}),
    );
}

#[tokio::test]
async fn variable_default_value() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "query Q($p: Point = {x: 7}) { echo(input: $p) }", |a| a).await,
        json!({"data": {"echo": "{ x: 7, y: 0 }"}}),
    );
}

#[tokio::test]
async fn required_variable_not_provided() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "query Q($v: Int!) { int(v: $v) }", |a| a).await,
        json!({
            "data": null,
            "errors": [{
                "message": "Variable \"$v\" of required type \"Int!\" was not provided.",
                "locations": [{"line": 1, "column": 9}],
            }],
        }),
    );
}

#[tokio::test]
async fn non_null_variable_given_null() {
    let schema = schema();
    let result = run_query(&schema, "query Q($v: Int!) { int(v: $v) }", |a| {
        a.variables(vars(json!({"v": null})))
    })
    .await;
    assert_eq!(
        result["errors"][0]["message"],
        json!("Variable \"$v\" of non-null type \"Int!\" must not be null."),
    );
}

#[tokio::test]
async fn invalid_nested_value_is_reported_with_its_path() {
    let schema = schema();
    let result = run_query(&schema, "query Q($p: Point) { echo(input: $p) }", |a| {
        a.variables(vars(json!({"p": {"x": "a"}})))
    })
    .await;
    assert_eq!(
        result,
        json!({
            "data": null,
            "errors": [{
                "message": "Variable \"$p\" got invalid value \"a\" at \"p.x\"; \
                            Int cannot represent non-integer value: \"a\"",
                "locations": [{"line": 1, "column": 9}],
            }],
        }),
    );
}

#[tokio::test]
async fn argument_defaults() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ optional }", |a| a).await,
        json!({"data": {"optional": 5}}),
    );
    assert_eq!(
        run_query(&schema, "query Q($v: Int) { optional(v: $v) }", |a| a).await,
        json!({"data": {"optional": 5}}),
    );
    assert_eq!(
        run_query(&schema, "query Q($v: Int) { optional(v: $v) }", |a| {
            a.variables(vars(json!({"v": null})))
        })
        .await,
        json!({"data": {"optional": null}}),
    );
}

#[tokio::test]
async fn required_argument_from_unset_variable() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "query Q($v: Int) { int(v: $v) }", |a| a).await,
        json!({
            "data": {"int": null},
            "errors": [{
                "message": "Argument \"v\" of required type \"Int!\" was provided the variable \
                            \"$v\" which was not provided a runtime value.",
                "locations": [{"line": 1, "column": 27}],
                "path": ["int"],
            }],
        }),
    );
}

#[tokio::test]
async fn single_value_wraps_into_list() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "query Q($l: [Int]) { list(l: $l) }", |a| {
            a.variables(vars(json!({"l": 3})))
        })
        .await,
        json!({"data": {"list": "[3]"}}),
    );
}

#[tokio::test]
async fn enum_variable_is_coerced_to_internal_value() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "query Q($c: Color) { color(c: $c) byName: color(c: BLUE) }", |a| {
            a.variables(vars(json!({"c": "RED"})))
        })
        .await,
        json!({"data": {"color": "1", "byName": "2"}}),
    );
}

#[tokio::test]
async fn stops_after_too_many_errors() {
    let schema = schema();
    let result = run_query(&schema, "query Q($a: Int!, $b: Int!) { int(v: $a) }", |a| {
        a.options(ExecutionOptions::default().max_coercion_errors(1))
    })
    .await;
    assert_eq!(
        result["errors"],
        json!([
            {
                "message": "Variable \"$a\" of required type \"Int!\" was not provided.",
                "locations": [{"line": 1, "column": 9}],
            },
            {"message": "Too many errors processing variables, error limit reached. Execution aborted."},
        ]),
    );
}

#[tokio::test]
async fn one_of_literal_with_two_fields_never_reaches_resolver() {
    let config = SchemaConfig::new("Query").types([
        ObjectMeta::new(
            "Query",
            vec![
                Field::new("find", Type::named("String"))
                    .argument(Argument::new("by", Type::named("Lookup").non_null()))
                    .resolve_value(|_| panic!("resolver must not be called")),
            ],
        )
        .into_meta(),
        InputObjectMeta::new(
            "Lookup",
            vec![
                Argument::new("id", Type::named("ID")),
                Argument::new("name", Type::named("String")),
            ],
        )
        .one_of()
        .into_meta(),
    ]);
    let schema = SchemaType::new(config).expect("valid schema");

    assert_eq!(
        run_query(&schema, r#"{ find(by: {id: "1", name: "x"}) }"#, |a| a).await,
        json!({
            "data": {"find": null},
            "errors": [{
                "message": "Argument \"by\" has invalid value { id: \"1\", name: \"x\" }. \
                            Exactly one key must be specified for OneOf type \"Lookup\".",
                "locations": [{"line": 1, "column": 12}],
                "path": ["find"],
            }],
        }),
    );
}
