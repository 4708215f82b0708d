use std::sync::Mutex;

use futures::FutureExt as _;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{data, run_query};
use crate::{
    ExecutionArgs, execute, execute_sync, graphql, parse,
    ast::Type,
    schema::{
        meta::{Argument, EnumMeta, EnumValue, Field, ObjectMeta},
        model::{SchemaConfig, SchemaType},
    },
    types::{FieldValue, MaybeAsync},
    value::{Object, Value},
};

fn schema() -> SchemaType<()> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("a", Type::named("String")),
            Field::new("b", Type::named("String")),
            Field::new("obj", Type::named("Obj")),
            Field::new("nonNullNull", Type::named("String").non_null()),
            Field::new("items", Type::list(Type::named("Int"))),
            Field::new("strictItems", Type::list(Type::named("Int").non_null())),
            Field::new("notList", Type::list(Type::named("Int"))),
            Field::new("badInt", Type::named("Int")),
            Field::new("color", Type::named("Color")),
            Field::new("greet", Type::named("String"))
                .argument(Argument::new("name", Type::named("String")).default_value("world"))
                .resolve_value(|ctx| {
                    let name = ctx.arg("name").and_then(Value::as_string_value).unwrap_or("?");
                    Ok(format!("hello {name}").into())
                }),
            Field::new("fails", Type::named("String")).resolve_value(|_| Err("boom".into())),
        ],
    );
    let obj = ObjectMeta::new(
        "Obj",
        vec![
            Field::new("id", Type::named("ID").non_null()),
            Field::new("name", Type::named("String")),
            Field::new("child", Type::named("Obj")),
        ],
    );
    let color = EnumMeta::new(
        "Color",
        vec![EnumValue::new("RED").value(1), EnumValue::new("BLUE").value(2)],
    );

    let config = SchemaConfig::new("Query")
        .mutation("Mutation")
        .add_type(query.into_meta())
        .add_type(obj.into_meta())
        .add_type(color.into_meta())
        .add_type(
            ObjectMeta::new("Mutation", vec![Field::new("a", Type::named("String"))]).into_meta(),
        );
    SchemaType::new(config).expect("valid schema")
}

fn root() -> FieldValue {
    data(json!({
        "a": "Apple",
        "b": "Banana",
        "obj": {"id": 1, "name": "one", "child": {"name": "orphan"}},
        "items": [1, null, 3],
        "strictItems": [1, null],
        "notList": "x",
        "badInt": "abc",
        "color": 2,
    }))
}

#[tokio::test]
async fn reads_root_data() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ a b obj { id name } }", |a| a.root_value(root())).await,
        json!({"data": {"a": "Apple", "b": "Banana", "obj": {"id": "1", "name": "one"}}}),
    );
}

#[tokio::test]
async fn merges_fields_by_response_key() {
    let schema = schema();
    let document = parse("{ obj { id } ...F obj { name } x: a } fragment F on Query { obj { id } a }")
        .expect("query parses");
    let result = execute(ExecutionArgs::new(&schema, &document, &()).root_value(root())).await;
    assert_eq!(
        serde_json::to_string(&result).expect("result serializes"),
        r#"{"data":{"obj":{"id":"1","name":"one"},"a":"Apple","x":"Apple"}}"#,
    );
}

#[tokio::test]
async fn typename_of_root() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ __typename t: __typename }", |a| a).await,
        json!({"data": {"__typename": "Query", "t": "Query"}}),
    );
}

#[tokio::test]
async fn unknown_fields_are_left_out() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ a nope }", |a| a.root_value(root())).await,
        json!({"data": {"a": "Apple"}}),
    );
}

#[tokio::test]
async fn arguments_and_defaults() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, r#"{ greet you: greet(name: "you") }"#, |a| a).await,
        json!({"data": {"greet": "hello world", "you": "hello you"}}),
    );
}

#[tokio::test]
async fn resolver_error_nulls_field() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ a fails }", |a| a.root_value(root())).await,
        json!({
            "data": {"a": "Apple", "fails": null},
            "errors": [{
                "message": "boom",
                "locations": [{"line": 1, "column": 5}],
                "path": ["fails"],
            }],
        }),
    );
}

#[tokio::test]
async fn null_bubbles_to_nullable_parent() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ obj { child { id name } } }", |a| a.root_value(root())).await,
        json!({
            "data": {"obj": {"child": null}},
            "errors": [{
                "message": "Cannot return null for non-nullable field Obj.id",
                "locations": [{"line": 1, "column": 17}],
                "path": ["obj", "child", "id"],
            }],
        }),
    );
}

#[tokio::test]
async fn null_bubbles_to_data() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ a nonNullNull }", |a| a.root_value(root())).await,
        json!({
            "data": null,
            "errors": [{
                "message": "Cannot return null for non-nullable field Query.nonNullNull",
                "locations": [{"line": 1, "column": 5}],
                "path": ["nonNullNull"],
            }],
        }),
    );
}

#[tokio::test]
async fn lists() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "{ items strictItems }", |a| a.root_value(root())).await,
        json!({
            "data": {"items": [1, null, 3], "strictItems": null},
            "errors": [{
                "message": "Cannot return null for non-nullable field Query.strictItems",
                "locations": [{"line": 1, "column": 9}],
                "path": ["strictItems", 1],
            }],
        }),
    );
}

#[tokio::test]
async fn leaf_and_list_shape_errors() {
    let schema = schema();
    let result = run_query(&schema, "{ notList badInt color }", |a| a.root_value(root())).await;
    assert_eq!(result["data"], json!({"notList": null, "badInt": null, "color": "BLUE"}));

    let result = run_query(&schema, "{ notList }", |a| a.root_value(root())).await;
    assert_eq!(
        result["errors"][0]["message"],
        json!("Expected Iterable, but did not find one for field \"Query.notList\"."),
    );
    let result = run_query(&schema, "{ badInt }", |a| a.root_value(root())).await;
    assert_eq!(
        result["errors"][0]["message"],
        json!("Int cannot represent non-integer value: \"abc\""),
    );
    let result = run_query(&schema, "{ color }", |a| {
        a.root_value(data(json!({"color": 9})))
    })
    .await;
    assert_eq!(
        result["errors"][0]["message"],
        json!("Enum \"Color\" cannot represent value: 9"),
    );
}

#[tokio::test]
async fn custom_field_resolver() {
    let schema = schema();
    let result = run_query(&schema, "{ a b }", |a| {
        a.field_resolver(|ctx| {
            MaybeAsync::Ready(Ok(ctx.info.field_name.to_uppercase().into()))
        })
    })
    .await;
    assert_eq!(result, json!({"data": {"a": "A", "b": "B"}}));
}

#[tokio::test]
async fn selects_operation() {
    let schema = schema();
    let query = "query A { a } query B { b }";
    assert_eq!(
        run_query(&schema, query, |a| a.root_value(root()).operation_name("B")).await,
        json!({"data": {"b": "Banana"}}),
    );
    assert_eq!(
        run_query(&schema, query, |a| a.root_value(root())).await,
        json!({
            "data": null,
            "errors": [{
                "message": "Must provide operation name if query contains multiple operations.",
            }],
        }),
    );
    assert_eq!(
        run_query(&schema, query, |a| a.operation_name("C")).await,
        json!({"data": null, "errors": [{"message": "Unknown operation named \"C\"."}]}),
    );
}

#[tokio::test]
async fn request_errors() {
    let schema = schema();
    assert_eq!(
        run_query(&schema, "fragment F on Query { a }", |a| a).await,
        json!({"data": null, "errors": [{"message": "Must provide an operation."}]}),
    );

    let no_subscriptions = run_query(&schema, "subscription { a }", |a| a).await;
    assert_eq!(
        no_subscriptions,
        json!({
            "data": null,
            "errors": [{"message": "Schema is not configured to execute subscription operation."}],
        }),
    );
}

struct Log(Mutex<Vec<String>>);

impl Log {
    fn push(&self, entry: String) {
        self.0.lock().expect("not poisoned").push(entry);
    }
}

#[tokio::test]
async fn mutation_fields_run_serially() {
    let slow = |name: &'static str, delay: u64| {
        Field::<Log>::new(name, Type::named("String")).resolve_async(move |ctx| {
            let log: &Log = ctx.context;
            async move {
                log.push(format!("start {name}"));
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                log.push(format!("end {name}"));
                Ok(FieldValue::from(name))
            }
            .boxed()
        })
    };
    let config = SchemaConfig::new("Query")
        .mutation("Mutation")
        .add_type(ObjectMeta::new("Query", vec![Field::new("x", Type::named("String"))]).into_meta())
        .add_type(ObjectMeta::new("Mutation", vec![slow("first", 30), slow("second", 0)]).into_meta());
    let schema = SchemaType::new(config).expect("valid schema");

    let log = Log(Mutex::new(Vec::new()));
    let document = parse("mutation { first second }").expect("query parses");
    let result = execute(ExecutionArgs::new(&schema, &document, &log)).await;

    assert_eq!(
        serde_json::to_value(result).expect("result serializes"),
        json!({"data": {"first": "first", "second": "second"}}),
    );
    assert_eq!(
        *log.0.lock().expect("not poisoned"),
        ["start first", "end first", "start second", "end second"],
    );
}

#[test]
fn executes_synchronously() {
    let schema = schema();
    let document = parse("{ a greet }").expect("query parses");
    let result = execute_sync(ExecutionArgs::new(&schema, &document, &()).root_value(root()));
    let expected: Object = [("a", Value::scalar("Apple")), ("greet", Value::scalar("hello world"))]
        .into_iter()
        .collect();
    assert_eq!(result.data, Some(expected));
    assert!(result.is_ok());
}

#[tokio::test]
async fn validates_before_executing() {
    let schema = schema();
    let result = graphql(&schema, "{ a } { b }", None, Object::default(), &()).await;
    assert_eq!(
        serde_json::to_value(result).expect("result serializes"),
        json!({
            "data": null,
            "errors": [
                {
                    "message": "This anonymous operation must be the only defined operation.",
                    "locations": [{"line": 1, "column": 1}],
                },
                {
                    "message": "This anonymous operation must be the only defined operation.",
                    "locations": [{"line": 1, "column": 7}],
                },
            ],
        }),
    );

    let result = graphql(&schema, "{ ...Missing }", None, Object::default(), &()).await;
    assert_eq!(result.data, None);
    assert_eq!(result.errors[0].message(), "Unknown fragment \"Missing\".");

    let result = graphql(&schema, "{ a", None, Object::default(), &()).await;
    assert_eq!(result.data, None);
    assert_eq!(result.errors[0].message(), "Unexpected end of input");
}

fn user_schema() -> SchemaType<()> {
    let config = SchemaConfig::new("Query").types([
        ObjectMeta::new("Query", vec![Field::new("user", Type::named("User"))]).into_meta(),
        ObjectMeta::new(
            "User",
            vec![
                Field::new("id", Type::named("ID").non_null()),
                Field::new("name", Type::named("String")),
            ],
        )
        .into_meta(),
    ]);
    SchemaType::new(config).expect("valid schema")
}

#[tokio::test]
async fn nullable_field_returning_null() {
    let schema = user_schema();
    assert_eq!(
        run_query(&schema, "{ user { id name } }", |a| {
            a.root_value(data(json!({"user": {"id": "1", "name": null}})))
        })
        .await,
        json!({"data": {"user": {"id": "1", "name": null}}}),
    );
}

#[tokio::test]
async fn non_null_field_returning_null() {
    let schema = user_schema();
    assert_eq!(
        run_query(&schema, "{ user { id name } }", |a| {
            a.root_value(data(json!({"user": {"id": null, "name": "Ann"}})))
        })
        .await,
        json!({
            "data": {"user": null},
            "errors": [{
                "message": "Cannot return null for non-nullable field User.id",
                "locations": [{"line": 1, "column": 10}],
                "path": ["user", "id"],
            }],
        }),
    );
}
