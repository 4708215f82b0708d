use std::time::Duration;

use futures::{StreamExt as _, stream};
use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};

use super::{data, run_query};
use crate::{
    ExecutionArgs, ExecutionOutput, execute_incrementally, parse,
    ast::Type,
    schema::{
        meta::{Field, ObjectMeta},
        model::{SchemaConfig, SchemaType},
    },
    types::FieldValue,
};

fn schema() -> SchemaType<()> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("a", Type::named("String")),
            Field::new("b", Type::named("String")),
            Field::new("hero", Type::named("Hero")),
            Field::new("list", Type::list(Type::named("Int"))),
            Field::new("heroes", Type::list(Type::named("Hero").non_null())),
            Field::new("ticks", Type::list(Type::named("Int"))).resolve_value(|_| Ok(ticks())),
            Field::new("broken", Type::list(Type::named("Int"))).resolve_value(|_| {
                Ok(FieldValue::stream(stream::iter([
                    Ok(FieldValue::from(1)),
                    Err("sensor offline".into()),
                ])))
            }),
        ],
    );
    let hero = ObjectMeta::new(
        "Hero",
        vec![
            Field::new("id", Type::named("ID").non_null()),
            Field::new("name", Type::named("String")),
            Field::new("fails", Type::named("String")).resolve_value(|_| Err("nope".into())),
        ],
    );
    let config = SchemaConfig::new("Query").types([query.into_meta(), hero.into_meta()]);
    SchemaType::new(config).expect("valid schema")
}

fn root() -> FieldValue {
    data(json!({
        "a": "a",
        "b": "b",
        "hero": {"id": 1, "name": "Luke"},
        "list": [1, 2, 3],
        "heroes": [{"id": 1}, {"name": "nameless"}, {"id": 3}],
    }))
}

/// Numbers 1 to 3, each produced after a short delay.
fn ticks() -> FieldValue {
    FieldValue::stream(stream::iter(1..=3).then(|i| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(FieldValue::from(i))
    }))
}

/// Initial result and subsequent payloads of `query`.
async fn run(query: &str) -> (Json, Vec<Json>) {
    let schema = schema();
    let document = parse(query).expect("query parses");
    let args = ExecutionArgs::new(&schema, &document, &()).root_value(root());
    match execute_incrementally(args).await {
        ExecutionOutput::Single(result) => {
            (serde_json::to_value(result).expect("result serializes"), Vec::new())
        }
        ExecutionOutput::Incremental { initial, subsequent } => (
            serde_json::to_value(initial).expect("result serializes"),
            subsequent
                .map(|payload| serde_json::to_value(payload).expect("payload serializes"))
                .collect()
                .await,
        ),
    }
}

#[tokio::test]
async fn defers_fragment_spread() {
    let query = r#"
        { hero { id ...NameFragment @defer(label: "DeferName") } }
        fragment NameFragment on Hero { name }
    "#;
    assert_eq!(
        run(query).await,
        (
            json!({"data": {"hero": {"id": "1"}}, "hasNext": true}),
            vec![json!({
                "incremental": [{"data": {"name": "Luke"}, "path": ["hero"], "label": "DeferName"}],
                "hasNext": false,
            })],
        ),
    );
}

#[tokio::test]
async fn defers_inline_fragment_at_root() {
    assert_eq!(
        run("{ a ... @defer { b } }").await,
        (
            json!({"data": {"a": "a"}, "hasNext": true}),
            vec![json!({"incremental": [{"data": {"b": "b"}, "path": []}], "hasNext": false})],
        ),
    );
}

#[tokio::test]
async fn disabled_defer_is_inlined() {
    assert_eq!(
        run("{ a ... @defer(if: false) { b } }").await,
        (json!({"data": {"a": "a", "b": "b"}}), Vec::new()),
    );
}

#[tokio::test]
async fn deferring_an_already_selected_fragment_is_a_noop() {
    assert_eq!(
        run("{ ...F ...F @defer } fragment F on Query { a }").await,
        (json!({"data": {"a": "a"}}), Vec::new()),
    );
}

#[tokio::test]
async fn nested_defer_follows_its_parent() {
    let (initial, subsequent) = run("{ a ... @defer { hero { id ... @defer { name } } } }").await;
    assert_eq!(initial, json!({"data": {"a": "a"}, "hasNext": true}));
    assert_eq!(
        subsequent,
        [
            json!({"incremental": [{"data": {"hero": {"id": "1"}}, "path": []}], "hasNext": true}),
            json!({"incremental": [{"data": {"name": "Luke"}, "path": ["hero"]}], "hasNext": false}),
        ],
    );
}

#[tokio::test]
async fn errors_of_deferred_fields() {
    let (initial, subsequent) = run("{ hero { id ... @defer { fails } } }").await;
    assert_eq!(initial, json!({"data": {"hero": {"id": "1"}}, "hasNext": true}));
    assert_eq!(
        subsequent,
        [json!({
            "incremental": [{
                "data": {"fails": null},
                "errors": [{
                    "message": "nope",
                    "locations": [{"line": 1, "column": 26}],
                    "path": ["hero", "fails"],
                }],
                "path": ["hero"],
            }],
            "hasNext": false,
        })],
    );
}

#[tokio::test]
async fn nulled_parent_drops_deferred_work() {
    let (result, subsequent) = run("{ heroes { ... @defer { name } id } }").await;
    assert_eq!(result["data"], json!({"heroes": null}));
    assert_eq!(
        result["errors"][0]["message"],
        json!("Cannot return null for non-nullable field Hero.id"),
    );
    assert!(subsequent.is_empty());
}

#[tokio::test]
async fn streams_items_one_by_one() {
    assert_eq!(
        run(r#"{ list @stream(initialCount: 1, label: "numbers") }"#).await,
        (
            json!({"data": {"list": [1]}, "hasNext": true}),
            vec![
                json!({
                    "incremental": [{"items": [2], "path": ["list", 1], "label": "numbers"}],
                    "hasNext": true,
                }),
                json!({
                    "incremental": [{"items": [3], "path": ["list", 2], "label": "numbers"}],
                    "hasNext": false,
                }),
            ],
        ),
    );
}

#[tokio::test]
async fn stream_covering_whole_list_is_single_result() {
    assert_eq!(
        run("{ list @stream(initialCount: 3) }").await,
        (json!({"data": {"list": [1, 2, 3]}}), Vec::new()),
    );
}

#[tokio::test]
async fn negative_initial_count() {
    assert_eq!(
        run("{ list @stream(initialCount: -1) }").await,
        (
            json!({
                "data": {"list": null},
                "errors": [{
                    "message": "initialCount must be a positive integer",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["list"],
                }],
            }),
            Vec::new(),
        ),
    );
}

#[tokio::test]
async fn failed_streamed_item_ends_stream() {
    let (initial, subsequent) = run("{ heroes @stream { id } }").await;
    assert_eq!(initial, json!({"data": {"heroes": []}, "hasNext": true}));
    assert_eq!(
        subsequent,
        [
            json!({
                "incremental": [{"items": [{"id": "1"}], "path": ["heroes", 0]}],
                "hasNext": true,
            }),
            json!({
                "incremental": [{
                    "items": null,
                    "errors": [{
                        "message": "Cannot return null for non-nullable field Hero.id",
                        "locations": [{"line": 1, "column": 20}],
                        "path": ["heroes", 1, "id"],
                    }],
                    "path": ["heroes", 1],
                }],
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn unstreamed_source_is_awaited_whole() {
    assert_eq!(
        run("{ ticks }").await,
        (json!({"data": {"ticks": [1, 2, 3]}}), Vec::new()),
    );
}

#[tokio::test]
async fn streams_items_as_the_source_yields_them() {
    assert_eq!(
        run("{ ticks @stream(initialCount: 1) }").await,
        (
            json!({"data": {"ticks": [1]}, "hasNext": true}),
            vec![
                json!({"incremental": [{"items": [2], "path": ["ticks", 1]}], "hasNext": true}),
                json!({"incremental": [{"items": [3], "path": ["ticks", 2]}], "hasNext": true}),
                json!({"hasNext": false}),
            ],
        ),
    );
}

#[tokio::test]
async fn source_error_nulls_unstreamed_list() {
    assert_eq!(
        run("{ broken }").await,
        (
            json!({
                "data": {"broken": null},
                "errors": [{
                    "message": "sensor offline",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["broken"],
                }],
            }),
            Vec::new(),
        ),
    );
}

#[tokio::test]
async fn source_error_ends_stream() {
    let (initial, subsequent) = run("{ broken @stream }").await;
    assert_eq!(initial, json!({"data": {"broken": []}, "hasNext": true}));
    assert_eq!(
        subsequent,
        [
            json!({"incremental": [{"items": [1], "path": ["broken", 0]}], "hasNext": true}),
            json!({
                "incremental": [{
                    "items": null,
                    "errors": [{
                        "message": "sensor offline",
                        "locations": [{"line": 1, "column": 3}],
                        "path": ["broken", 1],
                    }],
                    "path": ["broken", 1],
                }],
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn single_result_execution_refuses_incremental_operations() {
    let schema = schema();
    for query in ["{ a ... @defer { b } }", "{ list @stream }"] {
        assert_eq!(
            run_query(&schema, query, |a| a.root_value(root())).await,
            json!({
                "data": null,
                "errors": [{
                    "message": "Executing this GraphQL operation would unexpectedly produce \
                                multiple payloads (due to @defer or @stream directive)",
                }],
            }),
        );
    }
}
