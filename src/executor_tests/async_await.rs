use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use arcstr::ArcStr;
use futures::FutureExt as _;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::data;
use crate::{
    AbortController, ExecutionArgs, execute, parse,
    ast::Type,
    schema::{
        meta::{Field, InterfaceMeta, ObjectMeta},
        model::{SchemaConfig, SchemaType},
    },
    types::{FieldValue, MaybeAsync},
};

/// Counts the resolvers that started.
#[derive(Default)]
struct Started(AtomicUsize);

/// Field that resolves once every `rendezvous` field has started.
fn rendezvous(name: &'static str) -> Field<Started> {
    Field::new(name, Type::named("String")).resolve_async(move |ctx| {
        let started: &Started = ctx.context;
        async move {
            started.0.fetch_add(1, Ordering::SeqCst);
            while started.0.load(Ordering::SeqCst) < 2 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            Ok(FieldValue::from(name))
        }
        .boxed()
    })
}

fn schema() -> SchemaType<Started> {
    let query = ObjectMeta::new(
        "Query",
        vec![
            rendezvous("left"),
            rendezvous("right"),
            Field::new("fast", Type::named("String")).resolve_value(|_| Ok("fast".into())),
            Field::new("slow", Type::named("String")).resolve_async(|_| {
                async {
                    tokio::time::sleep(Duration::from_secs(10)).await;
                    Ok(FieldValue::from("slow"))
                }
                .boxed()
            }),
            Field::new("strict", Type::named("String").non_null()),
            Field::new("thing", Type::named("Thing"))
                .resolve_value(|_| Ok(data(json!({"name": "widget"})))),
            Field::new("gadget", Type::named("Gadget"))
                .resolve_value(|_| Ok(data(json!({"name": "gadget"})))),
        ],
    );
    let thing = InterfaceMeta::new("Thing", vec![Field::new("name", Type::named("String"))])
        .resolve_type(|_| {
            MaybeAsync::pending(async {
                stall().await;
                Ok(Some(ArcStr::from("Widget")))
            })
        });
    let widget = ObjectMeta::new("Widget", vec![Field::new("name", Type::named("String"))])
        .interfaces(vec![ArcStr::from("Thing")]);
    let gadget = ObjectMeta::new("Gadget", vec![Field::new("name", Type::named("String"))])
        .is_type_of(|_| {
            MaybeAsync::pending(async {
                stall().await;
                Ok(true)
            })
        });

    let config = SchemaConfig::new("Query").types([
        query.into_meta(),
        thing.into_meta(),
        widget.into_meta(),
        gadget.into_meta(),
    ]);
    SchemaType::new(config).expect("valid schema")
}

/// Outlasts any test.
async fn stall() {
    tokio::time::sleep(Duration::from_secs(10)).await;
}

#[tokio::test]
async fn sibling_fields_resolve_concurrently() {
    let schema = schema();
    let started = Started::default();
    let document = parse("{ left right }").expect("query parses");

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        execute(ExecutionArgs::new(&schema, &document, &started)),
    )
    .await
    .expect("siblings wait for each other");
    assert_eq!(
        serde_json::to_value(result).expect("result serializes"),
        json!({"data": {"left": "left", "right": "right"}}),
    );
}

#[tokio::test]
async fn first_non_null_error_wins() {
    let schema = schema();
    let started = Started::default();
    let document = parse("{ x: strict y: strict }").expect("query parses");

    let result = execute(ExecutionArgs::new(&schema, &document, &started)).await;
    assert_eq!(
        serde_json::to_value(result).expect("result serializes"),
        json!({
            "data": null,
            "errors": [{
                "message": "Cannot return null for non-nullable field Query.strict",
                "locations": [{"line": 1, "column": 3}],
                "path": ["x"],
            }],
        }),
    );
}

#[tokio::test]
async fn abort_interrupts_pending_resolvers() {
    let schema = schema();
    let started = Started::default();
    let document = parse("{ fast slow }").expect("query parses");
    let controller = AbortController::new();

    let args = ExecutionArgs::new(&schema, &document, &started).abort_signal(controller.signal());
    let (result, ()) = futures::join!(execute(args), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.abort();
    });
    assert_eq!(
        serde_json::to_value(result).expect("result serializes"),
        json!({
            "data": {"fast": "fast", "slow": null},
            "errors": [{
                "message": "This operation was aborted",
                "locations": [{"line": 1, "column": 8}],
                "path": ["slow"],
            }],
        }),
    );
}

#[tokio::test]
async fn abort_interrupts_type_checks() {
    let schema = schema();
    let started = Started::default();
    let document = parse("{ thing { name } gadget { name } }").expect("query parses");
    let controller = AbortController::new();

    let args = ExecutionArgs::new(&schema, &document, &started).abort_signal(controller.signal());
    let (result, ()) = tokio::time::timeout(Duration::from_secs(5), async {
        futures::join!(execute(args), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller.abort();
        })
    })
    .await
    .expect("abort ends pending type checks");
    assert_eq!(
        serde_json::to_value(result).expect("result serializes"),
        json!({
            "data": {"thing": null, "gadget": null},
            "errors": [
                {
                    "message": "This operation was aborted",
                    "locations": [{"line": 1, "column": 3}],
                    "path": ["thing"],
                },
                {
                    "message": "This operation was aborted",
                    "locations": [{"line": 1, "column": 18}],
                    "path": ["gadget"],
                },
            ],
        }),
    );
}

#[tokio::test]
async fn aborted_request_resolves_nothing() {
    let schema = schema();
    let started = Started::default();
    let document = parse("{ fast }").expect("query parses");
    let controller = AbortController::new();
    controller.abort_with_reason("client went away");

    let args = ExecutionArgs::new(&schema, &document, &started).abort_signal(controller.signal());
    assert_eq!(
        serde_json::to_value(execute(args).await).expect("result serializes"),
        json!({
            "data": {"fast": null},
            "errors": [{
                "message": "client went away",
                "locations": [{"line": 1, "column": 3}],
                "path": ["fast"],
            }],
        }),
    );
}

#[tokio::test]
async fn response_keys_keep_query_order() {
    let schema = schema();
    let started = Started::default();
    let document = parse("{ left fast right }").expect("query parses");

    let result = execute(ExecutionArgs::new(&schema, &document, &started)).await;
    assert_eq!(
        serde_json::to_string(&result).expect("result serializes"),
        r#"{"data":{"left":"left","fast":"fast","right":"right"}}"#,
    );
}
