mod abstract_types;
mod async_await;
mod directives;
mod executor;
mod fragment_arguments;
mod incremental;
mod variables;

use serde_json::Value as Json;

use crate::{
    ExecutionArgs, execute, parse,
    schema::model::SchemaType,
    types::FieldValue,
    value::{Object, Value},
};

/// Plain data built from JSON.
pub(crate) fn data(json: Json) -> FieldValue {
    FieldValue::Value(serde_json::from_value::<Value>(json).expect("valid data"))
}

/// Variables built from a JSON object.
pub(crate) fn vars(json: Json) -> Object {
    serde_json::from_value(json).expect("valid variables")
}

/// Executes `query` with the unit context, returning the serialized result.
pub(crate) async fn run_query<F>(schema: &SchemaType<()>, query: &str, configure: F) -> Json
where
    F: for<'a> FnOnce(ExecutionArgs<'a, ()>) -> ExecutionArgs<'a, ()>,
{
    let document = parse(query).expect("query parses");
    let args = configure(ExecutionArgs::new(schema, &document, &()));
    serde_json::to_value(execute(args).await).expect("result serializes")
}
