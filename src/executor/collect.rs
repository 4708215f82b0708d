//! Field collection: flattening selection sets into the fields to execute,
//! grouped by response key.

use std::sync::Arc;

use fnv::{FnvHashMap, FnvHashSet};
use indexmap::IndexMap;

use crate::{
    ast::{self, Directive, Fragment, Selection},
    coercion::{FragmentVariables, VariableScope, coerce_directive_values, coerce_fragment_variables},
    parser::Spanning,
    schema::{meta::ObjectMeta, model::SchemaType},
    value::{Object, Value},
};

/// Fragment definitions of a document, by name.
pub type Fragments<'a> = FnvHashMap<&'a str, &'a Fragment<'a>>;

/// One occurrence of a field in a query.
#[derive(Clone, Debug)]
pub struct FieldDetails<'a> {
    /// Field node.
    pub node: &'a Spanning<ast::Field<'a>>,
    /// Variables of the fragment the field was reached through, if that
    /// fragment declares any.
    pub fragment_variables: Option<Arc<FragmentVariables>>,
}

/// Field occurrences grouped by response key, in the order the keys first
/// appear in the query.
pub type GroupedFieldSet<'a> = IndexMap<&'a str, Vec<FieldDetails<'a>>>;

/// Fields selected on one object, split into those delivered right away and
/// the deferred fragments.
#[derive(Clone, Debug, Default)]
pub struct CollectedFields<'a> {
    /// Fields delivered with the enclosing object.
    pub grouped_field_set: GroupedFieldSet<'a>,
    /// Fragments delivered later, in query order.
    pub deferred: Vec<DeferredFragment<'a>>,
}

/// Fragment selected with an active `@defer`.
#[derive(Clone, Debug)]
pub struct DeferredFragment<'a> {
    /// Label given to `@defer`.
    pub label: Option<String>,
    /// Fields of the fragment, with its own nested deferred fragments.
    pub fields: CollectedFields<'a>,
}

impl CollectedFields<'_> {
    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.grouped_field_set.is_empty() && self.deferred.is_empty()
    }
}

/// Collects the fields of `selection_set` applying to values of
/// `object_type`.
///
/// Fields excluded by `@skip` or `@include` are left out, as are fragments
/// that are unknown or whose type condition doesn't apply.
pub fn collect_fields<'a, C>(
    schema: &SchemaType<C>,
    fragments: &Fragments<'a>,
    variables: &Object,
    object_type: &ObjectMeta<C>,
    selection_set: &'a [Selection<'a>],
) -> CollectedFields<'a> {
    let mut collector = Collector::new(schema, fragments, variables, object_type);
    let mut collected = CollectedFields::default();
    collector.collect(selection_set, None, &mut collected);
    collected
}

/// Collects the fields selected on the values of one response key: the
/// sub-selections of all its occurrences, merged.
pub fn collect_subfields<'a, C>(
    schema: &SchemaType<C>,
    fragments: &Fragments<'a>,
    variables: &Object,
    object_type: &ObjectMeta<C>,
    field_details: &[FieldDetails<'a>],
) -> CollectedFields<'a> {
    let mut collector = Collector::new(schema, fragments, variables, object_type);
    let mut collected = CollectedFields::default();
    for details in field_details {
        if let Some(selection_set) = &details.node.item.selection_set {
            collector.collect(selection_set, details.fragment_variables.as_ref(), &mut collected);
        }
    }
    collected
}

struct Collector<'c, 'a, C> {
    schema: &'c SchemaType<C>,
    fragments: &'c Fragments<'a>,
    variables: &'c Object,
    object_type: &'c ObjectMeta<C>,
    visited_fragments: FnvHashSet<&'a str>,
}

impl<'c, 'a, C> Collector<'c, 'a, C> {
    fn new(
        schema: &'c SchemaType<C>,
        fragments: &'c Fragments<'a>,
        variables: &'c Object,
        object_type: &'c ObjectMeta<C>,
    ) -> Self {
        Self {
            schema,
            fragments,
            variables,
            object_type,
            visited_fragments: FnvHashSet::default(),
        }
    }

    fn scope<'s>(&'s self, fragment_variables: Option<&'s Arc<FragmentVariables>>) -> VariableScope<'s> {
        VariableScope::new(self.variables).with_fragment(fragment_variables.map(|f| &**f))
    }

    fn collect(
        &mut self,
        selection_set: &'a [Selection<'a>],
        fragment_variables: Option<&Arc<FragmentVariables>>,
        out: &mut CollectedFields<'a>,
    ) {
        for selection in selection_set {
            match selection {
                Selection::Field(field) => {
                    if self.is_excluded(&field.item.directives, fragment_variables) {
                        continue;
                    }
                    out.grouped_field_set
                        .entry(field.item.response_key())
                        .or_default()
                        .push(FieldDetails {
                            node: field,
                            fragment_variables: fragment_variables.cloned(),
                        });
                }
                Selection::InlineFragment(fragment) => {
                    let fragment = &fragment.item;
                    if self.is_excluded(&fragment.directives, fragment_variables) {
                        continue;
                    }
                    if let Some(condition) = &fragment.type_condition {
                        if !self.schema.type_condition_applies(condition.item, self.object_type) {
                            continue;
                        }
                    }
                    match self.defer_label(&fragment.directives, fragment_variables) {
                        Some(label) => {
                            let mut fields = CollectedFields::default();
                            self.collect(&fragment.selection_set, fragment_variables, &mut fields);
                            out.deferred.push(DeferredFragment { label, fields });
                        }
                        None => self.collect(&fragment.selection_set, fragment_variables, out),
                    }
                }
                Selection::FragmentSpread(spread) => {
                    let spread = &spread.item;
                    if self.is_excluded(&spread.directives, fragment_variables) {
                        continue;
                    }
                    let name = spread.name.item;
                    if self.visited_fragments.contains(name) {
                        continue;
                    }
                    let defer = self.defer_label(&spread.directives, fragment_variables);
                    if defer.is_none() {
                        self.visited_fragments.insert(name);
                    }
                    let Some(fragment) = self.fragments.get(name).copied() else {
                        continue;
                    };
                    if !self
                        .schema
                        .type_condition_applies(fragment.type_condition.item, self.object_type)
                    {
                        continue;
                    }

                    let inner_variables = fragment.variable_definitions.as_ref().map(|defs| {
                        Arc::new(coerce_fragment_variables(
                            self.schema,
                            &defs.item,
                            spread.arguments.as_ref(),
                            self.scope(fragment_variables),
                        ))
                    });
                    match defer {
                        Some(label) => {
                            let mut fields = CollectedFields::default();
                            self.collect(&fragment.selection_set, inner_variables.as_ref(), &mut fields);
                            out.deferred.push(DeferredFragment { label, fields });
                        }
                        None => self.collect(&fragment.selection_set, inner_variables.as_ref(), out),
                    }
                }
            }
        }
    }

    /// Evaluates the `if` argument of the directive `name`, if present and
    /// valid.
    fn directive_condition(
        &self,
        directives: &Option<Vec<Spanning<Directive<'a>>>>,
        name: &str,
        fragment_variables: Option<&Arc<FragmentVariables>>,
    ) -> Option<Object> {
        let node = ast::find_directive(directives, name)?;
        let def = self.schema.directive_by_name(name)?;
        coerce_directive_values(self.schema, def, node, self.scope(fragment_variables)).ok()
    }

    fn is_excluded(
        &self,
        directives: &Option<Vec<Spanning<Directive<'a>>>>,
        fragment_variables: Option<&Arc<FragmentVariables>>,
    ) -> bool {
        let condition = |name: &str| {
            self.directive_condition(directives, name, fragment_variables)
                .and_then(|args| args.get_field_value("if").and_then(Value::as_bool_value))
        };
        condition("skip") == Some(true) || condition("include") == Some(false)
    }

    /// Label of an active `@defer`, or [`None`] if the fragment isn't
    /// deferred.
    fn defer_label(
        &self,
        directives: &Option<Vec<Spanning<Directive<'a>>>>,
        fragment_variables: Option<&Arc<FragmentVariables>>,
    ) -> Option<Option<String>> {
        let args = self.directive_condition(directives, "defer", fragment_variables)?;
        if args.get_field_value("if").and_then(Value::as_bool_value) == Some(false) {
            return None;
        }
        Some(
            args.get_field_value("label")
                .and_then(Value::as_string_value)
                .map(Into::into),
        )
    }
}
