//! Star Wars characters, exposed through a schema built at runtime.
//!
//! Humans and droids are host objects: their fields are read by resolvers
//! downcasting the parent value, and characters are tagged with their type so
//! the `Character` interface resolves without a type resolver.

use std::collections::HashMap;

use arcstr::ArcStr;
use futures::{StreamExt as _, stream};

use crate::{
    ast::Type,
    executor::{FieldResult, ResolverContext},
    schema::{
        meta::{Argument, EnumMeta, EnumValue, Field, InterfaceMeta, ObjectMeta},
        model::{SchemaConfig, SchemaType},
    },
    types::{FieldValue, MaybeAsync},
    value::Value,
};

pub const NEW_HOPE: i32 = 4;
pub const EMPIRE: i32 = 5;
pub const JEDI: i32 = 6;

#[derive(Clone, Debug)]
pub struct Human {
    pub id: String,
    pub name: String,
    pub friend_ids: Vec<String>,
    pub appears_in: Vec<i32>,
    pub home_planet: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Droid {
    pub id: String,
    pub name: String,
    pub friend_ids: Vec<String>,
    pub appears_in: Vec<i32>,
    pub primary_function: Option<String>,
}

#[derive(Default)]
pub struct Database {
    humans: HashMap<String, Human>,
    droids: HashMap<String, Droid>,
}

impl Database {
    pub fn new() -> Self {
        let mut db = Self::default();
        let all = vec![NEW_HOPE, EMPIRE, JEDI];
        for (id, name, friends, appears_in, home_planet) in [
            ("1000", "Luke Skywalker", &["1002", "1003", "2000", "2001"][..], all.clone(), Some("Tatooine")),
            ("1001", "Darth Vader", &["1004"][..], all.clone(), Some("Tatooine")),
            ("1002", "Han Solo", &["1000", "1003", "2001"][..], all.clone(), None),
            ("1003", "Leia Organa", &["1000", "1002", "2000", "2001"][..], all.clone(), Some("Alderaan")),
            ("1004", "Wilhuff Tarkin", &["1001"][..], vec![NEW_HOPE], None),
        ] {
            db.humans.insert(
                id.into(),
                Human {
                    id: id.into(),
                    name: name.into(),
                    friend_ids: friends.iter().map(|&f| f.into()).collect(),
                    appears_in,
                    home_planet: home_planet.map(Into::into),
                },
            );
        }
        for (id, name, friends, primary_function) in [
            ("2000", "C-3PO", &["1000", "1002", "1003", "2001"][..], "Protocol"),
            ("2001", "R2-D2", &["1000", "1002", "1003"][..], "Astromech"),
        ] {
            db.droids.insert(
                id.into(),
                Droid {
                    id: id.into(),
                    name: name.into(),
                    friend_ids: friends.iter().map(|&f| f.into()).collect(),
                    appears_in: all.clone(),
                    primary_function: Some(primary_function.into()),
                },
            );
        }
        db
    }

    pub fn human(&self, id: &str) -> Option<&Human> {
        self.humans.get(id)
    }

    pub fn droid(&self, id: &str) -> Option<&Droid> {
        self.droids.get(id)
    }

    /// Character with the given `id`, tagged with its object type.
    pub fn character(&self, id: &str) -> Option<FieldValue> {
        if let Some(h) = self.human(id) {
            return Some(FieldValue::owned(h.clone()).with_type("Human"));
        }
        self.droid(id)
            .map(|d| FieldValue::owned(d.clone()).with_type("Droid"))
    }

    /// R2-D2 is the hero of the saga, Luke the hero of The Empire Strikes
    /// Back.
    pub fn hero(&self, episode: Option<i32>) -> FieldValue {
        let id = if episode == Some(EMPIRE) { "1000" } else { "2001" };
        self.character(id).unwrap_or_default()
    }

    fn friends(&self, ids: &[String]) -> FieldValue {
        FieldValue::list(ids.iter().filter_map(|id| self.character(id)))
    }
}

fn episodes(appears_in: &[i32]) -> FieldValue {
    FieldValue::list(appears_in.iter().map(|&e| FieldValue::value(e)))
}

fn optional(s: &Option<String>) -> FieldValue {
    s.as_deref().map_or(FieldValue::Null, FieldValue::from)
}

fn human_field<F>(name: &'static str, t: Type<'static>, f: F) -> Field<Database>
where
    F: Fn(&Human, &Database) -> FieldResult<FieldValue> + Send + Sync + 'static,
{
    Field::new(name, t).resolve_value(move |ctx| match ctx.source.downcast_ref::<Human>() {
        Some(h) => f(h, ctx.context),
        None => Ok(FieldValue::Null),
    })
}

fn droid_field<F>(name: &'static str, t: Type<'static>, f: F) -> Field<Database>
where
    F: Fn(&Droid, &Database) -> FieldResult<FieldValue> + Send + Sync + 'static,
{
    Field::new(name, t).resolve_value(move |ctx| match ctx.source.downcast_ref::<Droid>() {
        Some(d) => f(d, ctx.context),
        None => Ok(FieldValue::Null),
    })
}

fn id_argument() -> Argument {
    Argument::new("id", Type::named("String").non_null()).description("id of the character")
}

/// The Star Wars schema: `Query`, and a `Subscription` replaying the heroes
/// of each episode.
pub fn schema() -> SchemaType<Database> {
    let id = Type::named("String").non_null();
    let name = Type::named("String");
    let friends = Type::list(Type::named("Character"));
    let appears_in = Type::list(Type::named("Episode"));

    let character = InterfaceMeta::new(
        "Character",
        vec![
            Field::new("id", id.clone()).description("The id of the character"),
            Field::new("name", name.clone()).description("The name of the character"),
            Field::new("friends", friends.clone()).description("The friends of the character"),
            Field::new("appearsIn", appears_in.clone()).description("Which movies they appear in"),
        ],
    )
    .description("A character in the Star Wars Trilogy");

    let human = ObjectMeta::new(
        "Human",
        vec![
            human_field("id", id.clone(), |h, _| Ok(h.id.as_str().into())),
            human_field("name", name.clone(), |h, _| Ok(h.name.as_str().into())),
            human_field("friends", friends.clone(), |h, db| Ok(db.friends(&h.friend_ids))),
            human_field("appearsIn", appears_in.clone(), |h, _| Ok(episodes(&h.appears_in))),
            human_field("homePlanet", Type::named("String"), |h, _| Ok(optional(&h.home_planet))),
            human_field("secretBackstory", Type::named("String"), |_, _| {
                Err("secretBackstory is secret.".into())
            }),
        ],
    )
    .description("A humanoid creature in the Star Wars universe.")
    .interfaces(vec![ArcStr::from("Character")]);

    let droid = ObjectMeta::new(
        "Droid",
        vec![
            droid_field("id", id, |d, _| Ok(d.id.as_str().into())),
            droid_field("name", name, |d, _| Ok(d.name.as_str().into())),
            droid_field("friends", friends, |d, db| Ok(db.friends(&d.friend_ids))),
            droid_field("appearsIn", appears_in, |d, _| Ok(episodes(&d.appears_in))),
            droid_field("primaryFunction", Type::named("String"), |d, _| {
                Ok(optional(&d.primary_function))
            }),
        ],
    )
    .description("A mechanical creature in the Star Wars universe.")
    .interfaces(vec![ArcStr::from("Character")]);

    let episode = EnumMeta::new(
        "Episode",
        vec![
            EnumValue::new("NEW_HOPE").value(NEW_HOPE).description("Released in 1977."),
            EnumValue::new("EMPIRE").value(EMPIRE).description("Released in 1980."),
            EnumValue::new("JEDI").value(JEDI).description("Released in 1983."),
        ],
    )
    .description("One of the films in the Star Wars Trilogy");

    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("hero", Type::named("Character"))
                .argument(Argument::new("episode", Type::named("Episode")).description(
                    "If omitted, returns the hero of the whole saga. If provided, returns the \
                     hero of that particular episode.",
                ))
                .resolve_value(|ctx: ResolverContext<'_, Database>| {
                    let episode = ctx.arg("episode").and_then(Value::as_int_value);
                    Ok(ctx.context.hero(episode))
                }),
            Field::new("human", Type::named("Human"))
                .argument(id_argument())
                .resolve_value(|ctx: ResolverContext<'_, Database>| {
                    let id = ctx.arg("id").and_then(Value::as_string_value).unwrap_or_default();
                    Ok(ctx
                        .context
                        .human(id)
                        .map_or(FieldValue::Null, |h| FieldValue::owned(h.clone())))
                }),
            Field::new("droid", Type::named("Droid"))
                .argument(id_argument())
                .resolve_value(|ctx: ResolverContext<'_, Database>| {
                    let id = ctx.arg("id").and_then(Value::as_string_value).unwrap_or_default();
                    Ok(ctx
                        .context
                        .droid(id)
                        .map_or(FieldValue::Null, |d| FieldValue::owned(d.clone())))
                }),
        ],
    )
    .description("The root query object of the schema");

    let subscription = ObjectMeta::new(
        "Subscription",
        vec![
            Field::new("heroes", Type::named("Character").non_null())
                .description("Heroes of every episode, one event each")
                .subscribe(|ctx: ResolverContext<'_, Database>| {
                    let events: Vec<FieldResult<FieldValue>> = [NEW_HOPE, EMPIRE, JEDI]
                        .into_iter()
                        .map(|e| Ok(ctx.context.hero(Some(e))))
                        .collect();
                    MaybeAsync::Ready(Ok(stream::iter(events).boxed()))
                })
                .resolve_value(|ctx: ResolverContext<'_, Database>| Ok(ctx.source.clone())),
        ],
    );

    let config = SchemaConfig::new("Query")
        .subscription("Subscription")
        .types([
            query.into_meta(),
            subscription.into_meta(),
            character.into_meta(),
            human.into_meta(),
            droid.into_meta(),
            episode.into_meta(),
        ]);
    SchemaType::new(config).expect("Star Wars schema is valid")
}
