use std::collections::VecDeque;
use std::sync::Arc;

use query_binder::{FieldErrors, QueryBind, SanitizeQuery, UnmarshalQuery};

#[derive(Debug, Default, PartialEq)]
pub struct State(i8);

impl UnmarshalQuery for State {
    type Error = String;

    fn unmarshal_query(raw: &str) -> Result<Self, Self::Error> {
        raw.parse().map(State).map_err(|_| format!("unknown state `{raw}`"))
    }
}

#[derive(Debug, Default, PartialEq, serde::Deserialize)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

#[derive(QueryBind, Default)]
pub struct NoAnnotations {
    name: String,
    page: u32,
    ids: Vec<u64>,
}

#[derive(QueryBind, Default)]
pub struct Annotated {
    #[query("n,anonymous")]
    name: String,
    #[query(",1")]
    page: u32,
    #[query("state")]
    state: State,
    #[query("order,asc")]
    order: Order,
    #[query("states")]
    states: VecDeque<State>,
    limit: Option<u32>,
    scores: Vec<Option<u8>>,
}

/// A type that can't be decoded from a query value.
#[derive(Default)]
pub struct Opaque;

#[derive(QueryBind, Default)]
pub struct Skipped {
    #[query("-")]
    opaque: Opaque,
    #[query(skip)]
    other: Opaque,
    shared: Arc<String>,
    buffer: [u8; 16],
    callback: Option<fn(u8) -> u8>,
    pair: (u8, u8),
}

#[derive(QueryBind, Default)]
#[query(sanitize)]
pub struct Nested {
    #[query(flatten)]
    inner: Annotated,
    r#type: String,
}

impl SanitizeQuery for Nested {
    fn sanitize_query(&mut self, errors: &mut FieldErrors) {
        if self.r#type.is_empty() {
            errors.push("type", "must be provided");
        }
    }
}

fn main() {
    assert_eq!(NoAnnotations::fields().len(), 3);
    assert_eq!(Skipped::fields().len(), 6);
    assert_eq!(Nested::fields().len(), 8);
}
