use query_binder::QueryBind;

#[derive(QueryBind, Default)]
pub struct Search {
    #[query(bogus)]
    text: String,
}

fn main() {
    let search = Search::default();
    let _ = search.text;
}
