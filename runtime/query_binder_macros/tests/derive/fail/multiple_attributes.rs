use query_binder::QueryBind;

#[derive(QueryBind, Default)]
pub struct Search {
    #[query("q")]
    #[query(skip)]
    text: String,
}

fn main() {
    let search = Search::default();
    let _ = search.text;
}
