use query_binder::QueryBind;

#[derive(QueryBind)]
pub struct Search<T> {
    text: T,
}

fn main() {
    let search = Search { text: 1u8 };
    let _ = search.text;
}
