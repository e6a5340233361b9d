use query_binder::{
    FieldErrors, FieldKind, QueryBind, RawQueryParams, SanitizeQuery, UnmarshalQuery,
};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum State {
    #[default]
    Unset,
    Normal,
    Locked,
    Left,
}

impl UnmarshalQuery for State {
    type Error = anyhow::Error;

    fn unmarshal_query(raw: &str) -> Result<Self, Self::Error> {
        match raw {
            "normal" => Ok(State::Normal),
            "locked" => Ok(State::Locked),
            "left" => Ok(State::Left),
            _ => Err(anyhow::anyhow!("invalid state: {raw}")),
        }
    }
}

#[derive(QueryBind, Debug, Default)]
#[query(sanitize)]
pub struct TestQueryString {
    #[query("string,str1,str2")]
    pub string: String,
    #[query("strings,str1,str2")]
    pub strings: Vec<String>,
    #[query("state,normal")]
    pub state: State,
}

impl SanitizeQuery for TestQueryString {
    fn sanitize_query(&mut self, errors: &mut FieldErrors) {
        if self.state == State::Unset {
            errors.push("state", "invalid value");
        }
    }
}

#[derive(QueryBind, Debug, Default)]
#[query(sanitize)]
pub struct TestQueryObject {
    #[query(flatten)]
    pub base: TestQueryString,
    #[query("int,1")]
    pub int: i64,
    #[query("floats,1.1,2.2")]
    pub floats: Vec<f64>,
    #[query("states,normal,left")]
    pub states: Vec<State>,

    // Ignored even without `#[query("-")]`.
    pub array: [i32; 5],
    #[query("-")]
    pub ints: Vec<i32>,
    #[query(skip)]
    pub float: f32,
}

impl SanitizeQuery for TestQueryObject {
    fn sanitize_query(&mut self, errors: &mut FieldErrors) {
        self.base.sanitize_query(errors);
        if self.int == 0 {
            errors.push("int", "invalid value");
        }
    }
}

fn bind<T: QueryBind>(query: &str, target: &mut T) -> FieldErrors {
    query_binder::bind(&RawQueryParams::parse(query), target)
}

#[test]
fn explicit_zero_wins_over_tag_default() {
    let mut data = TestQueryObject::default();
    let errors = bind("string=str&strings=s1,s2&int=0", &mut data);
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(data.int, 0);

    // The post-binding hook is what flags the zero value.
    let mut data = TestQueryObject::default();
    let errors = query_binder::parse(
        &RawQueryParams::parse("string=str&strings=s1,s2&int=0"),
        &mut data,
    );
    assert_eq!(errors.get("int"), ["invalid value"]);
    assert_eq!(errors.len(), 1);
}

#[test]
fn tag_defaults_fill_missing_parameters() {
    let mut data = TestQueryObject::default();
    let errors = bind("string=str&strings=s1,s2", &mut data);
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(data.base.string, "str");
    assert_eq!(data.base.state, State::Normal);
    assert_eq!(data.base.strings, vec!["s1", "s2"]);
    assert_eq!(data.int, 1);
    assert_eq!(data.floats, vec![1.1, 2.2]);
    assert_eq!(data.states, vec![State::Normal, State::Left]);
}

#[test]
fn scalar_defaults_are_not_split() {
    let mut data = TestQueryObject::default();
    let errors = bind("floats=1,1.1&int=5&strings=s1", &mut data);
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(data.base.string, "str1,str2");
    assert_eq!(data.floats, vec![1.0, 1.1]);
    assert_eq!(data.base.strings, vec!["s1"]);
    assert_eq!(data.int, 5);
}

#[test]
fn a_failing_field_does_not_affect_the_others() {
    let mut data = TestQueryObject {
        floats: vec![3.3, 4.4],
        ..Default::default()
    };
    let errors = bind("floats=str,1.1&array=10&int=5&strings=s1", &mut data);
    assert_eq!(errors.len(), 1);
    insta::assert_snapshot!(errors.get("floats")[0], @"`str` is not a valid `f64`: invalid float literal");
    assert!(data.floats.is_empty());
    assert_eq!(data.base.string, "str1,str2");
    assert_eq!(data.base.strings, vec!["s1"]);
    assert_eq!(data.int, 5);
    assert_eq!(data.array, [0; 5]);
}

#[test]
fn failed_scalars_keep_their_previous_value() {
    let mut data = TestQueryObject::default();
    let errors = bind("int=abc&state=unknown&string=x", &mut data);
    assert_eq!(data.int, 0);
    assert_eq!(data.base.state, State::Unset);
    assert_eq!(data.base.string, "x");
    insta::assert_snapshot!(errors, @r###"
    Some query parameters don't match the expected format:
    - state: `unknown` is not a valid `bind::State`: invalid state: unknown
    - int: `abc` is not a valid `i64`: invalid digit found in string
    "###);
}

#[test]
fn sequence_failures_leave_the_field_empty() {
    let mut data = TestQueryObject::default();
    let errors = bind("states=normal&states=bogus&states=left", &mut data);
    assert!(data.states.is_empty());
    assert_eq!(errors.get("states").len(), 1);
}

#[test]
fn explicit_sequence_values_replace_prepopulated_ones() {
    let mut data = TestQueryObject {
        floats: vec![3.3, 4.4],
        ..Default::default()
    };
    let errors = bind("floats=11.1", &mut data);
    assert!(errors.is_empty());
    assert_eq!(data.floats, vec![11.1]);
}

#[test]
fn prepopulated_sequences_win_over_tag_defaults() {
    for query in ["floats=", ""] {
        let mut data = TestQueryObject {
            floats: vec![3.3, 4.4],
            ..Default::default()
        };
        let errors = bind(query, &mut data);
        assert!(errors.is_empty());
        assert_eq!(data.floats, vec![3.3, 4.4], "query: {query:?}");
    }

    let mut data = TestQueryObject::default();
    bind("", &mut data);
    assert_eq!(data.floats, vec![1.1, 2.2]);
}

#[test]
fn prepopulated_scalars_win_over_tag_defaults() {
    for query in ["int=", ""] {
        let mut data = TestQueryObject {
            int: 7,
            ..Default::default()
        };
        let errors = bind(query, &mut data);
        assert!(errors.is_empty());
        assert_eq!(data.int, 7, "query: {query:?}");
    }
}

#[test]
fn comma_joined_and_repeated_values_are_equivalent() {
    let mut joined = TestQueryObject::default();
    let mut repeated = TestQueryObject::default();
    bind("strings=v1,v2&states=locked,left", &mut joined);
    bind("strings=v1&strings=v2&states=locked&states=left", &mut repeated);
    assert_eq!(joined.base.strings, repeated.base.strings);
    assert_eq!(joined.states, repeated.states);
    assert_eq!(joined.states, vec![State::Locked, State::Left]);
}

#[test]
fn repeated_values_are_not_split() {
    let mut data = TestQueryObject::default();
    bind("strings=v1&strings=v2,v3", &mut data);
    assert_eq!(data.base.strings, vec!["v1", "v2,v3"]);
}

#[test]
fn empty_repeated_values_are_filtered_out() {
    let mut data = TestQueryObject::default();
    bind("strings=&strings=v1,v2&strings=", &mut data);
    // A single non-empty value is left, therefore it gets split.
    assert_eq!(data.base.strings, vec!["v1", "v2"]);
}

#[test]
fn split_elements_can_be_empty() {
    let mut data = TestQueryObject::default();
    let errors = bind("strings=a,,b", &mut data);
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(data.base.strings, vec!["a", "", "b"]);

    let mut data = TestQueryObject::default();
    let errors = bind("floats=1,,2", &mut data);
    assert!(data.floats.is_empty());
    insta::assert_snapshot!(errors.get("floats")[0], @"`` is not a valid `f64`: cannot parse float from empty string");

    // Custom decoders see the empty element too.
    let mut data = TestQueryObject::default();
    let errors = bind("states=normal,,left", &mut data);
    assert!(data.states.is_empty());
    assert_eq!(errors.get("states").len(), 1);
    assert!(errors.get("states")[0].starts_with("`` is not a valid `bind::State`"));
}

#[test]
fn skipped_fields_are_never_touched() {
    let mut data = TestQueryObject {
        ints: vec![9],
        ..Default::default()
    };
    let errors = bind("ints=1,2&float=3.5&array=1&ints=x&float=y", &mut data);
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(data.ints, vec![9]);
    assert_eq!(data.float, 0.0);
    assert_eq!(data.array, [0; 5]);
}

#[test]
fn sanitize_hook_sees_the_bound_record() {
    let mut data = TestQueryObject::default();
    let errors = query_binder::parse(&RawQueryParams::parse("int=3"), &mut data);
    assert!(errors.is_empty(), "{errors}");

    let mut data = TestQueryString::default();
    let errors = query_binder::parse(&RawQueryParams::parse("state=left"), &mut data);
    assert!(errors.is_empty());
    assert_eq!(data.state, State::Left);
}

#[test]
fn flattened_fields_are_inlined_in_declaration_order() {
    let fields: Vec<_> = TestQueryObject::fields()
        .iter()
        .map(|f| (f.ident(), f.tag().map(|t| t.name()), f.kind()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("string", Some("string"), FieldKind::Scalar),
            ("strings", Some("strings"), FieldKind::Sequence),
            ("state", Some("state"), FieldKind::Scalar),
            ("int", Some("int"), FieldKind::Scalar),
            ("floats", Some("floats"), FieldKind::Sequence),
            ("states", Some("states"), FieldKind::Sequence),
            ("array", None, FieldKind::Ignored),
            ("ints", None, FieldKind::Ignored),
            ("float", None, FieldKind::Ignored),
        ]
    );
}

#[derive(QueryBind, Debug, Default)]
pub struct TestCnQueryString {
    #[query("字符串,str1,str2")]
    pub string: String,
    #[query("字符串列表,str1,str2")]
    pub strings: Vec<String>,
    #[query("state,normal")]
    pub state: State,
}

#[test]
fn non_ascii_parameter_names() {
    let mut data = TestCnQueryString::default();
    // `字符串列表=a,b`, percent-encoded.
    let errors = bind(
        "%E5%AD%97%E7%AC%A6%E4%B8%B2%E5%88%97%E8%A1%A8=a,b&state=locked",
        &mut data,
    );
    assert!(errors.is_empty(), "{errors}");
    assert_eq!(data.string, "str1,str2");
    assert_eq!(data.strings, vec!["a", "b"]);
    assert_eq!(data.state, State::Locked);
}
