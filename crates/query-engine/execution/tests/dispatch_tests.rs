use query_engine_execution::{Dispatcher, Error, SearchClient};
use query_engine_translation::compile;

fn offline_client() -> SearchClient {
    // never contacted by these tests
    SearchClient::new(url::Url::parse("http://localhost:1").unwrap())
}

#[tokio::test]
async fn it_rejects_unknown_formats_without_touching_the_backend() {
    let dispatcher = Dispatcher::new();
    let plan = compile("SELECT * FROM accounts").unwrap();

    // the client points nowhere; reaching the backend would fail loudly,
    // so an UnknownFormat result proves no formatter ran
    let result = dispatcher
        .dispatch("unsupported-format", &plan, &offline_client())
        .await;

    match result {
        Err(Error::UnknownFormat(name)) => assert_eq!(name, "unsupported-format"),
        other => panic!("expected UnknownFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn format_lookup_is_case_sensitive() {
    let dispatcher = Dispatcher::new();
    let plan = compile("SELECT * FROM accounts").unwrap();

    let result = dispatcher.dispatch("JDBC", &plan, &offline_client()).await;
    assert!(matches!(result, Err(Error::UnknownFormat(_))));
}

#[test]
fn it_recognizes_the_closed_format_set() {
    let dispatcher = Dispatcher::new();
    assert_eq!(
        dispatcher.recognized_formats(),
        vec!["csv", "jdbc", "json", "raw"]
    );
}
