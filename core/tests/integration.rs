//! End-to-end checks of `HttpTransport` against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every facade
//! operation over real HTTP. This pins the compiled fragments, their
//! escaping, the bearer header and the response normalization together.

use std::net::SocketAddr;
use std::sync::OnceLock;

use lotr_core::{
    ApiError, ClientConfig, FilterValue, ListParams, LotrClient, MovieKey, QuoteKey, SortOrder,
};

/// Spawn the mock server once per test binary and return its address.
fn server() -> SocketAddr {
    static ADDR: OnceLock<SocketAddr> = OnceLock::new();
    *ADDR.get_or_init(|| {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });
        addr
    })
}

fn client_with_token(token: &str) -> LotrClient {
    let config = ClientConfig::new(token)
        .unwrap()
        .with_base_url(&format!("http://{}/v2", server()));
    LotrClient::new(config)
}

fn client() -> LotrClient {
    client_with_token(mock_server::ACCESS_TOKEN)
}

#[test]
fn list_and_get_movies() {
    let client = client();

    let movies = client.movies().list(None).unwrap();
    assert_eq!(movies.total, 8);
    assert_eq!(movies.docs.len(), 8);

    let fellowship = client.movies().get("5cd95395de30eff6ebccde5c").unwrap();
    assert_eq!(fellowship.name, "The Fellowship of the Ring");
    assert_eq!(fellowship.runtime_in_minutes, 178);
}

#[test]
fn comparison_filter_sort_and_limit_round_trip() {
    let params = ListParams::new()
        .filter(MovieKey::BudgetInMillions, FilterValue::gt(200))
        .sort(MovieKey::Name, SortOrder::Asc)
        .limit(2);
    let movies = client().movies().list(Some(&params)).unwrap();

    assert_eq!(movies.total, 4);
    let names: Vec<&str> = movies.docs.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["The Battle of the Five Armies", "The Desolation of Smaug"]);
}

#[test]
fn movie_id_filter_uses_wire_key() {
    let params = ListParams::new().filter(
        MovieKey::MovieId,
        FilterValue::include(["5cd95395de30eff6ebccde5b", "5cd95395de30eff6ebccde5d"]),
    );
    let movies = client().movies().list(Some(&params)).unwrap();
    let ids: Vec<&str> = movies.docs.iter().map(|m| m.movie_id.as_str()).collect();
    assert_eq!(ids, ["5cd95395de30eff6ebccde5b", "5cd95395de30eff6ebccde5d"]);
}

#[test]
fn string_operands_with_spaces_survive_the_trip() {
    let params = ListParams::new().filter(MovieKey::Name, FilterValue::eq("The Two Towers"));
    let movies = client().movies().list(Some(&params)).unwrap();
    assert_eq!(movies.total, 1);
    assert_eq!(movies.docs[0].movie_id, "5cd95395de30eff6ebccde5b");
}

#[test]
fn regex_filter_round_trip() {
    let params = ListParams::new().filter(MovieKey::Name, FilterValue::regex_with_flags("ring", "i"));
    let movies = client().movies().list(Some(&params)).unwrap();
    assert_eq!(movies.total, 2);
}

#[test]
fn quotes_for_a_movie_with_pagination() {
    let params = ListParams::new()
        .filter(QuoteKey::CharacterId, FilterValue::eq("5cd99d4bde30eff6ebccfe9e"))
        .sort(QuoteKey::Dialog, SortOrder::Desc)
        .limit(2)
        .page(2);
    let quotes = client()
        .movies()
        .list_quotes("5cd95395de30eff6ebccde5d", Some(&params))
        .unwrap();

    assert_eq!(quotes.total, 4);
    assert_eq!(quotes.page, 2);
    assert_eq!(quotes.pages, 2);
    let dialog: Vec<&str> = quotes.docs.iter().map(|q| q.dialog.as_str()).collect();
    assert_eq!(dialog, ["Deagol!", "Deagol!"]);
}

#[test]
fn quote_lookup_and_filter_by_movie() {
    let client = client();

    let quote = client.quotes().get("5cd96e05de30eff6ebcce7e9").unwrap();
    assert_eq!(quote.dialog, "Deagol!!");
    assert_eq!(quote.movie_id, "5cd95395de30eff6ebccde5d");

    let params =
        ListParams::new().filter(QuoteKey::MovieId, FilterValue::eq("5cd95395de30eff6ebccde5c"));
    let quotes = client.quotes().list(Some(&params)).unwrap();
    assert_eq!(quotes.total, 2);
    assert!(quotes
        .docs
        .iter()
        .all(|q| q.movie_id == "5cd95395de30eff6ebccde5c"));
}

#[test]
fn unknown_id_is_not_found() {
    let err = client().quotes().get("000000000000000000000000").unwrap_err();
    assert_eq!(
        err,
        ApiError::NotFound("quote/000000000000000000000000".to_string())
    );
}

#[test]
fn wrong_token_is_http_401() {
    let err = client_with_token("not-the-token").movies().list(None).unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Unauthorized."));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig::new("token")
        .unwrap()
        .with_base_url(&format!("http://{addr}/v2"));
    let err = LotrClient::new(config).movies().list(None).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
}
