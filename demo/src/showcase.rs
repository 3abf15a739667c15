//! A guided tour of the client: lookups, listing, sorting, every filter
//! operator, both pagination styles and the movie quote sub-resource.

use anyhow::Result;
use lotr_core::{FilterValue, ListParams, LotrClient, MovieKey, QuoteKey, SortOrder, Transport};
use tracing::info;

const FELLOWSHIP: &str = "5cd95395de30eff6ebccde5c";
const RETURN_OF_THE_KING: &str = "5cd95395de30eff6ebccde5d";
const SMEAGOL: &str = "5cd99d4bde30eff6ebccfe9e";
const DEAGOL_QUOTE: &str = "5cd96e05de30eff6ebcce7e9";

pub fn run<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    by_id(client)?;
    listing(client)?;
    sorting(client)?;
    filtering(client)?;
    pagination(client)?;
    combined(client)?;
    sub_resource(client)?;
    Ok(())
}

fn heading(title: &str) {
    info!(section = title, "Showcase section");
    println!("\n== {title} ==");
}

fn by_id<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    heading("Get by id");
    let fellowship = client.movies().get(FELLOWSHIP)?;
    println!("Fellowship: {} ({} min)", fellowship.name, fellowship.runtime_in_minutes);

    let quote = client.quotes().get(DEAGOL_QUOTE)?;
    println!("Single quote: {} from movie: {}", quote.dialog, quote.movie_id);
    Ok(())
}

fn listing<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    heading("Listing");
    let movies = client.movies().list(None)?;
    println!("All movies: {}", movies.total);

    let quotes = client.quotes().list(Some(&ListParams::new().limit(5)))?;
    println!("Quotes (first 5): {:?}", dialog(&quotes.docs));
    Ok(())
}

fn sorting<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    heading("Sorting");
    let movies = client
        .movies()
        .list(Some(&ListParams::new().sort(MovieKey::Name, SortOrder::Asc)))?;
    println!("Movies sorted by name: {:?}", names(&movies.docs));

    let params = ListParams::new().sort(QuoteKey::Dialog, SortOrder::Asc).limit(5);
    let quotes = client.quotes().list(Some(&params))?;
    println!("Quotes sorted by dialog: {:?}", dialog(&quotes.docs));
    Ok(())
}

fn filtering<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    heading("Filtering");
    let movies = client.movies();
    let quotes = client.quotes();

    let big_budget = movies.list(Some(
        &ListParams::new().filter(MovieKey::BudgetInMillions, FilterValue::gt(200)),
    ))?;
    println!("Big budget movies (gt 200M): {:?}", names(&big_budget.docs));

    let award_winners = movies.list(Some(
        &ListParams::new().filter(MovieKey::AcademyAwardWins, FilterValue::gte(4)),
    ))?;
    println!("Award winners (gte 4): {:?}", names(&award_winners.docs));

    let low_score = movies.list(Some(
        &ListParams::new().filter(MovieKey::RottenTomatoesScore, FilterValue::lt(70)),
    ))?;
    println!("Low RT score movies (lt 70): {:?}", names(&low_score.docs));

    let fellowship = quotes.list(Some(
        &ListParams::new()
            .filter(QuoteKey::MovieId, FilterValue::eq(FELLOWSHIP))
            .limit(5),
    ))?;
    println!("Fellowship quotes (eq): {:?}", dialog(&fellowship.docs));

    let not_fellowship = quotes.list(Some(
        &ListParams::new()
            .filter(QuoteKey::MovieId, FilterValue::ne(FELLOWSHIP))
            .limit(3),
    ))?;
    println!("Non-Fellowship quotes (ne): {:?}", dialog(&not_fellowship.docs));

    let two_movies = quotes.list(Some(
        &ListParams::new()
            .filter(
                QuoteKey::MovieId,
                FilterValue::include([FELLOWSHIP, RETURN_OF_THE_KING]),
            )
            .limit(5),
    ))?;
    println!("Fellowship + RotK quotes (include): {}", two_movies.total);

    let excluded = quotes.list(Some(
        &ListParams::new()
            .filter(QuoteKey::MovieId, FilterValue::exclude([FELLOWSHIP]))
            .limit(3),
    ))?;
    println!("Quotes excluding Fellowship (exclude): {:?}", dialog(&excluded.docs));

    let matching = quotes.list(Some(
        &ListParams::new()
            .filter(QuoteKey::Dialog, FilterValue::regex("ring"))
            .limit(5),
    ))?;
    println!("Quotes matching 'ring' (regex): {:?}", dialog(&matching.docs));
    Ok(())
}

fn pagination<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    heading("Pagination");
    for page in [1, 2] {
        let movies = client
            .movies()
            .list(Some(&ListParams::new().limit(3).page(page)))?;
        println!("Movies page {page} (limit 3): {:?}", names(&movies.docs));
    }
    let movies = client
        .movies()
        .list(Some(&ListParams::new().limit(2).offset(4)))?;
    println!("Movies offset 4 (limit 2): {:?}", names(&movies.docs));

    for page in [1, 2] {
        let quotes = client
            .quotes()
            .list(Some(&ListParams::new().limit(3).page(page)))?;
        println!("Quotes page {page} (limit 3): {:?}", dialog(&quotes.docs));
    }
    let quotes = client
        .quotes()
        .list(Some(&ListParams::new().limit(3).offset(10)))?;
    println!("Quotes offset 10 (limit 3): {:?}", dialog(&quotes.docs));
    Ok(())
}

fn combined<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    heading("Filter + sort + pagination");
    let params = ListParams::new()
        .filter(MovieKey::AcademyAwardNominations, FilterValue::gte(5))
        .sort(MovieKey::BoxOfficeRevenueInMillions, SortOrder::Asc)
        .limit(10);
    let movies = client.movies().list(Some(&params))?;
    println!("Nominated (gte 5) sorted by revenue: {:?}", names(&movies.docs));

    let params = ListParams::new()
        .filter(QuoteKey::MovieId, FilterValue::eq(RETURN_OF_THE_KING))
        .sort(QuoteKey::Dialog, SortOrder::Asc)
        .limit(10)
        .page(2);
    let quotes = client.quotes().list(Some(&params))?;
    println!("RotK quotes (filtered + sorted + page 2): {:?}", dialog(&quotes.docs));
    Ok(())
}

fn sub_resource<T: Transport>(client: &LotrClient<T>) -> Result<()> {
    heading("Movie quotes");
    let movies = client.movies();

    let all = movies.list_quotes(RETURN_OF_THE_KING, None)?;
    println!("Return of the King quotes: {}", all.total);

    let by_character = movies.list_quotes(
        RETURN_OF_THE_KING,
        Some(&ListParams::new().filter(QuoteKey::CharacterId, FilterValue::eq(SMEAGOL))),
    )?;
    println!("RotK quotes by character: {}", by_character.total);

    let first_page =
        movies.list_quotes(RETURN_OF_THE_KING, Some(&ListParams::new().limit(5).page(1)))?;
    println!("RotK quotes page 1 (limit 5): {:?}", dialog(&first_page.docs));
    Ok(())
}

fn names(movies: &[lotr_core::Movie]) -> Vec<&str> {
    movies.iter().map(|m| m.name.as_str()).collect()
}

fn dialog(quotes: &[lotr_core::Quote]) -> Vec<&str> {
    quotes.iter().map(|q| q.dialog.as_str()).collect()
}
