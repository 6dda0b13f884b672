//! Scripted RUSH session against the seed fixture.
//!
//! ```sh
//! cargo run --example campus_session -- "Sproul Plaza, Berkeley"
//! ```
//!
//! Set `RUSH_SEED_PATH` to load a different fixture; the optional argument is
//! geocoded to show where the map would re-center.

use rush_store::domain::{NewReview, NewRumor, Role, RsvpStatus};
use rush_store::geocode::Geocoder;
use rush_store::{ActivityFeed, Config, RushStore, Seed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    rush_store::telemetry::init(&config)?;

    let seed = match &config.seed_path {
        Some(path) => Seed::from_path(path)?,
        None => Seed::demo()?,
    };
    let mut store = RushStore::from_seed(seed);

    store.set_has_launched(true)?;
    store.login("maya@stanford.edu", "boba4life", Role::General)?;
    store.select_campus("campus-stanford")?;
    store.rsvp("popup-dumplings", RsvpStatus::Going)?;
    store.follow_creator("creator-oscar")?;
    store.add_review(NewReview {
        popup_id: "popup-tacos".into(),
        rating: 4,
        text: "Worth the BART ride.".into(),
    })?;
    store.start_rumor(NewRumor {
        content: "Mochi cart behind the bookstore".into(),
        timeframe: "after 9pm".into(),
    })?;

    let state = store.state();
    println!("Trending:");
    for popup in state.trending() {
        println!(
            "  {:<24} {:>8}  score {:>6.1}  rating {:.1}",
            popup.title,
            popup.status.as_str(),
            state.trending_score(popup),
            state.avg_rating(&popup.id),
        );
    }

    println!("From creators you follow:");
    for popup in state.following_popups() {
        println!("  {}", popup.title);
    }
    println!("Unread notifications: {}", state.unread_count());

    if let Some(feed) = store.projection::<ActivityFeed>() {
        println!("Recent activity:");
        for entry in feed.entries.iter().take(5) {
            println!("  #{} {}", entry.sequence, entry.event_type);
        }
    }

    if let Some(query) = std::env::args().nth(1) {
        let geocoder = Geocoder::new(&config.geocoder)?;
        match geocoder.search(&query).await {
            Ok(found) => println!(
                "Map centered on {} ({:.4}, {:.4})",
                found.label, found.point.lat, found.point.lng
            ),
            Err(e) => println!("{}", e.user_message()),
        }
    }

    Ok(())
}
