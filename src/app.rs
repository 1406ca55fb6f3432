use strum::IntoEnumIterator;

use crate::components::data_process::DataAction;
use crate::components::root::{Action, RootState, RootStore};
use crate::environment::types::{SortType, SupportedCity};
use crate::environment::{Config, Environment};
use crate::error::ApiError;
use crate::helper;
use crate::map::{ContainerRef, HeadlessFactory, MapController};
use crate::selectors::{self, Selectors};

/// Loads the offers of a city and prints them.
///
/// Usage: `six-cities [city] [sort]`, e.g. `six-cities Amsterdam "Top rated first"`
pub async fn run() -> Result<(), ApiError> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let city = match args.next() {
        Some(name) => SupportedCity::find(&name).unwrap_or_else(|| {
            log::error!("Unknown city {name}, using {}", SupportedCity::default());
            SupportedCity::default()
        }),
        None => SupportedCity::default(),
    };
    let sort = match args.next() {
        Some(name) => SortType::iter()
            .find(|sort| sort.to_string().eq_ignore_ascii_case(&name))
            .unwrap_or_else(|| {
                log::error!("Unknown sort {name}");
                SortType::default()
            }),
        None => SortType::default(),
    };

    let config = Config::load();
    log::debug!("{config:?}");
    let environment = Environment::from_config(&config)?;
    let store = RootStore::new(RootState::default(), environment);
    store.start().await;
    store
        .send(Action::Data(DataAction::ChangeCity(city.city())))
        .await;

    let Some(state) = store.state() else {
        return Err(ApiError::Storage("State unavailable".to_string()))
    };
    let derived = Selectors::default();
    let places = derived.sorted_places(&state, sort);
    let city = selectors::city(&state);

    println!(
        "{} to stay in {} ({})",
        helper::places_label(places.len()),
        city.name,
        selectors::authorization_status(&state)
    );
    for offer in places.iter() {
        println!(
            "{}{} - {} - €{} - {}% [{}]",
            if offer.is_premium { "* " } else { "" },
            offer.title,
            helper::format_housing_type(&offer.kind),
            offer.price,
            helper::rating_to_percent(offer.rating),
            offer.id
        );
    }

    let mut map = MapController::new(HeadlessFactory);
    map.attach(ContainerRef(0), city.location);
    map.show_places(&places, None);
    if let Some(widget) = map.widget() {
        log::debug!("{} markers on the map", widget.pins().count());
    }
    Ok(())
}

fn init_logging() {
    use env_logger::Env;
    use std::io::Write;
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .try_init();
}
