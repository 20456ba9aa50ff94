//! Master-detail walkthrough.
//!
//! Opens an airline by route before the list has loaded, then shows the
//! list, and prints what the user would see after each step.
//!
//! Run with `RUST_LOG=airline_md=debug` to follow the selector.

use std::sync::Arc;

use airline_md::model::{Airline, FlightPlan, ListHandle};
use airline_md::screen::{AppComponent, RecordingNavigator, Route};
use airline_md::{AppConfig, InMemoryService, SharedTaskQueue};
use tracing_subscriber::EnvFilter;

fn main() -> airline_md::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let queue = SharedTaskQueue::new();
    let key = config.service.airline_key();
    let service = InMemoryService::with_data(
        queue.clone(),
        vec![
            Airline::new("LH", "Lufthansa", "EUR"),
            Airline::new("AA", "American Airlines", "USD"),
            Airline::new("AF", "Air France", "EUR"),
            Airline::new("SQ", "Singapore Airlines", "SGD"),
        ],
        vec![
            flight_plan("LH", "0400", "FRANKFURT", "NEW YORK"),
            flight_plan("LH", "0402", "FRANKFURT", "NEW YORK"),
            flight_plan("SQ", "0002", "SINGAPORE", "SAN FRANCISCO"),
        ],
    )
    .with_key(key);
    let service = Arc::new(service);
    let navigator = Arc::new(RecordingNavigator::new());
    let component = AppComponent::new(config, service, queue, navigator.clone());
    let list = component.create_list_screen();
    let detail = component.create_detail_screen();

    // A deep link opens the detail first.
    if let Some(Route::Object { airline_id }) = component.navigate("AirlineSet/LH") {
        detail.on_object_matched(&airline_id);
    }
    list.on_before_first_show();
    component.process_events();

    println!("{}", list.title());
    for item in list.list().items() {
        let marker = if list.list().selected_item().as_ref() == Some(&item) {
            '>'
        } else {
            ' '
        };
        println!("{marker} {}", item.title());
    }
    if let Some(airline) = detail.airline() {
        println!("\n{} ({})", airline.airline_name, airline.airline_id);
        println!("{}", detail.line_item_title());
        for plan in detail.line_items() {
            println!("  {} {} -> {}", plan.connection_id, plan.city_from, plan.city_to);
        }
    }

    detail.on_close();
    println!(
        "\nclosed; selected item: {:?}; navigation: {:?}",
        list.list().selected_item().map(|item| item.title().to_string()),
        navigator.last()
    );
    Ok(())
}

fn flight_plan(airline_id: &str, connection_id: &str, from: &str, to: &str) -> FlightPlan {
    FlightPlan {
        airline_id: airline_id.into(),
        connection_id: connection_id.into(),
        city_from: from.into(),
        city_to: to.into(),
        departure_time: String::new(),
        arrival_time: String::new(),
    }
}
