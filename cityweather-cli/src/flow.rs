//! Interactive screen flow: home → detail → settings.
//!
//! Each screen is one state of the flow loop; the selected place name is the
//! only parameter a transition carries. Errors surface as a notice on the
//! current screen and the user retries the originating action manually.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use inquire::{Confirm, Select, Text};

use cityweather_core::{
    DetailState, DetailViewModel, Error, IpLocator, LocationResolver, OpenWeatherClient,
    PlaceSearch, PlaceSelection, ResolveOutcome, ReverseGeocoder, Settings, WeatherCard,
};

const CHOICE_SEARCH: &str = "Search for a city";
const CHOICE_LOCATE: &str = "Use current location";
const CHOICE_SETTINGS: &str = "Settings";
const CHOICE_QUIT: &str = "Quit";

#[derive(Debug)]
enum Screen {
    Home,
    Detail(PlaceSelection),
    Settings,
    Quit,
}

impl Screen {
    /// Where the home screen goes after a place selection or location
    /// attempt: into the detail flow on success, back home otherwise.
    fn after_selection(selection: Result<PlaceSelection, Error>) -> Screen {
        match selection {
            Ok(place) => Screen::Detail(place),
            Err(_) => Screen::Home,
        }
    }
}

struct App {
    settings: Settings,
    search: PlaceSearch,
    resolver: LocationResolver,
    detail: DetailViewModel,
}

impl App {
    fn new(settings: Settings) -> Result<Self> {
        let weather_key = settings.weather_api_key()?.to_string();
        let places_key = settings.places_api_key()?.to_string();

        let search = PlaceSearch::new(places_key);
        let resolver = LocationResolver::new(
            Arc::new(IpLocator::new(settings.location_consent)),
            ReverseGeocoder::new(weather_key.clone()),
        );
        let detail = DetailViewModel::new(Arc::new(OpenWeatherClient::new(weather_key)));

        Ok(Self {
            settings,
            search,
            resolver,
            detail,
        })
    }

    async fn home(&self) -> Result<Screen> {
        let choice = Select::new(
            "Weather",
            vec![CHOICE_SEARCH, CHOICE_LOCATE, CHOICE_SETTINGS, CHOICE_QUIT],
        )
        .prompt()?;

        match choice {
            CHOICE_SEARCH => self.search_city().await,
            CHOICE_LOCATE => self.current_location().await,
            CHOICE_SETTINGS => Ok(Screen::Settings),
            _ => Ok(Screen::Quit),
        }
    }

    async fn search_city(&self) -> Result<Screen> {
        let input = Text::new("City:").prompt()?;

        let candidates = match self.search.suggest(&input).await {
            Ok(candidates) => candidates,
            Err(err) => {
                notice(Error::Lookup(err).user_message());
                return Ok(Screen::Home);
            }
        };

        if candidates.is_empty() {
            notice("No matching places. Enter at least two characters and try again.");
            return Ok(Screen::Home);
        }

        let picked = Select::new("Pick a place", candidates).prompt()?;

        let selection = self.search.select(&picked).await;
        if let Err(err) = &selection {
            notice(err.user_message());
        }
        Ok(Screen::after_selection(selection))
    }

    async fn current_location(&self) -> Result<Screen> {
        match self.resolver.resolve().await {
            Ok(ResolveOutcome::Granted(place)) => Ok(Screen::Detail(place)),
            Ok(ResolveOutcome::Denied) => {
                notice(Error::PermissionDenied.user_message());
                Ok(Screen::Home)
            }
            Err(err) => {
                notice(err.user_message());
                Ok(Screen::Home)
            }
        }
    }

    async fn detail_screen(&self, place: PlaceSelection) -> Result<Screen> {
        // Loading state: nothing but this line until the fetch settles.
        println!("Fetching weather for {place}...");

        match self.detail.show(&place, self.settings.unit).await {
            DetailState::Rendered(card) => render_card(&card),
            DetailState::Errored(message) => notice(message),
            DetailState::Idle | DetailState::Loading => {}
        }

        Ok(Screen::Home)
    }

    fn settings_screen(&mut self) -> Result<Screen> {
        let next = self.settings.unit.toggle();

        let confirmed = Confirm::new(&format!("Switch to {next}?"))
            .with_default(true)
            .prompt()?;

        if confirmed {
            self.settings.set_unit(next);
            self.settings.save()?;
            println!("Temperature unit is now {}.", self.settings.unit);
        }

        Ok(Screen::Home)
    }
}

pub async fn run_interactive() -> Result<()> {
    let settings = Settings::load()?;
    let mut app = App::new(settings)?;

    let mut screen = Screen::Home;
    loop {
        screen = match screen {
            Screen::Home => app.home().await?,
            Screen::Detail(place) => app.detail_screen(place).await?,
            Screen::Settings => app.settings_screen()?,
            Screen::Quit => break,
        };
    }

    Ok(())
}

pub fn run_configure() -> Result<()> {
    let mut settings = Settings::load()?;

    let weather = Text::new("OpenWeather API key:").prompt()?;
    if !weather.trim().is_empty() {
        settings.weather_api_key = Some(weather.trim().to_string());
    }

    let places = Text::new("Google Places API key:").prompt()?;
    if !places.trim().is_empty() {
        settings.places_api_key = Some(places.trim().to_string());
    }

    settings.location_consent = Confirm::new("Allow IP-based location lookup?")
        .with_default(settings.location_consent)
        .prompt()?;

    settings.save()?;
    println!("Saved to {}", Settings::config_file_path()?.display());

    Ok(())
}

pub async fn run_show(place: &str) -> Result<()> {
    let settings = Settings::load()?;
    let weather_key = settings.weather_api_key()?.to_string();

    let detail = DetailViewModel::new(Arc::new(OpenWeatherClient::new(weather_key)));

    match detail.show(&PlaceSelection::new(place), settings.unit).await {
        DetailState::Rendered(card) => render_card(&card),
        DetailState::Errored(message) => notice(message),
        DetailState::Idle | DetailState::Loading => {}
    }

    Ok(())
}

fn render_card(card: &WeatherCard) {
    println!();
    println!("  {}", card.place);
    println!("  {}", card.condition);
    println!();
    println!("  {}{}", card.temperature, card.unit_symbol);
    println!();
    println!("  Humidity:    {}%", card.humidity_pct);
    println!("  Wind speed:  {} m/s", card.wind_speed_mps);
    println!("  Sunrise:     {}", clock(card.sunrise));
    println!("  Sunset:      {}", clock(card.sunset));
    println!();
}

fn clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%-I:%M %p").to_string()
}

fn notice(message: &str) {
    eprintln!("{message}");
}
