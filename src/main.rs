mod config;
mod heatmap;
mod location;
mod map;
mod roles;
mod theme;
mod weather;

use clap::Parser;
use config::AppConfig;
use heatmap::{filter_points, FilterWindow, HeatPoint, SAMPLE_POINTS};
use location::{LocationState, SharedLocation};
use log::{info, warn};
use map::MapView;
use roles::{RoleState, SharedRole};
use std::sync::{Arc, Mutex};
use theme::ThemeChoice;
use weather::{WeatherPhase, WeatherService};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Cleanview desktop: air-quality heatmap, weather, and map dashboard
#[derive(Debug, Parser)]
#[command(name = "cleanview", version, about)]
struct Args {
    /// Override latitude (skips geolocation lookup; requires --longitude)
    #[arg(long)]
    latitude: Option<f64>,

    /// Override longitude (skips geolocation lookup; requires --latitude)
    #[arg(long)]
    longitude: Option<f64>,

    /// Override the initial map zoom level
    #[arg(long)]
    zoom: Option<f64>,

    /// Reset the stored configuration to defaults before starting
    #[arg(long)]
    reset_config: bool,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config, using defaults: {e}");
            AppConfig::default()
        }
    };

    if args.reset_config {
        config = AppConfig::default();
        if let Err(e) = config.save() {
            warn!("Failed to write reset config: {e}");
        }
    }

    if let Ok(path) = AppConfig::get_config_path() {
        info!("Config file: {}", path.display());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 820.0])
            .with_title("Cleanview"),
        ..Default::default()
    };

    eframe::run_native(
        "Cleanview",
        options,
        Box::new(move |cc| Ok(Box::new(CleanviewApp::new(cc, config, &args)))),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    Dashboard,
}

struct CleanviewApp {
    config: AppConfig,
    runtime: tokio::runtime::Runtime,
    page: Page,
    theme: Option<ThemeChoice>,

    location: SharedLocation,
    map: Option<MapView>,
    weather: WeatherService,
    role: SharedRole,

    slider_month: u8,
    filtered: Vec<HeatPoint>,
    filtered_for: Option<u8>,
    show_air_quality: bool,
    show_population: bool,
    population_notice_logged: bool,
}

impl CleanviewApp {
    fn new(cc: &eframe::CreationContext<'_>, mut config: AppConfig, args: &Args) -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();

        if let Some(zoom) = args.zoom {
            config.default_zoom = zoom;
        }

        let theme = ThemeChoice::from_config(config.theme.as_deref());
        theme::apply(&cc.egui_ctx, theme);

        // CLI override wins over the configured one.
        let override_location = match (args.latitude, args.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => config.override_location(),
        };

        let location: SharedLocation = Arc::new(Mutex::new(LocationState::Resolving));
        location::spawn_resolver(
            runtime.handle(),
            location.clone(),
            cc.egui_ctx.clone(),
            override_location,
        );

        let role: SharedRole = Arc::new(Mutex::new(RoleState::Pending));
        roles::spawn_lookup(
            runtime.handle(),
            role.clone(),
            roles::resolve_base_url(config.role_api_base_url.as_deref()),
            roles::DEFAULT_TITLE.to_string(),
            cc.egui_ctx.clone(),
        );

        let slider_month = config.slider_month.min(11);
        let filtered = filter_points(&SAMPLE_POINTS, FilterWindow::for_month(slider_month));
        let show_air_quality = config.show_air_quality;
        let show_population = config.show_population;

        Self {
            config,
            runtime,
            page: Page::Home,
            theme,
            location,
            map: None,
            weather: WeatherService::new(),
            role,
            slider_month,
            filtered,
            filtered_for: Some(slider_month),
            show_air_quality,
            show_population,
            population_notice_logged: false,
        }
    }

    fn draw_nav(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Cleanview");
            ui.separator();

            for (page, label) in [(Page::Home, "Home"), (Page::Dashboard, "Dashboard")] {
                if ui.selectable_label(self.page == page, label).clicked() {
                    self.page = page;
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let current = self.theme.unwrap_or_else(|| {
                    if ctx.style().visuals.dark_mode {
                        ThemeChoice::Dark
                    } else {
                        ThemeChoice::Light
                    }
                });

                if ui
                    .button(current.icon())
                    .on_hover_text("Toggle dark mode")
                    .clicked()
                {
                    let next = current.toggled();
                    self.theme = Some(next);
                    theme::apply(ctx, Some(next));

                    self.config.theme = Some(next.as_config_str().to_string());
                    if let Err(e) = self.config.save() {
                        warn!("Failed to persist theme preference: {e}");
                    }
                }
            });
        });
    }

    fn draw_home(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.heading("Welcome to Cleanview");
            ui.add_space(12.0);
            ui.label("Breathe Easy with Cleanview!!");
            ui.add_space(8.0);
            ui.label(
                "Cleanview helps you stay one step ahead for a healthier day. Using TEMPO data, \
                 it smartly blends weather and local air info to give you the clearest picture \
                 possible. Cleanview's got you covered with tech that's fresh, and clean.",
            );
            ui.add_space(24.0);

            match self.role.lock().unwrap().clone() {
                RoleState::Pending => {
                    ui.weak("Looking up role…");
                }
                RoleState::Ready(line) => {
                    ui.label(line);
                }
            }
        });
    }

    fn draw_dashboard(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let state = self.location.lock().unwrap().clone();

        match state {
            LocationState::Resolving => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Resolving your location… (please allow a moment)");
                });
            }
            LocationState::Failed(_) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    "Failed to get your location",
                );
            }
            LocationState::Resolved {
                latitude,
                longitude,
            } => {
                if self.map.is_none() {
                    self.map = Some(MapView::new(
                        ctx,
                        latitude,
                        longitude,
                        self.config.default_zoom,
                    ));
                }

                self.refresh_filtered_points();

                // Controls below the map need roughly this much room.
                let controls_height = if self.show_population { 110.0 } else { 90.0 };
                let map_height = (ui.available_height() - controls_height).max(240.0);

                if let Some(map) = self.map.as_mut() {
                    let width = ui.available_width();
                    ui.allocate_ui(egui::vec2(width, map_height), |ui| {
                        ui.set_min_height(map_height);
                        map.show(ui, &self.filtered, self.show_air_quality);
                    });

                    let (marker_lat, marker_lon) = map.marker_position();
                    self.weather
                        .ensure(self.runtime.handle(), ctx, marker_lat, marker_lon);
                }

                ui.add_space(6.0);
                self.draw_controls(ui);
            }
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Months:");
            ui.add(
                egui::Slider::new(&mut self.slider_month, 0..=11)
                    .step_by(1.0)
                    .show_value(false),
            );
            ui.monospace(format!(
                "{} {}",
                MONTH_NAMES[usize::from(self.slider_month.min(11))],
                heatmap::REFERENCE_YEAR
            ));

            ui.separator();
            if ui.button("📍 Center on my location").clicked() {
                if let Some(map) = self.map.as_mut() {
                    map.center_on_home();
                }
            }
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.show_air_quality, "Show Air Quality");
            ui.checkbox(&mut self.show_population, "Show Population Density");
        });

        if self.show_population {
            if !self.population_notice_logged {
                warn!("Population density toggle enabled, but no data source is configured");
                self.population_notice_logged = true;
            }
            ui.weak("Population density has no data source configured yet.");
        }
    }

    fn refresh_filtered_points(&mut self) {
        if self.filtered_for != Some(self.slider_month) {
            let window = FilterWindow::for_month(self.slider_month);
            self.filtered = filter_points(&SAMPLE_POINTS, window);
            self.filtered_for = Some(self.slider_month);
        }
    }

    fn draw_weather_window(&mut self, ctx: &egui::Context) {
        let phase = self.weather.phase();

        egui::Window::new("Weather")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 56.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| match phase {
                WeatherPhase::Idle | WeatherPhase::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Fetching forecast…");
                    });
                }
                WeatherPhase::Unavailable => {
                    ui.label("Weather unavailable");
                    if ui.button("Retry").clicked() {
                        self.weather.retry();
                    }
                }
                WeatherPhase::Ready(snapshot) => {
                    egui::Grid::new("current_weather")
                        .num_columns(2)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label("Temperature");
                            ui.monospace(format!("{:.1} °C", snapshot.temperature));
                            ui.end_row();

                            ui.label("Feels like");
                            ui.monospace(format!("{:.1} °C", snapshot.apparent_temperature));
                            ui.end_row();

                            ui.label("Humidity");
                            ui.monospace(format!("{:.0} %", snapshot.humidity));
                            ui.end_row();

                            ui.label("Wind");
                            ui.monospace(format!("{:.1} km/h", snapshot.wind_speed));
                            ui.end_row();

                            ui.label("Rain");
                            ui.monospace(format!("{:.1} mm", snapshot.rain));
                            ui.end_row();

                            ui.label("Precipitation");
                            ui.monospace(format!("{:.1} mm", snapshot.precipitation));
                            ui.end_row();
                        });

                    if !snapshot.upcoming.is_empty() {
                        ui.separator();
                        ui.weak("Next hours");
                        for (time, temperature) in &snapshot.upcoming {
                            ui.monospace(format!(
                                "{}  {temperature:.1} °C",
                                time.format("%H:%M")
                            ));
                        }
                    }
                }
            });
    }
}

impl eframe::App for CleanviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            self.draw_nav(ctx, ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Home => self.draw_home(ui),
            Page::Dashboard => self.draw_dashboard(ctx, ui),
        });

        if self.page == Page::Dashboard && self.map.is_some() {
            self.draw_weather_window(ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.slider_month = self.slider_month;
        self.config.show_air_quality = self.show_air_quality;
        self.config.show_population = self.show_population;

        if let Err(e) = self.config.save() {
            warn!("Failed to save config on exit: {e}");
        }
    }
}
