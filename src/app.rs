use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::HuePalette;
use crate::data::render::RenderOutput;
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TitanicApp {
    pub state: AppState,
}

impl TitanicApp {
    /// Start with the configured data file; a load failure only sets the status line.
    pub fn new(config: &crate::config::Config) -> Self {
        let mut state = AppState::default();
        state.open(&config.data);
        Self { state }
    }
}

impl eframe::App for TitanicApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Titanic Survival Prediction Analysis");
            ui.separator();

            let AppState {
                view,
                dataset,
                active_tab,
                ..
            } = &mut self.state;
            let Some(view) = view.as_ref() else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a passenger file to begin  (File → Open…)");
                });
                return;
            };

            panels::kpi_row(ui, &view.metrics);
            ui.separator();

            ui.horizontal(|ui: &mut Ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(active_tab, tab, tab.title());
                }
            });
            ui.separator();

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match *active_tab {
                    Tab::Survival => survival_tab(ui, view),
                    Tab::ClassEconomics => class_tab(ui, view),
                    Tab::Family => family_tab(ui, view),
                    Tab::Passengers => {
                        if let Some(ds) = dataset {
                            table::passenger_table(ui, ds, &view.visible);
                        }
                    }
                });
        });
    }
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0));
}

fn survival_tab(ui: &mut Ui, view: &RenderOutput) {
    ui.heading("Survival Analysis");
    ui.columns(2, |cols: &mut [Ui]| {
        chart_title(&mut cols[0], "Survival by Gender");
        plot::count_chart(&mut cols[0], "by_sex", &view.charts.by_sex, HuePalette::DiedSurvived);

        chart_title(&mut cols[1], "Survival by Embarkation");
        plot::count_chart(
            &mut cols[1],
            "by_embarkation",
            &view.charts.by_embarkation,
            HuePalette::Viridis,
        );
    });
}

fn class_tab(ui: &mut Ui, view: &RenderOutput) {
    ui.heading("Socioeconomic Factors");
    ui.columns(2, |cols: &mut [Ui]| {
        chart_title(&mut cols[0], "Survival by Passenger Class");
        plot::count_chart(&mut cols[0], "by_class", &view.charts.by_class, HuePalette::Viridis);

        chart_title(&mut cols[1], "Fare Distribution");
        plot::fare_chart(&mut cols[1], &view.charts.fare);
    });
}

fn family_tab(ui: &mut Ui, view: &RenderOutput) {
    ui.heading("Family Size Impact");
    ui.label("Distribution of family_size among passengers who died and who survived.");
    plot::family_chart(ui, &view.charts.family);
}
