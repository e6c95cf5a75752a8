use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Dataset, PassengerRecord};

const HEADERS: [&str; 7] = [
    "sex",
    "pclass",
    "embark_town",
    "age",
    "fare",
    "family_size",
    "survived",
];

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.decimals$}"))
}

/// Display text of every cell of a row, in [`HEADERS`] order.
fn cells(rec: &PassengerRecord) -> [String; 7] {
    [
        rec.sex.clone(),
        rec.pclass.to_string(),
        rec.embark_town.clone().unwrap_or_default(),
        optional(rec.age, 1),
        optional(rec.fare, 2),
        rec.family_size.to_string(),
        u8::from(rec.survived).to_string(),
    ]
}

/// Scrollable table of the rows in the filtered view.
pub fn passenger_table(ui: &mut Ui, dataset: &Dataset, visible: &[usize]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(TableColumn::auto().at_least(80.0), HEADERS.len())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, visible.len(), |mut row| {
                let rec = &dataset.records[visible[row.index()]];
                for text in cells(rec) {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_render_blank() {
        let rec = PassengerRecord {
            sex: "female".into(),
            pclass: 3,
            embark_town: None,
            age: None,
            fare: Some(7.25),
            family_size: 1,
            survived: true,
        };
        assert_eq!(cells(&rec), ["female", "3", "", "", "7.25", "1", "1"]);
    }
}
