use egui::color_picker::{self, Alpha};
use egui::DragValue;

use crate::app::SayingsApp;
use crate::command::Command;
use crate::text::Justify;

pub fn text_panel(app: &mut SayingsApp, ctx: &egui::Context) {
    egui::SidePanel::right("text_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Text");
            ui.separator();

            let layer = app.canvas().text();
            let mut text = layer.text().to_owned();
            let mut font_size = layer.font_size();
            let mut color = layer.color();
            let current_justify = layer.justify();

            if ui
                .add(egui::TextEdit::multiline(&mut text).desired_rows(6))
                .changed()
            {
                app.execute(Command::SetText(text));
            }

            ui.horizontal(|ui| {
                ui.label("Size:");
                if ui
                    .add(DragValue::new(&mut font_size).range(1..=400))
                    .changed()
                {
                    app.execute(Command::SetFontSize(font_size));
                }
            });

            ui.horizontal(|ui| {
                for justify in Justify::ALL {
                    if ui
                        .selectable_label(current_justify == justify, justify.label())
                        .clicked()
                    {
                        app.execute(Command::SetJustify(justify));
                    }
                }
            });

            ui.horizontal(|ui| {
                ui.label("Color:");
                if color_picker::color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
                    app.execute(Command::SetTextColor(color));
                }
            });
        });
}
