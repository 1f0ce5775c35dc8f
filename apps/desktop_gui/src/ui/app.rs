use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{NotificationKind, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::{CloseReason, ConsoleState, UiAction, DELETE_CONFIRMATION},
};

pub struct UserConsoleApp {
    state: ConsoleState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
}

impl UserConsoleApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        notification_ttl: Duration,
    ) -> Self {
        let mut app = Self {
            state: ConsoleState::new(notification_ttl),
            cmd_tx,
            ui_rx,
        };
        app.run_actions(vec![UiAction::Reload]);
        app
    }

    fn process_ui_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.handle_event(event, now);
        }
        self.state.expire_notification(now);
    }

    fn run_actions(&mut self, actions: Vec<UiAction>) {
        let now = Instant::now();
        for action in actions {
            for cmd in self.state.apply(action, now) {
                if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
                    self.state.report(err, now);
                }
            }
        }
    }

    fn show_notification_banner(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(active) = &self.state.notification else {
            return;
        };
        let (fill, stroke) = match active.notification.kind {
            NotificationKind::Success => (
                egui::Color32::from_rgb(46, 94, 62),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(86, 160, 110)),
            ),
            NotificationKind::Error => (
                egui::Color32::from_rgb(111, 53, 53),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
            ),
        };

        egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(&active.notification.message)
                            .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            actions.push(UiAction::DismissNotification);
                        }
                    });
                });
            });
    }

    fn show_create_form(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.heading("Create user");
        ui.add_space(8.0);

        let form = &mut self.state.create_form;
        egui::Grid::new("create_user_form")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 8.0))
            .show(ui, |ui| {
                ui.label("Username");
                ui.text_edit_singleline(&mut form.username);
                ui.end_row();

                ui.label("Email");
                ui.text_edit_singleline(&mut form.email);
                ui.end_row();

                ui.label("Password");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut form.password)
                            .password(!form.password_visible)
                            .desired_width(150.0),
                    );
                    let toggle = if form.password_visible { "🔒" } else { "👁" };
                    if ui.button(toggle).on_hover_text("Show or hide password").clicked() {
                        actions.push(UiAction::TogglePasswordVisibility);
                    }
                });
                ui.end_row();

                ui.label("First name");
                ui.text_edit_singleline(&mut form.first_name);
                ui.end_row();

                ui.label("Last name");
                ui.text_edit_singleline(&mut form.last_name);
                ui.end_row();
            });

        ui.add_space(10.0);
        if ui.button("Create User").clicked() {
            actions.push(UiAction::SubmitCreate);
        }
    }

    fn show_user_list(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading("Users");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reload").clicked() {
                    actions.push(UiAction::Reload);
                }
            });
        });
        ui.separator();

        if let Some(placeholder) = self.state.list.placeholder() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| ui.weak(placeholder));
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for card in self.state.list.cards() {
                    egui::Frame::group(ui.style())
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(12, 10))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(egui::RichText::new(card.title()).strong());
                                    ui.label(card.email_line());
                                    ui.weak(card.id_line());
                                });
                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        let user_id = card.user_id();
                                        if ui
                                            .add_enabled(user_id.is_some(), egui::Button::new("Delete"))
                                            .clicked()
                                        {
                                            if let Some(id) = user_id {
                                                actions.push(UiAction::RequestDelete(id.clone()));
                                            }
                                        }
                                        if ui
                                            .add_enabled(user_id.is_some(), egui::Button::new("Edit"))
                                            .clicked()
                                        {
                                            if let Some(id) = user_id {
                                                actions.push(UiAction::OpenEdit(id.clone()));
                                            }
                                        }
                                    },
                                );
                            });
                        });
                    ui.add_space(6.0);
                }
            });
    }

    fn show_edit_modal(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(modal) = self.state.edit_modal.as_mut() else {
            return;
        };

        let response = egui::Modal::new(egui::Id::new("edit_user_modal")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.horizontal(|ui| {
                ui.heading("Edit user");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✕").clicked() {
                        actions.push(UiAction::CloseEdit(CloseReason::Cancel));
                    }
                });
            });
            ui.weak(format!("ID: {}", modal.user_id));
            ui.add_space(8.0);

            let form = &mut modal.form;
            egui::Grid::new("edit_user_form")
                .num_columns(2)
                .spacing(egui::vec2(8.0, 8.0))
                .show(ui, |ui| {
                    ui.label("Username");
                    ui.text_edit_singleline(&mut form.username);
                    ui.end_row();

                    ui.label("Email");
                    ui.text_edit_singleline(&mut form.email);
                    ui.end_row();

                    ui.label("New password");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.password)
                            .password(true)
                            .hint_text("leave empty to keep"),
                    );
                    ui.end_row();

                    ui.label("First name");
                    ui.text_edit_singleline(&mut form.first_name);
                    ui.end_row();

                    ui.label("Last name");
                    ui.text_edit_singleline(&mut form.last_name);
                    ui.end_row();
                });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    actions.push(UiAction::SubmitEdit);
                }
                if ui.button("Cancel").clicked() {
                    actions.push(UiAction::CloseEdit(CloseReason::Cancel));
                }
            });
        });

        if response.should_close() {
            actions.push(UiAction::CloseEdit(CloseReason::Backdrop));
        }
    }

    fn show_delete_confirmation(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        if self.state.pending_delete.is_none() {
            return;
        }

        let response = egui::Modal::new(egui::Id::new("confirm_delete_modal")).show(ctx, |ui| {
            ui.label(DELETE_CONFIRMATION);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    actions.push(UiAction::ConfirmDelete(true));
                }
                if ui.button("Cancel").clicked() {
                    actions.push(UiAction::ConfirmDelete(false));
                }
            });
        });

        if response.should_close() {
            actions.push(UiAction::ConfirmDelete(false));
        }
    }
}

impl eframe::App for UserConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("User Management");
            if let Some(status) = &self.state.status {
                ui.weak(status);
            }
            self.show_notification_banner(ui, &mut actions);
            ui.add_space(6.0);
        });

        egui::SidePanel::left("create_panel")
            .resizable(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.show_create_form(ui, &mut actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_user_list(ui, &mut actions);
        });

        self.show_edit_modal(ctx, &mut actions);
        self.show_delete_confirmation(ctx, &mut actions);

        if !actions.is_empty() {
            self.run_actions(actions);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
