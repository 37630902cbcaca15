//! The lookup widget panel.
//!
//! Owns the input field, the result region, the flag container, the copy
//! controls, and the example snippet rows. The window harness calls
//! [`LookupUI::show`] once per frame and uses the scheduling accessors
//! (`is_loading`, `flag_playing`, `next_copy_revert`) to decide when to wake
//! next.

use std::time::Instant;

use egui::text::LayoutJob;
use egui::{
    Align2, Color32, Context, FontId, Key, RichText, Stroke, StrokeKind, TextFormat, Ui, Vec2,
};

use crate::clipboard::CopyControl;
use crate::config::Config;
use crate::flag::{FlagElement, FlagIndicator};
use crate::globe::Globe;
use crate::highlight::{self, HighlightedDocument};
use crate::lookup::{LOOKUP_PATH, LookupClient, LookupPhase};
use crate::placeholder::PlaceholderRotator;

const ERROR_RED: Color32 = Color32::from_rgb(255, 100, 100);
const BADGE_BG: Color32 = Color32::from_rgb(38, 42, 56);
const BADGE_BORDER: Color32 = Color32::from_rgb(0x43, 0x61, 0xee);
const RESULT_FONT: f32 = 13.0;

/// A static example snippet row with its own copy control.
struct Snippet {
    text: String,
    copy: CopyControl,
}

pub struct LookupUI {
    input: String,
    hint: String,
    rotator: PlaceholderRotator,
    client: LookupClient,
    flag: FlagIndicator,
    globe: Globe,
    copy_result: CopyControl,
    snippets: Vec<Snippet>,
    notice_open: bool,
    seen_revision: u64,
    displayed: Option<HighlightedDocument>,
}

impl LookupUI {
    pub fn new(config: &Config) -> Self {
        let agent = crate::http::agent();
        let mut rotator = PlaceholderRotator::new(config.example_ips.clone());
        // First hint goes up before the first timer tick.
        let hint = rotator.tick();

        let endpoint = config.endpoint.trim_end_matches('/');
        let snippets = vec![
            Snippet {
                text: format!("curl {endpoint}{LOOKUP_PATH}/8.8.8.8"),
                copy: CopyControl::new(config.copy_feedback_window()),
            },
            Snippet {
                text: format!("curl \"{endpoint}{LOOKUP_PATH}?ip=8.8.8.8\""),
                copy: CopyControl::new(config.copy_feedback_window()),
            },
        ];

        Self {
            input: String::new(),
            hint,
            rotator,
            client: LookupClient::new(agent.clone(), config.endpoint.clone()),
            flag: FlagIndicator::new(agent, config.flag_base_url.clone()),
            globe: Globe::new(),
            copy_result: CopyControl::new(config.copy_feedback_window()),
            snippets,
            notice_open: false,
            seen_revision: 0,
            displayed: None,
        }
    }

    /// Inject the decorative graphic; called once window bring-up completes.
    pub fn mark_ready(&mut self) {
        self.globe.mark_ready();
    }

    /// Advance the placeholder hint to the next example address.
    pub fn rotate_placeholder(&mut self) {
        self.hint = self.rotator.tick();
    }

    /// Pre-fill the input and submit, as if the user had typed and pressed
    /// Enter. Used by the `--ip` flag.
    pub fn prefill_and_submit(&mut self, ip: &str) {
        self.input = ip.to_string();
        self.submit();
    }

    /// Whether a lookup is in flight (the loop polls faster while true).
    pub fn is_loading(&self) -> bool {
        self.client.phase().is_loading()
    }

    /// Whether the empty-input notice is currently blocking the panel.
    pub fn is_notice_open(&self) -> bool {
        self.notice_open
    }

    /// Current lookup phase, as the result region sees it.
    pub fn phase(&self) -> LookupPhase {
        self.client.phase()
    }

    /// Whether the flag element is animating (the loop runs frames while
    /// true).
    pub fn flag_playing(&self) -> bool {
        self.flag.is_playing()
    }

    /// Earliest instant at which any copy control's confirmation glyph
    /// reverts.
    pub fn next_copy_revert(&self, now: Instant) -> Option<Instant> {
        self.copy_result
            .revert_deadline(now)
            .into_iter()
            .chain(
                self.snippets
                    .iter()
                    .filter_map(|snippet| snippet.copy.revert_deadline(now)),
            )
            .min()
    }

    /// Shared submit path for the button and the Enter key: trim, reject
    /// empty input with a blocking notice, otherwise dispatch.
    fn submit(&mut self) {
        let ip = self.input.trim().to_string();
        if ip.is_empty() {
            self.notice_open = true;
            return;
        }
        self.flag.hide();
        self.client.perform_lookup(&ip);
    }

    /// React to phase transitions published by worker threads: build the
    /// highlighted document and mount or hide the flag. Runs once per
    /// revision, so a late response from an overlapping lookup re-syncs the
    /// pane exactly like a fresh one (last response wins).
    fn sync_phase(&mut self) {
        let (revision, phase) = self.client.snapshot();
        if revision == self.seen_revision {
            return;
        }
        self.seen_revision = revision;

        match &phase {
            LookupPhase::Success(result) => {
                self.displayed = Some(highlight::highlight_value(result.payload()));
                match result.country_code() {
                    Some(code) => self.flag.show(code),
                    None => self.flag.hide(),
                }
            }
            LookupPhase::Loading | LookupPhase::Failed(_) => {
                self.displayed = None;
                self.flag.hide();
            }
            LookupPhase::Idle => {}
        }
    }

    /// Render one frame of the panel.
    pub fn show(&mut self, ctx: &Context) {
        let now = Instant::now();
        self.sync_phase();
        let phase = self.client.phase();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_top(|ui| {
                ui.vertical(|ui| {
                    ui.set_width(ui.available_width() - 300.0);
                    self.show_widget_column(ui, &phase, now);
                });
                ui.vertical(|ui| {
                    ui.add_space(24.0);
                    self.globe.paint(ui, 280.0);
                });
            });
        });

        self.show_notice(ctx);
    }

    fn show_widget_column(&mut self, ui: &mut Ui, phase: &LookupPhase, now: Instant) {
        ui.heading("GeoLens");
        ui.label("Look up geolocation details for any IP address.");
        ui.add_space(8.0);

        // Two triggers, one submit path.
        let mut submit_requested = false;
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text(self.hint.clone())
                    .desired_width(280.0),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                submit_requested = true;
            }
            if ui.button("Lookup").clicked() {
                submit_requested = true;
            }
        });
        if submit_requested {
            self.submit();
        }

        ui.add_space(12.0);
        self.show_result_region(ui, phase, now);

        if self.flag.is_visible()
            && let Some(element) = self.flag.element().cloned()
        {
            ui.add_space(12.0);
            let progress = self.flag.progress(now);
            paint_flag_badge(ui, &element, progress);
        }

        ui.add_space(16.0);
        ui.separator();
        self.show_snippets(ui, now);
    }

    fn show_result_region(&mut self, ui: &mut Ui, phase: &LookupPhase, now: Instant) {
        match phase {
            LookupPhase::Idle => {}
            LookupPhase::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
            LookupPhase::Success(_) => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Result").strong());
                    if ui.button(self.copy_result.glyph(now)).clicked()
                        && let Some(doc) = &self.displayed
                    {
                        self.copy_result.trigger(&doc.plain_text());
                    }
                });
                if let Some(doc) = &self.displayed {
                    egui::ScrollArea::vertical()
                        .max_height(280.0)
                        .show(ui, |ui| {
                            ui.label(layout_document(doc));
                        });
                }
            }
            LookupPhase::Failed(description) => {
                ui.colored_label(ERROR_RED, format!("Error: {description}"));
            }
        }
    }

    fn show_snippets(&mut self, ui: &mut Ui, now: Instant) {
        ui.label(RichText::new("API examples").strong());
        ui.add_space(4.0);
        for snippet in &mut self.snippets {
            ui.horizontal(|ui| {
                ui.monospace(&snippet.text);
                if ui.small_button(snippet.copy.glyph(now)).clicked() {
                    snippet.copy.trigger(&snippet.text);
                }
            });
        }
    }

    /// Blocking notice for empty submissions. Nothing else is interactive
    /// while it is open.
    fn show_notice(&mut self, ctx: &Context) {
        if !self.notice_open {
            return;
        }
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Please enter an IP address");
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.notice_open = false;
                }
            });
    }
}

/// Build a monospace layout job from the highlighted document, one colored
/// section per span.
fn layout_document(doc: &HighlightedDocument) -> LayoutJob {
    let mut job = LayoutJob::default();
    for span in doc.spans() {
        job.append(
            &span.text,
            0.0,
            TextFormat {
                font_id: FontId::monospace(RESULT_FONT),
                color: span.kind.color(),
                ..Default::default()
            },
        );
    }
    job
}

/// Paint the mounted flag element as an animated badge: rounded card, the
/// country code, and a playback sweep along the bottom edge.
fn paint_flag_badge(ui: &mut Ui, element: &FlagElement, progress: f32) {
    let (response, painter) =
        ui.allocate_painter(Vec2::splat(element.size), egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 12.0, BADGE_BG);
    painter.rect_stroke(rect, 12.0, Stroke::new(1.5, BADGE_BORDER), StrokeKind::Inside);

    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &element.country_code,
        FontId::proportional(element.size * 0.3),
        Color32::WHITE,
    );

    let sweep = rect.shrink(10.0);
    let track_y = sweep.bottom();
    painter.line_segment(
        [
            egui::pos2(sweep.left(), track_y),
            egui::pos2(sweep.right(), track_y),
        ],
        Stroke::new(2.0, BADGE_BG.gamma_multiply(2.0)),
    );
    let head_x = sweep.left() + sweep.width() * progress;
    painter.circle_filled(egui::pos2(head_x, track_y), 3.0, BADGE_BORDER);

    response.on_hover_text(&element.src);
}
