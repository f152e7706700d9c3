//! Game screen: composes the playfield into a pixel buffer and draws it with
//! half-block cells, plus the info panel, status lines and overlays.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use skyflap::assets::{Rgba, Sprite};
use skyflap::core::{GROUND_LEVEL, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use skyflap::game::{RoundPhase, SkyflapGame};

const SKY: Rgba = Rgba::opaque(110, 190, 215);
const PARTICLE: Rgba = Rgba::opaque(255, 255, 255);
const CLOUD_Y: i32 = 6;
const INFO_PANEL_WIDTH: u16 = 24;
const STATUS_LINES: u16 = 2;
const CONTROLS: [(&str, &str); 2] = [("[Space/Up/Enter]", "Flap"), ("[Esc/q]", "Quit")];

/// Opaque RGB pixel buffer the size of the playfield.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<(u8, u8, u8)>,
}

fn mix(src: u8, dst: u8, alpha: f64) -> u8 {
    (src as f64 * alpha + dst as f64 * (1.0 - alpha)).round() as u8
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![(fill.r, fill.g, fill.b); (width * height) as usize],
        }
    }

    /// Pixel at `(x, y)`; out of range reads as black.
    pub fn get(&self, x: i32, y: i32) -> (u8, u8, u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return (0, 0, 0);
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize]
    }

    /// Alpha-blend one colour onto `(x, y)`; `alpha` overrides the colour's own.
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba, alpha: f64) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        let (r, g, b) = self.pixels[idx];
        self.pixels[idx] = (
            mix(color.r, r, alpha),
            mix(color.g, g, alpha),
            mix(color.b, b, alpha),
        );
    }

    /// Draw `sprite` with its top-left at `(x, y)`, clipped to the canvas.
    pub fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) {
        for sy in 0..sprite.height() as i32 {
            for sx in 0..sprite.width() as i32 {
                let px = sprite.pixel(sx, sy);
                if px.a > 0 {
                    self.blend(x + sx, y + sy, px, px.a as f64 / 255.0);
                }
            }
        }
    }

    /// Repeat `sprite` horizontally across the canvas, scrolled left by `offset`.
    pub fn tile(&mut self, sprite: &Sprite, offset: f64, y: i32) {
        let width = sprite.width() as i32;
        if width == 0 {
            return;
        }
        let mut x = -(offset.floor() as i32);
        while x < self.width as i32 {
            self.blit(sprite, x, y);
            x += width;
        }
    }

    /// Blend `color` over the whole canvas.
    pub fn wash(&mut self, color: Rgba, alpha: f64) {
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                self.blend(x, y, color, alpha);
            }
        }
    }
}

/// Paint the whole playfield for the current tick, back to front.
pub fn compose(game: &mut SkyflapGame, far: &Sprite, near: &Sprite, ground: &Sprite) -> Canvas {
    let mut canvas = Canvas::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT, SKY);
    let ground_y = GROUND_LEVEL as i32;

    canvas.tile(far, game.scenery.background_long_offset, CLOUD_Y);
    canvas.tile(
        near,
        game.scenery.background_offset,
        ground_y - near.height() as i32,
    );

    let time = game.session.elapsed;
    for pair in &game.pipes.pairs {
        for (polarity, (x, y)) in game.pipes.placements(pair, time) {
            canvas.blit(game.pipes.sprite(polarity), x, y);
        }
    }

    let (frame, (x, y)) = game.bird.pose();
    canvas.blit(&frame.sprite, x, y);

    canvas.tile(ground, game.scenery.ground_offset, ground_y);

    for particle in &game.effects.particles {
        canvas.blend(
            particle.x.round() as i32,
            particle.y.round() as i32,
            PARTICLE,
            particle.alpha() / 255.0,
        );
    }

    if game.effects.flash_alpha > 0.0 {
        canvas.wash(
            Rgba::opaque(255, 255, 255),
            game.effects.flash_alpha / 255.0,
        );
    }
    canvas
}

/// Half-block lines for `area`, scaling the canvas to fit and shifting the
/// sample point by the shake offset.
pub fn to_lines(canvas: &Canvas, width: u16, height: u16, shake: (i32, i32)) -> Vec<Line<'static>> {
    let (w, h) = (width.max(1) as f64, (height.max(1) * 2) as f64);
    let sample = |cx: u16, py: u32| {
        let x = (cx as f64 * canvas.width as f64 / w) as i32 - shake.0;
        let y = (py as f64 * canvas.height as f64 / h) as i32 - shake.1;
        let (r, g, b) = canvas.get(x, y);
        Color::Rgb(r, g, b)
    };

    (0..height)
        .map(|row| {
            let spans: Vec<Span> = (0..width)
                .map(|col| {
                    let top = sample(col, row as u32 * 2);
                    let bottom = sample(col, row as u32 * 2 + 1);
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Render the game screen.
pub fn render_game(frame: &mut Frame, area: Rect, game: &mut SkyflapGame, images: &SceneryImages) {
    let screen = split_screen(frame, area, game.phase);

    let canvas = compose(game, &images.far, &images.near, &images.ground);
    let lines = to_lines(
        &canvas,
        screen.playfield.width,
        screen.playfield.height,
        game.effects.shake_offset,
    );
    frame.render_widget(Paragraph::new(lines), screen.playfield);

    render_score(frame, screen.playfield, game);
    render_overlay(frame, screen.playfield, game);
    render_status(frame, screen.status, game);
    render_info_panel(frame, screen.info, game);
}

/// Scenery images the renderer keeps, since the game only holds their widths.
pub struct SceneryImages {
    pub far: Sprite,
    pub near: Sprite,
    pub ground: Sprite,
}

struct ScreenAreas {
    playfield: Rect,
    status: Rect,
    info: Rect,
}

fn phase_color(phase: RoundPhase) -> Color {
    match phase {
        RoundPhase::Menu => Color::Cyan,
        RoundPhase::Playing => Color::Green,
        RoundPhase::GameOver => Color::Red,
    }
}

/// Largest playfield that fits `area` without stretching past one sprite
/// pixel per half-block, centred horizontally.
fn fit_playfield(area: Rect) -> Rect {
    let width = area.width.min(PLAYFIELD_WIDTH as u16);
    let height = area.height.min((PLAYFIELD_HEIGHT / 2) as u16);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height,
    }
}

/// Clear the screen, draw the outer border in the phase colour and carve out
/// the playfield, the status lines below it and the info column.
fn split_screen(frame: &mut Frame, area: Rect, phase: RoundPhase) -> ScreenAreas {
    frame.render_widget(Clear, area);
    let outer = Block::default()
        .title(" Skyflap ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(phase_color(phase)));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(INFO_PANEL_WIDTH)])
        .split(inner);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(STATUS_LINES)])
        .split(columns[0]);

    ScreenAreas {
        playfield: fit_playfield(rows[0]),
        status: rows[1],
        info: columns[1],
    }
}

fn score_style(game: &SkyflapGame) -> Style {
    let color = if game.session.new_record {
        Color::Yellow
    } else {
        Color::White
    };
    let mut style = Style::default().fg(color);
    if game.effects.score_scale > 1.0 {
        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    style
}

fn render_score(frame: &mut Frame, area: Rect, game: &SkyflapGame) {
    if game.phase != RoundPhase::Playing || area.height < 2 {
        return;
    }
    let label = format!(" {} ", game.session.score);
    let text = Paragraph::new(Line::from(Span::styled(label, score_style(game))))
        .alignment(Alignment::Center);
    frame.render_widget(
        text,
        Rect {
            y: area.y + 1,
            height: 1,
            ..area
        },
    );
}

/// Bordered box centred in the playfield, title first, then `lines`.
fn render_banner(frame: &mut Frame, area: Rect, title: &str, color: Color, lines: Vec<Line<'_>>) {
    let height = (lines.len() as u16 + 3).min(area.height);
    let width = area.width.saturating_sub(4).min(36);
    if height < 3 || width < 8 {
        return;
    }
    let banner = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, banner);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(banner);
    frame.render_widget(block, banner);

    let title_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    let mut text = vec![Line::from(Span::styled(title.to_string(), title_style))];
    text.extend(lines);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn render_overlay(frame: &mut Frame, area: Rect, game: &SkyflapGame) {
    match game.phase {
        RoundPhase::Menu => render_banner(
            frame,
            area,
            "SKYFLAP",
            Color::Yellow,
            vec![Line::from("PRESS SPACE TO FLAP")],
        ),
        RoundPhase::Playing => {}
        RoundPhase::GameOver => {
            let (result, color) = if game.session.new_record {
                (
                    format!("NEW RECORD: {}!", game.session.score),
                    Color::Yellow,
                )
            } else {
                (
                    format!("HIGH SCORE: {}", game.session.high_score),
                    Color::White,
                )
            };
            let prompt = if game.game_over.restart_countdown.is_some() {
                Span::styled(
                    "[ RESTART ]",
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                )
            } else if game.can_restart() {
                Span::styled("[ RESTART ]", Style::default().fg(Color::Cyan))
            } else {
                Span::raw("")
            };
            render_banner(
                frame,
                area,
                "GAME OVER",
                Color::Red,
                vec![
                    Line::from(format!("Score: {}", game.session.score)),
                    Line::from(Span::styled(result, Style::default().fg(color))),
                    Line::from(prompt),
                ],
            );
        }
    }
}

fn status_message(game: &SkyflapGame) -> (&'static str, Color) {
    match game.phase {
        RoundPhase::Menu => ("Press Space to start!", Color::Yellow),
        RoundPhase::Playing => ("Fly through the gaps", Color::Green),
        RoundPhase::GameOver if game.can_restart() => ("Press Space to restart", Color::Yellow),
        RoundPhase::GameOver => ("Crashed!", Color::Red),
    }
}

/// Phase message on the first line, key hints on the second.
fn render_status(frame: &mut Frame, area: Rect, game: &SkyflapGame) {
    if area.height == 0 {
        return;
    }
    let (message, color) = status_message(game);
    let status = Style::default().fg(color);
    let mut lines = vec![Line::from(Span::styled(message, status))];

    if area.height >= STATUS_LINES {
        let key = Style::default().fg(Color::White);
        let hint = Style::default().fg(Color::DarkGray);
        let mut spans = Vec::new();
        for (i, (keys, action)) in CONTROLS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*keys, key));
            spans.push(Span::styled(format!(" {action}"), hint));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// `mm:ss` for the elapsed-time readout.
fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn render_info_panel(frame: &mut Frame, area: Rect, game: &SkyflapGame) {
    let block = Block::default()
        .title(" Run ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);
    let d = &game.difficulty;
    let row = |name: &str, text: String, style: Style| {
        Line::from(vec![
            Span::styled(format!(" {name:<9}"), label),
            Span::styled(text, style),
        ])
    };
    let best_style = if game.session.new_record {
        Style::default().fg(Color::Yellow)
    } else {
        value
    };

    let lines = vec![
        row("Score", game.session.score.to_string(), score_style(game)),
        row("Best", game.best_score().to_string(), best_style),
        row("Time", format_elapsed(game.session.elapsed), value),
        Line::from(""),
        row("Level", format!("{:.0}%", d.progress * 100.0), value),
        row("Speed", format!("{:.1}", d.scroll_speed), value),
        row("Gap", format!("{:.1}", d.pipe_gap), value),
        row("Spawn", format!("{:.2}s", d.spawn_interval), value),
        row("Sway", format!("{:.1}", d.oscillation_target), value),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
