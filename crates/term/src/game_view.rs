//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{format_elapsed, GameState};
use crate::fb::{str_width, CellStyle, FrameBuffer, Rgb};
use crate::types::{GridSize, Tile};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Display-only values that do not live in the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud {
    /// Last elapsed time pushed by the controller tick.
    pub elapsed_ms: u64,
    pub score: u32,
    /// Highlighted tile.
    pub cursor: Option<usize>,
    /// Saved game awaiting a resume answer.
    pub prompt: Option<PromptView>,
}

/// Summary of the saved game shown by the resume prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptView {
    pub grid: GridSize,
    pub moves: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
}

impl PromptView {
    pub fn of(saved: &GameState) -> Self {
        Self {
            grid: saved.grid_size(),
            moves: saved.moves(),
            matched_pairs: saved.matched_pairs(),
            total_pairs: saved.total_pairs(),
        }
    }
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the memory board.
pub struct GameView {
    /// Tile width in terminal columns.
    tile_w: u16,
    /// Tile height in terminal rows.
    tile_h: u16,
    /// Columns between tiles.
    gap: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            tile_w: 6,
            tile_h: 3,
            gap: 1,
        }
    }
}

impl GameView {
    pub fn new(tile_w: u16, tile_h: u16, gap: u16) -> Self {
        Self {
            tile_w: tile_w.max(4),
            tile_h: tile_h.max(1),
            gap,
        }
    }

    /// Render the game into an existing framebuffer.
    pub fn render_into(&self, state: &GameState, hud: &Hud, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let side = state.grid_size().side() as u16;
        let board_w = side * self.tile_w + (side - 1) * self.gap;
        let board_h = side * self.tile_h;
        let frame_w = board_w + 4;
        let frame_h = board_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w + PANEL_W) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = CellStyle {
            fg: Rgb::new(80, 80, 90),
            bg: BOARD_BG,
            bold: false,
            dim: false,
        };
        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: PANEL_BG,
            bold: false,
            dim: false,
        };

        fb.fill_rect(start_x + 1, start_y + 1, frame_w - 2, frame_h - 2, ' ', bg);
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for (index, tile) in state.tiles().iter().enumerate() {
            let row = index as u16 / side;
            let col = index as u16 % side;
            let x = start_x + 2 + col * (self.tile_w + self.gap);
            let y = start_y + 1 + row * self.tile_h;
            self.draw_tile(fb, x, y, tile, hud.cursor == Some(index));
        }

        self.draw_side_panel(fb, state, hud, viewport, start_x + frame_w + 2, start_y);

        if let Some(prompt) = hud.prompt {
            let lines = [
                "Resume saved game?".to_string(),
                format!(
                    "{}  {}/{} pairs  {} moves",
                    prompt.grid, prompt.matched_pairs, prompt.total_pairs, prompt.moves
                ),
                "y: resume   n: new game".to_string(),
            ];
            draw_overlay(fb, start_x, start_y, frame_w, frame_h, &lines);
        } else if let Some(summary) = state.win_summary() {
            let lines = [
                "YOU WIN".to_string(),
                format!(
                    "Time {}  Moves {}  Score {}",
                    format_elapsed(summary.elapsed_ms),
                    summary.moves,
                    summary.score
                ),
                "r: play again".to_string(),
            ];
            draw_overlay(fb, start_x, start_y, frame_w, frame_h, &lines);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, state: &GameState, hud: &Hud, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(state, hud, viewport, &mut fb);
        fb
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, x: u16, y: u16, tile: &Tile, selected: bool) {
        let (style, face) = if tile.matched {
            let style = CellStyle {
                fg: Rgb::new(200, 230, 200),
                bg: Rgb::new(40, 90, 50),
                bold: false,
                dim: true,
            };
            (style, tile.symbol.as_str())
        } else if tile.flipped {
            let style = CellStyle {
                fg: Rgb::new(20, 20, 20),
                bg: Rgb::new(225, 225, 210),
                bold: true,
                dim: false,
            };
            (style, tile.symbol.as_str())
        } else {
            let style = CellStyle {
                fg: Rgb::new(140, 150, 200),
                bg: Rgb::new(60, 70, 110),
                bold: false,
                dim: false,
            };
            (style, "??")
        };

        fb.fill_rect(x, y, self.tile_w, self.tile_h, ' ', style);

        let mid = y + self.tile_h / 2;
        let face_x = x + self.tile_w.saturating_sub(str_width(face)) / 2;
        fb.put_str(face_x, mid, face, style);

        if selected {
            let marker = CellStyle {
                fg: Rgb::new(255, 220, 80),
                bold: true,
                ..style
            };
            fb.put_char(x, mid, '[', marker);
            fb.put_char(x + self.tile_w - 1, mid, ']', marker);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        state: &GameState,
        hud: &Hud,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: PANEL_BG,
            bold: true,
            dim: false,
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: PANEL_BG,
            bold: false,
            dim: false,
        };

        // Completed games show the frozen summary, not the last tick.
        let (elapsed_ms, score) = match state.win_summary() {
            Some(summary) => (summary.elapsed_ms, summary.score),
            None => (hud.elapsed_ms, hud.score),
        };

        let mut y = start_y;
        fb.put_str(panel_x, y, "TIME", label);
        y += 1;
        fb.put_str(panel_x, y, &format_elapsed(elapsed_ms), value);
        y += 2;

        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        fb.put_u32(panel_x, y, score, value);
        y += 2;

        fb.put_str(panel_x, y, "MOVES", label);
        y += 1;
        fb.put_u32(panel_x, y, state.moves(), value);
        y += 2;

        fb.put_str(panel_x, y, "PAIRS", label);
        y += 1;
        fb.put_str(
            panel_x,
            y,
            &format!("{}/{}", state.matched_pairs(), state.total_pairs()),
            value,
        );
        y += 2;

        fb.put_str(panel_x, y, "GRID", label);
        y += 1;
        fb.put_str(panel_x, y, &state.grid_size().to_string(), value);
        y += 2;

        let help = CellStyle { dim: true, ..value };
        for line in ["n new game", "4/6 grid size", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y += 1;
        }
    }
}

/// Columns reserved right of the board for the side panel.
const PANEL_W: u16 = 16;

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Boxed, centered lines over the board.
fn draw_overlay(
    fb: &mut FrameBuffer,
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
    lines: &[String],
) {
    let style = CellStyle {
        fg: Rgb::new(255, 255, 255),
        bg: PANEL_BG,
        bold: true,
        dim: false,
    };
    let text_w = lines.iter().map(|l| str_width(l)).max().unwrap_or(0);
    let box_w = (text_w + 4).min(frame_w);
    let box_h = lines.len() as u16 + 2;
    let box_x = start_x + frame_w.saturating_sub(box_w) / 2;
    let box_y = start_y + frame_h.saturating_sub(box_h) / 2;

    fb.fill_rect(box_x, box_y, box_w, box_h, ' ', style);
    draw_border(fb, box_x, box_y, box_w, box_h, CellStyle { bold: false, ..style });

    for (i, line) in lines.iter().enumerate() {
        let x = box_x + box_w.saturating_sub(str_width(line)) / 2;
        fb.put_str(x, box_y + 1 + i as u16, line, style);
    }
}
