//! City wall ring layout.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    CornerNw,
    CornerNe,
    CornerSe,
    CornerSw,
    EdgeN,
    EdgeE,
    EdgeS,
    EdgeW,
    GateN,
    GateE,
    GateS,
    GateW,
}

impl WallKind {
    /// Variant number of the `WALLAA` block for this piece.
    pub fn variant(&self) -> u32 {
        match self {
            WallKind::CornerNw => 1,
            WallKind::CornerNe => 2,
            WallKind::CornerSe => 3,
            WallKind::CornerSw => 4,
            WallKind::EdgeN => 5,
            WallKind::EdgeE => 6,
            WallKind::EdgeS => 7,
            WallKind::EdgeW => 8,
            WallKind::GateN => 9,
            WallKind::GateE => 10,
            WallKind::GateS => 11,
            WallKind::GateW => 12,
        }
    }

    pub fn block_name(&self) -> String {
        format!("WALLAA{:02}.RMB", self.variant())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallPiece {
    pub x: u8,
    pub y: u8,
    pub kind: WallKind,
}

/// Wall pieces around the perimeter of a `width × height` grid, with one gate
/// per side. Grids smaller than 3×3 get no wall.
pub fn calculate_wall_positions<R: Rng + ?Sized>(
    width: u8,
    height: u8,
    rng: &mut R,
) -> Vec<WallPiece> {
    if width < 3 || height < 3 {
        return Vec::new();
    }
    let (right, bottom) = (width - 1, height - 1);
    let gate_n = rng.gen_range(1..right);
    let gate_e = rng.gen_range(1..bottom);
    let gate_s = rng.gen_range(1..right);
    let gate_w = rng.gen_range(1..bottom);

    let mut pieces = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let kind = match (x, y) {
                (0, 0) => WallKind::CornerNw,
                (x, 0) if x == right => WallKind::CornerNe,
                (x, y) if x == right && y == bottom => WallKind::CornerSe,
                (0, y) if y == bottom => WallKind::CornerSw,
                (x, 0) if x == gate_n => WallKind::GateN,
                (_, 0) => WallKind::EdgeN,
                (x, y) if x == right && y == gate_e => WallKind::GateE,
                (x, _) if x == right => WallKind::EdgeE,
                (x, y) if y == bottom && x == gate_s => WallKind::GateS,
                (_, y) if y == bottom => WallKind::EdgeS,
                (0, y) if y == gate_w => WallKind::GateW,
                (0, _) => WallKind::EdgeW,
                _ => continue,
            };
            pieces.push(WallPiece { x, y, kind });
        }
    }
    pieces
}
