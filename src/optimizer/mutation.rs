use crate::canvas::{Layout, Rgb};
use fastrand::Rng;
use std::fmt;

pub const NUDGE_STEPS_PX: [i32; 2] = [20, 40];
pub const FONT_STEPS_PX: [u32; 2] = [2, 4];
pub const RECOLOR_PALETTE: [Rgb; 2] = [Rgb::BLACK, Rgb::WHITE];
pub const JITTER_RANGE_PX: std::ops::RangeInclusive<i32> = 20..=120;

/// A single-attribute change to a single text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Nudge { block: String, dy: i32, from: i32 },
    GrowFont { block: String, delta: u32, from: u32 },
    Recolor { block: String, from: Rgb, to: Rgb },
}

impl Mutation {
    pub fn block_id(&self) -> &str {
        match self {
            Self::Nudge { block, .. } | Self::GrowFont { block, .. } | Self::Recolor { block, .. } => {
                block
            }
        }
    }

    /// Applies the change to the block with the matching id, if any.
    pub fn apply(&self, layout: &mut Layout) {
        let Some(tb) = layout
            .text_blocks
            .iter_mut()
            .find(|tb| tb.id == self.block_id())
        else {
            return;
        };
        match self {
            Self::Nudge { dy, .. } => tb.y = tb.y.saturating_add(*dy),
            Self::GrowFont { delta, .. } => tb.font_size_px = tb.font_size_px.saturating_add(*delta),
            Self::Recolor { to, .. } => tb.color = *to,
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nudge { block, dy, from } => write!(
                f,
                "Moved text '{}' down {}px (y {} -> {})",
                block,
                dy,
                from,
                from.saturating_add(*dy)
            ),
            Self::GrowFont { block, delta, from } => write!(
                f,
                "Enlarged text '{}' font by {}px ({}px -> {}px)",
                block,
                delta,
                from,
                from.saturating_add(*delta)
            ),
            Self::Recolor { block, from, to } => {
                write!(f, "Recolored text '{}' from {} to {}", block, from, to)
            }
        }
    }
}

/// A neighbor layout together with the move that produced it.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub layout: Layout,
    pub mutation: Mutation,
}

/// Which optional moves join the default neighborhood.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborhoodOptions {
    pub allow_recolor: bool,
    /// Seeds the jitter move for this round. `None` disables it.
    pub jitter_seed: Option<u64>,
}

/// Enumerates the moves for `layout`: per block in block order, nudges
/// before font growth, ascending magnitude, then any opt-in moves.
pub fn mutations(layout: &Layout, opts: &NeighborhoodOptions) -> Vec<Mutation> {
    let mut rng = opts.jitter_seed.map(Rng::with_seed);
    let mut moves = Vec::with_capacity(layout.text_blocks.len() * 4);

    for tb in &layout.text_blocks {
        for dy in NUDGE_STEPS_PX {
            moves.push(Mutation::Nudge {
                block: tb.id.clone(),
                dy,
                from: tb.y,
            });
        }
        for delta in FONT_STEPS_PX {
            moves.push(Mutation::GrowFont {
                block: tb.id.clone(),
                delta,
                from: tb.font_size_px,
            });
        }
        if opts.allow_recolor {
            for to in RECOLOR_PALETTE.into_iter().filter(|&c| c != tb.color) {
                moves.push(Mutation::Recolor {
                    block: tb.id.clone(),
                    from: tb.color,
                    to,
                });
            }
        }
        if let Some(rng) = rng.as_mut() {
            moves.push(Mutation::Nudge {
                block: tb.id.clone(),
                dy: rng.i32(JITTER_RANGE_PX),
                from: tb.y,
            });
        }
    }
    moves
}

/// Materializes every move as an independent deep copy of `layout`.
pub fn neighbors(layout: &Layout, opts: &NeighborhoodOptions) -> Vec<Candidate> {
    mutations(layout, opts)
        .into_iter()
        .map(|mutation| {
            let mut next = layout.clone();
            mutation.apply(&mut next);
            Candidate {
                layout: next,
                mutation,
            }
        })
        .collect()
}
