//! Uniform random pick among the options of a roulette.
//!
//! The display spins exist for the animation only: each is an independent
//! draw handed to a callback, and the winner is one more independent draw
//! made after them. Estimated time plays no part in the odds.
//!
//! ```rust
//! use kitty::libs::roulette::spin;
//! use kitty::libs::block::{Block, BlockType};
//!
//! let options: Vec<Block> = (1..=3)
//!     .map(|id| Block {
//!         id,
//!         name: format!("Option {}", id),
//!         description: String::new(),
//!         block_type: BlockType::Standard,
//!         estimated_minutes: 10,
//!         parent_id: Some(100),
//!     })
//!     .collect();
//!
//! let mut shown = 0;
//! let winner = spin(&options, &mut rand::thread_rng(), 20, |_| shown += 1)?;
//! assert_eq!(shown, 20);
//! assert!(options.iter().any(|o| o.id == winner.id));
//! # Ok::<(), kitty::libs::error::CoreError>(())
//! ```

use crate::db::blocks::Blocks;
use crate::libs::block::Block;
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::messages::Message;
use rand::Rng;

/// Number of display draws made before the final pick.
pub const DEFAULT_DISPLAY_SPINS: usize = 20;

/// Index in `0..len`, each with probability `1 / len`.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> CoreResult<usize> {
    if len == 0 {
        return Err(CoreError::EmptyRoulette);
    }
    Ok(rng.gen_range(0..len))
}

/// Runs `display_spins` display draws through `on_display`, then returns
/// the winner drawn independently of them.
pub fn spin<'a, R, F>(options: &'a [Block], rng: &mut R, display_spins: usize, mut on_display: F) -> CoreResult<&'a Block>
where
    R: Rng + ?Sized,
    F: FnMut(&Block),
{
    if options.is_empty() {
        return Err(CoreError::EmptyRoulette);
    }

    for _ in 0..display_spins {
        let shown = pick_index(rng, options.len())?;
        on_display(&options[shown]);
    }

    let winner = &options[pick_index(rng, options.len())?];
    tracing::debug!(winner = winner.id, candidates = options.len(), "roulette spun");
    Ok(winner)
}

/// Loads the options of `roulette_id` and spins them.
pub fn spin_roulette<R, F>(blocks: &Blocks, roulette_id: i64, rng: &mut R, display_spins: usize, on_display: F) -> CoreResult<Block>
where
    R: Rng + ?Sized,
    F: FnMut(&Block),
{
    let roulette = blocks.get(roulette_id)?.ok_or_else(|| CoreError::not_found("block", roulette_id))?;
    if !roulette.is_roulette() {
        return Err(CoreError::validation(Message::NotARoulette(roulette.name)));
    }

    let options = blocks.list_options(roulette_id)?;
    let winner = spin(&options, rng, display_spins, on_display)?;
    Ok(winner.clone())
}
