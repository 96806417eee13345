//! Identifier types for the two arenas the simulator owns.
//!
//! Agents and obstacle vertices both live in dense, append-only arenas; an
//! id is the position of an entry, wrapped so the two kinds cannot be mixed
//! up.  The inner index is `pub` for literal construction in fixtures, but
//! arena code goes through [`from_index`]/[`index`].
//!
//! `INVALID` is the all-ones pattern.  No arena grows large enough to hand
//! it out, so it doubles as the "no such entry" sentinel.
//!
//! [`from_index`]: AgentId::from_index
//! [`index`]: AgentId::index

use std::fmt;

/// Define an id newtype over a `u32` arena slot, with a tag for display.
macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident, $tag:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// The "no such entry" sentinel; largest representable index.
            pub const INVALID: $name = $name(u32::MAX);

            /// Id of the arena slot at `index`.
            #[inline(always)]
            pub fn from_index(index: usize) -> $name {
                $name(index as u32)
            }

            /// The arena slot this id names.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if *self == Self::INVALID {
                    write!(f, concat!($tag, " #invalid"))
                } else {
                    write!(f, concat!($tag, " #{}"), self.0)
                }
            }
        }
    };
}

arena_id! {
    /// An agent, numbered in insertion order and stable for the simulator's
    /// lifetime.
    AgentId, "agent"
}

arena_id! {
    /// An obstacle vertex in the global arena.  Splitting an edge appends
    /// new vertices; ids handed out earlier never move.
    VertexId, "vertex"
}
