use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RfpId);
id_newtype!(SavedId);
id_newtype!(NoteId);

/// Fixed page size of the `/rfps` listing.
pub const PAGE_SIZE: u32 = 100;

/// Shown in place of focus tags when an opportunity carries none.
pub const PLACEHOLDER_TAG: &str = "General";

/// Maximum number of focus tags rendered for one opportunity.
pub const MAX_DISPLAY_TAGS: usize = 3;
