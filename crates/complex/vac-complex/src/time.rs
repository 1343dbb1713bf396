//! Animation time as an integer frame index.

use serde::{Deserialize, Serialize};

/// The frame a key cell exists at. Key cells live at exactly one `Time`;
/// an inbetween extension would span a `(Time, Time)` range.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Time(pub i32);

impl Time {
    #[inline]
    pub fn frame(self) -> i32 {
        self.0
    }
}
