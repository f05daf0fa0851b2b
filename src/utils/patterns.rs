// Regular expressions compiled once per process

use once_cell::sync::Lazy;
use regex::Regex;

/// ANSI SGR/cursor escape sequences as emitted by terminal-oriented web services
pub static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1B\[(([0-9]{1,3})?(;)?([0-9]{1,3})?)*[mKHfJ]").expect("ANSI escape pattern")
});

/// First `NN%` in a line of `pactl get-sink-volume` output
pub static VOLUME_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)%").expect("volume percent pattern"));

/// Compile every static pattern now, so a broken one aborts startup instead of
/// surfacing on the first tick that needs it.
pub fn force_all() {
    Lazy::force(&ANSI_ESCAPE);
    Lazy::force(&VOLUME_PERCENT);
}
