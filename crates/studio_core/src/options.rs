use std::fmt;
use std::str::FromStr;

/// Clip length offered by the input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClipDuration {
    #[default]
    Five,
    Ten,
    Fifteen,
    Thirty,
}

impl ClipDuration {
    pub const ALL: [ClipDuration; 4] = [
        ClipDuration::Five,
        ClipDuration::Ten,
        ClipDuration::Fifteen,
        ClipDuration::Thirty,
    ];

    pub fn seconds(self) -> u32 {
        match self {
            ClipDuration::Five => 5,
            ClipDuration::Ten => 10,
            ClipDuration::Fifteen => 15,
            ClipDuration::Thirty => 30,
        }
    }

    pub fn from_seconds(seconds: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.seconds() == seconds)
    }

    /// Next option, wrapping around after the longest.
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    /// Previous option, wrapping around before the shortest.
    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl fmt::Display for ClipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
    Classic,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
            Orientation::Classic => "classic",
        };
        f.write_str(name)
    }
}

/// Frame shape requested for the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    #[default]
    Widescreen,
    Vertical,
    Square,
    Standard,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 4] = [
        AspectRatio::Widescreen,
        AspectRatio::Vertical,
        AspectRatio::Square,
        AspectRatio::Standard,
    ];

    /// Ratio string as shown in the form, e.g. `"16:9"`.
    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            AspectRatio::Widescreen => Orientation::Landscape,
            AspectRatio::Vertical => Orientation::Portrait,
            AspectRatio::Square => Orientation::Square,
            AspectRatio::Standard => Orientation::Classic,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.label() == trimmed)
            .ok_or_else(|| format!("unsupported aspect ratio {trimmed:?}"))
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_cycle_both_ways() {
        assert_eq!(ClipDuration::Thirty.next(), ClipDuration::Five);
        assert_eq!(ClipDuration::Five.prev(), ClipDuration::Thirty);
        assert_eq!(ClipDuration::Ten.next(), ClipDuration::Fifteen);
    }

    #[test]
    fn only_offered_durations_parse() {
        assert_eq!(ClipDuration::from_seconds(15), Some(ClipDuration::Fifteen));
        assert_eq!(ClipDuration::from_seconds(20), None);
    }

    #[test]
    fn aspect_ratio_labels_round_trip() {
        assert_eq!("9:16".parse::<AspectRatio>(), Ok(AspectRatio::Vertical));
        assert_eq!(AspectRatio::Standard.to_string(), "4:3");
        assert!("21:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn aspect_ratio_default_is_landscape() {
        assert_eq!(
            AspectRatio::default().orientation(),
            Orientation::Landscape
        );
    }
}
