//! Output channel layouts understood by the Dolby decoder
//!
//! Each layout maps to the decoder's `out-ch-config` id and the order in which
//! the decoder emits channels. Both must match the decoder exactly.

use std::fmt;

pub const DEFAULT_LAYOUT: &str = "9.1.6";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub label: &'static str,
    pub config_id: u32,
    pub channel_names: &'static [&'static str],
}

pub static LAYOUTS: [ChannelLayout; 13] = [
    ChannelLayout { label: "2.0", config_id: 0, channel_names: &["L", "R"] },
    ChannelLayout { label: "3.1", config_id: 3, channel_names: &["L", "R", "C", "LFE"] },
    ChannelLayout { label: "5.1", config_id: 7, channel_names: &["L", "R", "C", "LFE", "Ls", "Rs"] },
    ChannelLayout {
        label: "7.1",
        config_id: 11,
        channel_names: &["L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs"],
    },
    ChannelLayout {
        label: "9.1",
        config_id: 12,
        channel_names: &["L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs", "Lw", "Rw"],
    },
    ChannelLayout {
        label: "5.1.2",
        config_id: 13,
        channel_names: &["L", "R", "C", "LFE", "Ls", "Rs", "Ltm", "Rtm"],
    },
    ChannelLayout {
        label: "5.1.4",
        config_id: 14,
        channel_names: &["L", "R", "C", "LFE", "Ls", "Rs", "Ltf", "Rtf", "Ltr", "Rtr"],
    },
    ChannelLayout {
        label: "7.1.2",
        config_id: 15,
        channel_names: &["L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs", "Ltm", "Rtm"],
    },
    ChannelLayout {
        label: "7.1.4",
        config_id: 16,
        channel_names: &["L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs", "Ltf", "Rtf", "Ltr", "Rtr"],
    },
    ChannelLayout {
        label: "7.1.6",
        config_id: 17,
        channel_names: &[
            "L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs", "Ltf", "Rtf", "Ltm", "Rtm", "Ltr", "Rtr",
        ],
    },
    ChannelLayout {
        label: "9.1.2",
        config_id: 18,
        channel_names: &["L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs", "Lw", "Rw", "Ltm", "Rtm"],
    },
    ChannelLayout {
        label: "9.1.4",
        config_id: 19,
        channel_names: &[
            "L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs", "Lw", "Rw", "Ltf", "Rtf", "Ltr", "Rtr",
        ],
    },
    ChannelLayout {
        label: "9.1.6",
        config_id: 20,
        channel_names: &[
            "L", "R", "C", "LFE", "Ls", "Rs", "Lrs", "Rrs", "Lw", "Rw", "Ltf", "Rtf", "Ltm", "Rtm",
            "Ltr", "Rtr",
        ],
    },
];

impl ChannelLayout {
    /// Look up a layout by its label, e.g. `"7.1.4"`.
    pub fn find(label: &str) -> Option<&'static ChannelLayout> {
        LAYOUTS.iter().find(|layout| layout.label == label)
    }

    pub fn channel_count(&self) -> usize {
        self.channel_names.len()
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {}, {} ch)", self.label, self.config_id, self.channel_count())
    }
}

/// All layout labels in table order
pub fn labels() -> impl Iterator<Item = &'static str> {
    LAYOUTS.iter().map(|layout| layout.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_layout() {
        let layout = ChannelLayout::find("5.1").unwrap();
        assert_eq!(layout.config_id, 7);
        assert_eq!(layout.channel_names, &["L", "R", "C", "LFE", "Ls", "Rs"]);
        assert!(ChannelLayout::find("4.0").is_none());
    }

    #[test]
    fn test_default_layout_exists() {
        let layout = ChannelLayout::find(DEFAULT_LAYOUT).unwrap();
        assert_eq!(layout.config_id, 20);
        assert_eq!(layout.channel_count(), 16);
    }

    #[test]
    fn test_channel_counts_match_labels() {
        // "a.b.c" means a + b + c speakers
        for layout in LAYOUTS.iter() {
            let expected: usize = layout.label.split('.').map(|n| n.parse::<usize>().unwrap()).sum();
            assert_eq!(layout.channel_count(), expected, "layout {}", layout.label);
            assert_eq!(&layout.channel_names[..2], &["L", "R"]);
        }
    }

    #[test]
    fn test_labels_unique() {
        let mut all: Vec<_> = labels().collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), LAYOUTS.len());
    }
}
