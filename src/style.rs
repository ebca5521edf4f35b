/// Static styling table for the three sentiment labels.
use crate::models::Sentiment;

/// Visual treatment of a sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentStyle {
    pub color: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub const POSITIF: SentimentStyle = SentimentStyle {
    color: "#A6E3C5",
    icon: "😊",
    description: "Sentimen positif kuat terdeteksi.",
};

pub const NEGATIF: SentimentStyle = SentimentStyle {
    color: "#F5B8C2",
    icon: "😔",
    description: "Sentimen negatif terdeteksi.",
};

pub const NETRAL: SentimentStyle = SentimentStyle {
    color: "#BFD7EE",
    icon: "😐",
    description: "Sentimen netral atau objektif.",
};

/// Look up the style for a label; anything unrecognized gets the Netral style.
pub fn style_for(sentiment: &Sentiment) -> &'static SentimentStyle {
    match sentiment {
        Sentiment::Positif => &POSITIF,
        Sentiment::Negatif => &NEGATIF,
        Sentiment::Netral | Sentiment::Other(_) => &NETRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_have_distinct_styles() {
        assert_eq!(style_for(&Sentiment::Positif).color, "#A6E3C5");
        assert_eq!(style_for(&Sentiment::Negatif).icon, "😔");
        assert_eq!(style_for(&Sentiment::Netral), &NETRAL);
    }

    #[test]
    fn unknown_label_falls_back_to_netral() {
        let style = style_for(&Sentiment::parse("Sarkas"));
        assert_eq!(style, &NETRAL);
    }
}
