/// Feelings offered as one-tap choices on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Anxious,
    Confused,
    Depressed,
    Doubtful,
    Grateful,
    Guilty,
    Happy,
    Hurt,
    Jealous,
    Nervous,
    Sad,
    Scared,
    Tired,
    Unloved,
    Lost,
    Peaceful,
    Lonely,
    Confident,
}

impl Emotion {
    /// Display order.
    pub const ALL: [Emotion; 18] = [
        Emotion::Anxious,
        Emotion::Confused,
        Emotion::Depressed,
        Emotion::Doubtful,
        Emotion::Grateful,
        Emotion::Guilty,
        Emotion::Happy,
        Emotion::Hurt,
        Emotion::Jealous,
        Emotion::Nervous,
        Emotion::Sad,
        Emotion::Scared,
        Emotion::Tired,
        Emotion::Unloved,
        Emotion::Lost,
        Emotion::Peaceful,
        Emotion::Lonely,
        Emotion::Confident,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Anxious => "Anxious",
            Emotion::Confused => "Confused",
            Emotion::Depressed => "Depressed",
            Emotion::Doubtful => "Doubtful",
            Emotion::Grateful => "Grateful",
            Emotion::Guilty => "Guilty",
            Emotion::Happy => "Happy",
            Emotion::Hurt => "Hurt",
            Emotion::Jealous => "Jealous",
            Emotion::Nervous => "Nervous",
            Emotion::Sad => "Sad",
            Emotion::Scared => "Scared",
            Emotion::Tired => "Tired",
            Emotion::Unloved => "Unloved",
            Emotion::Lost => "Lost",
            Emotion::Peaceful => "Peaceful",
            Emotion::Lonely => "Lonely",
            Emotion::Confident => "Confident",
        }
    }

    /// Background colour tag of the emotion's chip.
    pub fn color(self) -> &'static str {
        match self {
            Emotion::Anxious => "bg-blue-100",
            Emotion::Confused => "bg-yellow-100",
            Emotion::Depressed => "bg-red-100",
            Emotion::Doubtful => "bg-pink-100",
            Emotion::Grateful => "bg-green-100",
            Emotion::Guilty => "bg-gray-200",
            Emotion::Happy => "bg-yellow-200",
            Emotion::Hurt => "bg-pink-200",
            Emotion::Jealous => "bg-blue-200",
            Emotion::Nervous => "bg-orange-100",
            Emotion::Sad => "bg-blue-50",
            Emotion::Scared => "bg-gray-100",
            Emotion::Tired => "bg-yellow-50",
            Emotion::Unloved => "bg-red-200",
            Emotion::Lost => "bg-gray-50",
            Emotion::Peaceful => "bg-green-50",
            Emotion::Lonely => "bg-blue-300",
            Emotion::Confident => "bg-green-200",
        }
    }

    /// Match free text against a label, ignoring case and surrounding space.
    pub fn from_label(text: &str) -> Option<Emotion> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(text))
    }
}
