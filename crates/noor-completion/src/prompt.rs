/// Section labels the model is asked to produce, in order.
pub const DUA_SECTIONS: [&str; 4] = [
    "Arabic text",
    "Bangla transliteration",
    "English translation",
    "Reference",
];

/// Build the single-turn prompt for a user's feeling. The feeling is
/// interpolated as-is.
pub fn dua_prompt(feeling: &str) -> String {
    format!(
        "You are an Islamic assistant.\n\
         The user is feeling: \"{feeling}\"\n\
         Give a suitable Islamic dua with:\n\
         - {}\n\
         - {} (in Bangla script)\n\
         - {}\n\
         - {}: a short Quran/Hadith reference.\n",
        DUA_SECTIONS[0], DUA_SECTIONS[1], DUA_SECTIONS[2], DUA_SECTIONS[3],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_feeling_and_all_sections() {
        let prompt = dua_prompt("Anxious");

        assert!(prompt.contains("\"Anxious\""));
        for section in DUA_SECTIONS {
            assert!(prompt.contains(section), "missing section {section}");
        }
    }

    #[test]
    fn free_text_is_not_escaped() {
        let prompt = dua_prompt("lost my job \"again\"");
        assert!(prompt.contains("lost my job \"again\""));
    }
}
