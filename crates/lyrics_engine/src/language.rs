use lyrics_core::LanguageDetector;

/// Trigram-based detection via `whatlang`; yields ISO 639-3 codes (`eng`, `spa`, ...).
/// Guesses whatlang does not consider reliable are reported as inconclusive.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        whatlang::detect(text)
            .filter(|info| info.is_reliable())
            .map(|info| info.lang().code().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english_and_spanish_paragraphs() {
        let english = "I have been walking down this lonely road for so many years, \
                       and every night I wonder if the morning will ever come back to me. \
                       The people in this town have always told me that the river knows \
                       the way home, but I never listened to what they were saying.";
        let spanish = "He estado caminando por este camino solitario durante muchos años, \
                       y cada noche me pregunto si la mañana volverá a mí alguna vez. \
                       La gente de este pueblo siempre me ha dicho que el río conoce \
                       el camino a casa, pero nunca escuché lo que ellos decían.";

        assert_eq!(WhatlangDetector.detect(english).as_deref(), Some("eng"));
        assert_eq!(WhatlangDetector.detect(spanish).as_deref(), Some("spa"));
    }

    #[test]
    fn short_repetitive_lines_are_inconclusive() {
        for line in [
            "Let it be, let it be, let it be",
            "Yeah yeah yeah, oh oh oh baby",
        ] {
            assert_eq!(WhatlangDetector.detect(line), None, "{line}");
        }
    }
}
