//! The fixed instruction template sent with every evaluation request.

/// Builds the single-turn prompt comparing a student text against the
/// reference. The response language is fixed to Czech; the rating scale is
/// part of the instructions so the score extractor can find it later.
pub fn build_feedback_prompt(reference: &str, candidate: &str) -> String {
    format!(
        "Porovnej následující text žáka s ideálním vzorovým textem. Uveď:\n\
         \n\
         1. Hlavní rozdíly, chyby nebo nedostatky.\n\
         2. Doporučení k vylepšení.\n\
         3. Odhadni celkové hodnocení na stupnici 1 (nejhorší) až 5 (výborné).\n\
         \n\
         --- VZOR ---\n\
         {reference}\n\
         \n\
         --- ŽÁK ---\n\
         {candidate}\n\
         \n\
         Odpověď formuluj česky, přehledně.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_both_texts_verbatim() {
        let prompt = build_feedback_prompt("Kočka je zvíře.", "Kočky jsou zvířata.");
        assert!(prompt.contains("--- VZOR ---\nKočka je zvíře."));
        assert!(prompt.contains("--- ŽÁK ---\nKočky jsou zvířata."));
    }

    #[test]
    fn prompt_requests_rating_scale() {
        let prompt = build_feedback_prompt("a", "b");
        assert!(prompt.contains("hodnocení na stupnici 1 (nejhorší) až 5 (výborné)"));
        assert!(prompt.contains("Odpověď formuluj česky"));
    }
}
