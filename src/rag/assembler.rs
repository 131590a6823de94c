//! Budget-constrained prompt assembly.
//!
//! Packs ranked passages into a prompt greedily, in rank order, never
//! exceeding the token budget of the completion model.

use super::RankedPassage;
use crate::tokenizer::Tokenizer;
use tracing::warn;

/// Wrap a passage in the fixed section template used in prompts.
fn wrap_section(text: &str) -> String {
    format!("\n\nPodcast section:\n\"\"\"\n{}\n\"\"\"", text)
}

/// Assembles a prompt from ranked passages under a token budget.
pub struct BudgetAssembler<'a> {
    tokenizer: &'a Tokenizer,
    token_budget: usize,
}

impl<'a> BudgetAssembler<'a> {
    /// Create an assembler counting tokens with the given tokenizer.
    pub fn new(tokenizer: &'a Tokenizer, token_budget: usize) -> Self {
        Self {
            tokenizer,
            token_budget,
        }
    }

    /// Build the final prompt: header, then as many ranked passages as fit,
    /// then the footer.
    ///
    /// Passages are taken strictly in rank order and packing stops at the
    /// first passage that would overflow; later, smaller passages are never
    /// pulled forward. The included passages are therefore always a prefix
    /// of `ranked`. The footer is appended unconditionally.
    ///
    /// If header and footer alone exceed the budget, the budget cannot be
    /// honored; a warning is logged and `header + footer` is returned so
    /// the caller can see the violation rather than silently losing the
    /// question.
    pub fn assemble(&self, ranked: &[RankedPassage], header: &str, footer: &str) -> String {
        let base = self.tokenizer.count(&format!("{}{}", header, footer));
        if base > self.token_budget {
            warn!(
                "Header and footer alone use {} tokens, exceeding budget of {}",
                base, self.token_budget
            );
            return format!("{}{}", header, footer);
        }

        let mut prompt = header.to_string();
        for passage in ranked {
            let section = wrap_section(&passage.text);
            let candidate = format!("{}{}{}", prompt, section, footer);
            if self.tokenizer.count(&candidate) > self.token_budget {
                break;
            }
            prompt.push_str(&section);
        }

        prompt.push_str(footer);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::for_model("gpt-3.5-turbo").unwrap()
    }

    fn ranked(texts: &[&str]) -> Vec<RankedPassage> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| RankedPassage {
                text: t.to_string(),
                score: 1.0 - i as f32 * 0.1,
            })
            .collect()
    }

    #[test]
    fn test_all_passages_fit() {
        let tokenizer = tokenizer();
        let assembler = BudgetAssembler::new(&tokenizer, 10_000);
        let passages = ranked(&["first topic", "second topic"]);

        let prompt = assembler.assemble(&passages, "Intro.", "\n\nQuestion: why?");
        assert!(prompt.starts_with("Intro."));
        assert!(prompt.ends_with("\n\nQuestion: why?"));
        assert!(prompt.contains("first topic"));
        assert!(prompt.contains("second topic"));
        assert!(tokenizer.count(&prompt) <= 10_000);
    }

    #[test]
    fn test_packing_stops_at_first_overflow() {
        let tokenizer = tokenizer();
        let header = "Use the transcript to answer.";
        let footer = "\n\nQuestion: what happened?";

        let texts: Vec<String> = (0..3)
            .map(|i| format!("topic {} ", i).repeat(120))
            .collect();
        let passages = ranked(&texts.iter().map(|s| s.as_str()).collect::<Vec<_>>());

        // Budget sized to exactly the first two sections: the third must be
        // dropped even though packing order would still have room for a
        // smaller passage.
        let two_sections = format!(
            "{}{}{}{}",
            header,
            wrap_section(&texts[0]),
            wrap_section(&texts[1]),
            footer
        );
        let budget = tokenizer.count(&two_sections);

        let assembler = BudgetAssembler::new(&tokenizer, budget);
        let prompt = assembler.assemble(&passages, header, footer);

        assert!(prompt.contains(&texts[0]));
        assert!(prompt.contains(&texts[1]));
        assert!(!prompt.contains(&texts[2]));
        assert!(tokenizer.count(&prompt) <= budget);
        assert!(prompt.ends_with(footer));
    }

    #[test]
    fn test_included_passages_are_a_prefix() {
        let tokenizer = tokenizer();
        let header = "H.";
        let footer = " F.";

        let big = "lots of words here ".repeat(200);
        let small = "tiny";
        let passages = ranked(&[&big, small]);

        // Too small for the big top-ranked passage; the smaller passage
        // behind it must not be pulled forward.
        let assembler = BudgetAssembler::new(&tokenizer, 50);
        let prompt = assembler.assemble(&passages, header, footer);

        assert_eq!(prompt, format!("{}{}", header, footer));
    }

    #[test]
    fn test_header_footer_overflow_returns_them_anyway() {
        let tokenizer = tokenizer();
        let header = "a long introduction ".repeat(30);
        let footer = "\n\nQuestion: enormous?";
        let assembler = BudgetAssembler::new(&tokenizer, 5);

        let prompt = assembler.assemble(&ranked(&["content"]), &header, footer);
        assert_eq!(prompt, format!("{}{}", header, footer));
    }

    #[test]
    fn test_budget_invariant() {
        let tokenizer = tokenizer();
        let header = "Answer from the transcript.";
        let footer = "\n\nQuestion: how?";
        let texts: Vec<String> = (0..10).map(|i| format!("point {} ", i).repeat(40)).collect();
        let passages = ranked(&texts.iter().map(|s| s.as_str()).collect::<Vec<_>>());

        for budget in [60, 150, 400, 1200] {
            let assembler = BudgetAssembler::new(&tokenizer, budget);
            let prompt = assembler.assemble(&passages, header, footer);
            if tokenizer.count(&format!("{}{}", header, footer)) <= budget {
                assert!(tokenizer.count(&prompt) <= budget, "budget {}", budget);
            }
        }
    }
}
