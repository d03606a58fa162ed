//! Keyword augmentation for the primary engine's text strategy.
//!
//! Each category appends an `OR` group that nudges the engine towards
//! fact-checking and primary sources. Languages other than German and
//! English get the German terms.

use crate::models::{Category, Language};

/// Suffix appended to the user's query for `category` in `language`.
pub fn keyword_suffix(category: Category, language: &Language) -> &'static str {
    let english = matches!(language, Language::En);
    match (category, english) {
        (Category::Medicine, false) => " (Studie OR Medizin OR Faktencheck OR Gesundheit)",
        (Category::Medicine, true) => " (Study OR Medicine OR Factcheck OR Health)",
        (Category::Science, false) => " (Wissenschaft OR Forschung OR Paper)",
        (Category::Science, true) => " (Science OR Research OR Paper)",
        (Category::Social, _) => " (Fake OR Hoax OR Reddit OR Snopes)",
        (Category::Tech, false) => " (Technik OR Software OR Hardware OR Review)",
        (Category::Tech, true) => " (Tech OR Software OR Hardware OR Review)",
        (Category::Finance, false) => " (Finanzen OR Börse OR Wirtschaft)",
        (Category::Finance, true) => " (Finance OR Stock OR Economy)",
        (Category::General | Category::NewsPolitics, _) => "",
    }
}

pub fn augment(text: &str, category: Category, language: &Language) -> String {
    format!("{text}{}", keyword_suffix(category, language))
}
